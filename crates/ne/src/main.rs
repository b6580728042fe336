mod clip;
mod commands;
mod config;
mod report;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use log::debug;

use crate::config::{Cli, Command};

fn main() -> Result<ExitCode> {
    // Warnings by default; RUST_LOG=debug also shows ogr2ogr output.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    debug!("settings: {:?}", cli.settings);

    match &cli.command {
        Command::List(args) => Ok(commands::list(&cli.settings, args)),
        Command::Extract(args) => commands::extract(&cli.settings, args),
    }
}

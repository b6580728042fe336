use std::fs;
use std::path::{Component, Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use log::{info, warn};
use natural_earth::{
    read_catalog_rows, run_extraction, DerivedValues, ExtractionPlan, LayerExtractor,
    MetadataRecord, RunEnvironment, Scale,
};
use nix::unistd::{access, AccessFlags};

use crate::clip::Ogr2Ogr;
use crate::config::{ExtractArgs, Settings};
use crate::report;

pub fn run(settings: &Settings, args: &ExtractArgs) -> Result<ExitCode> {
    let extractor = Ogr2Ogr::new(
        settings.ogr2ogr.clone(),
        log::log_enabled!(log::Level::Debug),
    );

    Ok(if execute(settings, args, &extractor)? {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Plan, extract and record one run. `Ok(true)` only when every available
/// layer was extracted; the metadata write never affects the result.
fn execute<E>(settings: &Settings, args: &ExtractArgs, extractor: &E) -> Result<bool>
where
    E: LayerExtractor + ?Sized,
{
    let request = args.to_request();

    // Scale first so a missing one gets the reminder rather than a later error.
    if let Err(err) = request.scale.as_deref().unwrap_or("").parse::<Scale>() {
        report::plan_error(&err);
        return Ok(false);
    }

    let output_dir = match validate_output_directory(request.output.as_deref()) {
        Ok(dir) => dir,
        Err(err) => {
            eprintln!("Error: {err:#}");
            return Ok(false);
        }
    };

    let rows = read_catalog_rows(&settings.catalog).unwrap_or_else(|err| {
        warn!("{err}");
        Vec::new()
    });

    let plan = match ExtractionPlan::build(&request, &rows, &output_dir) {
        Ok(plan) => plan,
        Err(err) => {
            report::plan_error(&err);
            return Ok(false);
        }
    };

    // Not create_dir_all: a directory that appeared since probing is an error.
    fs::create_dir(&plan.destination)
        .with_context(|| format!("failed to create {}", plan.destination.display()))?;

    report::plan_header(&plan);

    let summary = run_extraction(
        extractor,
        &plan,
        &settings.data_dir,
        &mut report::ConsoleProgress,
    );

    report::summary(&summary);
    let all_succeeded = summary.all_succeeded();

    let record = MetadataRecord::build(
        &request,
        DerivedValues::from_plan(&plan),
        summary,
        RunEnvironment::current(&settings.data_dir),
    );
    match record.write(&plan.destination) {
        Ok(path) => info!("metadata written to {}", path.display()),
        Err(err) => {
            warn!("{err}");
            eprintln!("Warning: {err}");
        }
    }

    Ok(all_succeeded)
}

/// Resolve the output base: `~` expanded, relative paths made absolute, and
/// the result must be an existing writable directory.
fn validate_output_directory(output: Option<&str>) -> Result<PathBuf> {
    let cwd = std::env::current_dir().context("cannot determine current directory")?;
    let dir = match output {
        Some(raw) => normalize(&cwd.join(expand_home(raw))),
        None => cwd,
    };

    if !dir.is_dir() {
        bail!("Output directory does not exist: {}", dir.display());
    }

    // Effective access for this process, not the mode bits.
    if access(dir.as_path(), AccessFlags::W_OK).is_err() {
        bail!("Output directory is not writable: {}", dir.display());
    }

    Ok(dir)
}

fn expand_home(raw: &str) -> PathBuf {
    let home = std::env::var_os("HOME").map(PathBuf::from);

    match (raw, home) {
        ("~", Some(home)) => home,
        (_, Some(home)) if raw.starts_with("~/") => home.join(&raw[2..]),
        _ => Path::new(raw).to_path_buf(),
    }
}

/// Lexically drop `.` and resolve `..` without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

use std::collections::BTreeMap;
use std::process::ExitCode;

use natural_earth::{read_catalog_rows, CatalogRow, Scale};

use crate::config::{ListArgs, Settings};
use crate::report;

/// Layers grouped by scale, then theme.
type Listing<'a> = BTreeMap<Scale, BTreeMap<&'a str, Vec<&'a CatalogRow>>>;

pub fn run(settings: &Settings, args: &ListArgs) -> ExitCode {
    let filter = match args.scale.as_deref().map(str::parse::<Scale>).transpose() {
        Ok(filter) => filter,
        Err(err) => {
            report::plan_error(&err);
            return ExitCode::FAILURE;
        }
    };

    let rows = match read_catalog_rows(&settings.catalog) {
        Ok(rows) => rows,
        Err(err) => {
            report::plan_error(&err);
            return ExitCode::FAILURE;
        }
    };

    let listing = group(&rows, filter);
    let total: usize = listing
        .values()
        .flat_map(|themes| themes.values())
        .map(Vec::len)
        .sum();

    if total == 0 {
        match filter {
            Some(scale) => println!("No layers found for scale {scale}"),
            None => println!("No layers found"),
        }
        return ExitCode::SUCCESS;
    }

    match filter {
        Some(scale) => println!("\nNatural Earth Layers ({scale}m scale):"),
        None => println!("\nNatural Earth Layers:"),
    }

    for (scale, themes) in &listing {
        println!("\n{}m Scale (1:{},000,000):", scale, scale);
        for (theme, layers) in themes {
            println!("  {}:", capitalize(theme));
            for row in layers {
                let marker = if row.default == Some(true) { " *" } else { "" };
                println!("    {}{}", row.layer, marker);
            }
        }
    }

    println!("\nTotal: {total} layers (* = default set)\n");
    ExitCode::SUCCESS
}

fn group(rows: &[CatalogRow], filter: Option<Scale>) -> Listing<'_> {
    let mut listing = Listing::new();

    for row in rows {
        if row.is_auxiliary() {
            continue;
        }
        let Ok(scale) = row.scale.parse::<Scale>() else {
            continue;
        };
        if filter.is_some_and(|f| f != scale) {
            continue;
        }

        listing
            .entry(scale)
            .or_default()
            .entry(row.theme.as_str())
            .or_default()
            .push(row);
    }

    for themes in listing.values_mut() {
        for layers in themes.values_mut() {
            layers.sort_by(|a, b| a.layer.cmp(&b.layer));
        }
    }

    listing
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

//! User-facing rendering of engine results. The engine itself never prints.

use std::io::{self, Write};

use natural_earth::{ExtractionPlan, ExtractionProgress, ExtractionSummary, PlanError, Scale};

/// Print a planning failure with whatever hints help the user fix it.
pub fn plan_error(err: &PlanError) {
    match err {
        PlanError::InvalidScale(_) => scale_reminder(),
        PlanError::InvalidExtent { .. } => {
            eprintln!("Error: {err}");
            eprintln!("Use: xmin,ymin,xmax,ymax (decimal degrees)");
        }
        PlanError::InvalidBuffer { .. } => {
            eprintln!("Error: {err}");
            eprintln!("Use a number between 0-100 or 0.0-1.0, optionally as EW,NS");
        }
        PlanError::NoAvailableLayers { unavailable, .. } => {
            eprintln!("Error: {err}");
            if !unavailable.is_empty() {
                eprintln!("Unavailable layers: {}", unavailable.join(", "));
            }
        }
        PlanError::EmptyCatalog(_) | PlanError::CatalogUnreadable { .. } => {
            eprintln!("Error: {err}");
            eprintln!("Point --catalog (or NE_CATALOG) at an ne.csv layer list.");
        }
        PlanError::EmptyLayerSelection => eprintln!("Error: {err}"),
    }
}

pub fn scale_reminder() {
    eprintln!();
    eprintln!("Error: --scale must be 10, 50, or 110");
    eprintln!();
    eprintln!("Scale options:");
    for scale in Scale::ALL {
        eprintln!("  {:<4} - {}", scale.as_str(), scale.description());
    }
    eprintln!();
}

pub fn plan_header(plan: &ExtractionPlan) {
    println!();
    println!("Extracting to: {}", plan.destination.display());
    println!("Scale: {}m (1:{},000,000)", plan.scale, plan.scale.millions());
    println!("Original extent: {}", plan.parsed_extent);
    println!(
        "Buffered extent: {} ({} buffer)",
        plan.buffered_extent, plan.buffer
    );
    println!("Layers: {}", plan.layers.available.len());

    if !plan.layers.unavailable.is_empty() {
        println!();
        println!(
            "Skipping unavailable layers: {}",
            plan.layers.unavailable.join(", ")
        );
    }
    println!();
}

pub fn summary(summary: &ExtractionSummary) {
    println!();
    if summary.all_succeeded() {
        println!("Successfully extracted {} layers", summary.successful);
    } else {
        println!(
            "Extracted {}/{} layers",
            summary.successful, summary.total_layers
        );
    }
}

/// `  [i/n] layer... ok` lines on stdout.
pub struct ConsoleProgress;

impl ExtractionProgress for ConsoleProgress {
    fn started(&mut self, index: usize, total: usize, layer: &str) {
        print!("  [{}/{}] {}... ", index + 1, total, layer);
        let _ = io::stdout().flush();
    }

    fn finished(&mut self, _index: usize, _total: usize, _layer: &str, success: bool) {
        println!("{}", if success { "ok" } else { "FAILED" });
    }
}

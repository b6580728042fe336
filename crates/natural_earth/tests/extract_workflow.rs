//! Plan, extract and record a run end to end with a stub extractor.

use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;

use natural_earth::{
    run_extraction, CatalogRow, DerivedValues, ExtractError, ExtractRequest, ExtractionPlan,
    LayerExtractor, LayerJob, MetadataError, MetadataRecord, RunEnvironment, METADATA_FILENAME,
};
use tempfile::TempDir;

/// Writes a marker file per layer instead of clipping; fails on `lakes`.
struct MarkerExtractor {
    calls: RefCell<Vec<String>>,
}

impl LayerExtractor for MarkerExtractor {
    fn extract(&self, job: &LayerJob<'_>) -> Result<(), ExtractError> {
        self.calls.borrow_mut().push(job.layer.to_string());
        if job.layer == "lakes" {
            return Err(ExtractError::SourceMissing(job.source.clone()));
        }
        fs::write(job.destination.join(format!("{}.shp", job.layer)), job.extent.to_string())
            .map_err(|source| ExtractError::Launch {
                tool: "marker".to_string(),
                source,
            })
    }
}

fn rows() -> Vec<CatalogRow> {
    [
        ("physical", "land", true),
        ("physical", "lakes", true),
        ("cultural", "admin_0_countries", true),
        ("physical", "glaciated_areas", false),
    ]
    .into_iter()
    .map(|(theme, layer, default)| CatalogRow {
        scale: "10".to_string(),
        theme: theme.to_string(),
        layer: layer.to_string(),
        default: Some(default),
    })
    .collect()
}

fn request(output: &TempDir) -> ExtractRequest {
    ExtractRequest {
        scale: Some("10".to_string()),
        extent: Some("-95.3,28.7,-87.2,33.6".to_string()),
        buffer: None,
        layers: Some("default,glaciated_areas,ocean".to_string()),
        output: Some(output.path().display().to_string()),
    }
}

#[test]
fn full_run_writes_layers_and_metadata() {
    let out = TempDir::new().unwrap();
    let request = request(&out);

    let plan = ExtractionPlan::build(&request, &rows(), out.path()).unwrap();
    assert_eq!(plan.destination, out.path().join("ne-10m--95-29--87-34"));
    assert_eq!(
        plan.resolved_layers,
        ["land", "lakes", "admin_0_countries", "glaciated_areas", "ocean"]
    );
    fs::create_dir(&plan.destination).unwrap();

    let extractor = MarkerExtractor {
        calls: RefCell::new(Vec::new()),
    };
    let data_dir = PathBuf::from("/data/ne");
    let summary = run_extraction(&extractor, &plan, &data_dir, &mut ());

    assert_eq!(
        *extractor.calls.borrow(),
        ["land", "lakes", "admin_0_countries", "glaciated_areas"]
    );
    assert_eq!(summary.total_layers, 4);
    assert_eq!(summary.successful, 3);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.unavailable_layers, ["ocean"]);
    assert!(plan.destination.join("land.shp").exists());
    assert!(!plan.destination.join("lakes.shp").exists());

    let record = MetadataRecord::build(
        &request,
        DerivedValues::from_plan(&plan),
        summary,
        RunEnvironment::current(&data_dir),
    );
    let written = record.write(&plan.destination).unwrap();
    assert_eq!(written, plan.destination.join(METADATA_FILENAME));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&written).unwrap()).unwrap();
    assert_eq!(json["derived"]["destination_directory"], "ne-10m--95-29--87-34");
    assert_eq!(json["derived"]["buffer_config"]["ew_percent"], 20.0);
    assert_eq!(json["arguments"]["buffer"], serde_json::Value::Null);
    assert_eq!(json["extraction_results"]["failed"], 1);
    assert_eq!(json["metadata"]["natural_earth_data_dir"], "/data/ne");
    assert!(json["command"]
        .as_str()
        .unwrap()
        .starts_with("ne extract --scale 10 --extent -95.3,28.7,-87.2,33.6 --layers"));
}

#[test]
fn second_plan_for_same_extent_gets_a_suffix() {
    let out = TempDir::new().unwrap();
    let request = request(&out);

    let first = ExtractionPlan::build(&request, &rows(), out.path()).unwrap();
    fs::create_dir(&first.destination).unwrap();
    let second = ExtractionPlan::build(&request, &rows(), out.path()).unwrap();

    assert_eq!(second.destination, out.path().join("ne-10m--95-29--87-34-1"));
}

#[test]
fn metadata_write_failure_is_reported_not_panicked() {
    let out = TempDir::new().unwrap();
    let request = request(&out);
    let plan = ExtractionPlan::build(&request, &rows(), out.path()).unwrap();

    // Destination never created.
    let record = MetadataRecord::build(
        &request,
        DerivedValues::from_plan(&plan),
        Default::default(),
        RunEnvironment::current(&PathBuf::from("/data/ne")),
    );
    let err = record.write(&plan.destination).unwrap_err();
    assert!(matches!(err, MetadataError::Write { .. }));
}

//! Provenance record written next to the extracted layers.
//!
//! The record is built once per run from the raw request, the plan derived
//! from it and the extraction outcome, then written as pretty JSON to
//! [`METADATA_FILENAME`] in the destination directory:
//!
//! ```text
//! {
//!   "command": "ne extract --scale 10 --extent -95,28,-88,34",
//!   "timestamp": "2024-05-01T09:30:00-05:00",
//!   "arguments": { "scale", "extent", "buffer", "layers", "output" },
//!   "derived": { "parsed_extent", "buffer_config", "buffered_extent",
//!                "destination_directory", "resolved_layers" },
//!   "extraction_results": { "total_layers", "successful", "failed",
//!                           "layers", "unavailable_layers" },
//!   "metadata": { "ne_version", "rust_version", "natural_earth_data_dir" }
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, Local, SecondsFormat};
use log::info;
use serde::Serialize;

use crate::error::MetadataError;
use crate::extent::{BufferConfig, Extent};
use crate::extract::ExtractionSummary;
use crate::plan::{ExtractRequest, ExtractionPlan};

pub const METADATA_FILENAME: &str = "metadata.json";

/// Name the command is re-rendered under.
const COMMAND_NAME: &str = "ne extract";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataRecord {
    pub command: String,
    pub timestamp: String,
    pub arguments: ExtractRequest,
    pub derived: DerivedValues,
    pub extraction_results: ExtractionSummary,
    pub metadata: RunEnvironment,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BufferPercent {
    pub ew_percent: f64,
    pub ns_percent: f64,
}

impl From<BufferConfig> for BufferPercent {
    fn from(b: BufferConfig) -> Self {
        Self {
            ew_percent: b.ew,
            ns_percent: b.ns,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedValues {
    pub parsed_extent: Extent,
    pub buffer_config: BufferPercent,
    pub buffered_extent: Extent,
    /// Basename only, so the record stays valid if the directory is moved.
    pub destination_directory: String,
    pub resolved_layers: Vec<String>,
}

impl DerivedValues {
    pub fn new(
        parsed_extent: Extent,
        buffer: BufferConfig,
        buffered_extent: Extent,
        destination: &Path,
        resolved_layers: Vec<String>,
    ) -> Self {
        let destination_directory = destination
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            parsed_extent,
            buffer_config: buffer.into(),
            buffered_extent,
            destination_directory,
            resolved_layers,
        }
    }

    pub fn from_plan(plan: &ExtractionPlan) -> Self {
        Self::new(
            plan.parsed_extent,
            plan.buffer,
            plan.buffered_extent,
            &plan.destination,
            plan.resolved_layers.clone(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunEnvironment {
    pub ne_version: String,
    pub rust_version: String,
    pub natural_earth_data_dir: String,
}

impl RunEnvironment {
    pub fn current(data_dir: &Path) -> Self {
        Self {
            ne_version: env!("CARGO_PKG_VERSION").to_string(),
            rust_version: env!("NE_RUSTC_VERSION").to_string(),
            natural_earth_data_dir: data_dir.display().to_string(),
        }
    }
}

impl MetadataRecord {
    /// Build the record stamped with the current local time.
    pub fn build(
        request: &ExtractRequest,
        derived: DerivedValues,
        summary: ExtractionSummary,
        environment: RunEnvironment,
    ) -> Self {
        let now: DateTime<FixedOffset> = Local::now().into();
        Self::build_at(request, derived, summary, environment, now)
    }

    pub fn build_at(
        request: &ExtractRequest,
        derived: DerivedValues,
        summary: ExtractionSummary,
        environment: RunEnvironment,
        at: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            command: reconstruct_command(request),
            timestamp: at.to_rfc3339_opts(SecondsFormat::Secs, false),
            arguments: request.clone(),
            derived,
            extraction_results: summary,
            metadata: environment,
        }
    }

    /// Write the record into `dest_dir`. Callers treat failure as a warning.
    pub fn write(&self, dest_dir: &Path) -> Result<PathBuf, MetadataError> {
        let path = dest_dir.join(METADATA_FILENAME);
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');

        fs::write(&path, json).map_err(|source| MetadataError::Write {
            path: path.clone(),
            source,
        })?;

        info!("wrote {}", path.display());
        Ok(path)
    }
}

/// Long-form flags in fixed order; absent fields are left out.
pub fn reconstruct_command(request: &ExtractRequest) -> String {
    let fields = [
        ("scale", &request.scale),
        ("extent", &request.extent),
        ("buffer", &request.buffer),
        ("layers", &request.layers),
        ("output", &request.output),
    ];

    let mut command = String::from(COMMAND_NAME);
    for (flag, value) in fields {
        if let Some(value) = value {
            command.push_str(&format!(" --{flag} {value}"));
        }
    }
    command
}

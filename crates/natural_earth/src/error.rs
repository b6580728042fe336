//! Typed failures produced by the planning engine.
//!
//! Nothing in this crate prints; callers decide how each failure is shown.

use std::io;
use std::path::PathBuf;

use crate::scale::Scale;

/// A request that cannot be turned into an extraction plan.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("invalid scale '{0}': must be 10, 50, or 110")]
    InvalidScale(String),

    #[error("invalid extent '{input}': {reason}")]
    InvalidExtent { input: String, reason: String },

    #[error("invalid buffer '{input}': {reason}")]
    InvalidBuffer { input: String, reason: String },

    #[error("no valid layers specified")]
    EmptyLayerSelection,

    #[error("catalog has no layer information for scale {0}")]
    EmptyCatalog(Scale),

    #[error("none of the specified layers are available at scale {scale}")]
    NoAvailableLayers {
        scale: Scale,
        unavailable: Vec<String>,
    },

    #[error("could not read layer catalog {}: {reason}", .path.display())]
    CatalogUnreadable { path: PathBuf, reason: String },
}

impl PlanError {
    pub(crate) fn extent(input: &str, reason: impl Into<String>) -> Self {
        PlanError::InvalidExtent {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn buffer(input: &str, reason: impl Into<String>) -> Self {
        PlanError::InvalidBuffer {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// Failure to persist the provenance record. Never fatal to a run.
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("failed to serialize metadata: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write metadata to {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failure to extract a single layer. Aggregated, never aborts the batch.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("source file not found: {}", .0.display())]
    SourceMissing(PathBuf),

    #[error("failed to launch {tool}: {source}")]
    Launch {
        tool: String,
        #[source]
        source: io::Error,
    },

    #[error("{tool} exited with {status}")]
    ToolFailed { tool: String, status: String },
}

//! Planning engine for Natural Earth extracts.
//!
//! Given a map scale, a CRS:84 extent, an optional buffer and a layer
//! selection, the engine:
//!
//! - parses and buffers the extent ([`extent`]),
//! - resolves the selection against a scale-scoped catalog, expanding the
//!   `default` token ([`catalog`], [`layers`]),
//! - picks a collision-free destination directory ([`plan`]),
//! - drives a caller-supplied per-layer extractor in order ([`extract`]),
//! - records the run as a provenance document ([`metadata`]).
//!
//! Every fallible step returns a typed error; nothing here prints or reads
//! the environment.

pub mod catalog;
pub mod error;
pub mod extent;
pub mod extract;
pub mod layers;
pub mod metadata;
pub mod plan;
pub mod scale;

pub use catalog::{read_catalog_rows, Catalog, CatalogEntry, CatalogRow};
pub use error::{ExtractError, MetadataError, PlanError};
pub use extent::{find_available_directory, BufferConfig, Extent};
pub use extract::{
    run_extraction, source_path, ExtractionProgress, ExtractionSummary, LayerExtractor, LayerJob,
    LayerOutcome, DEFAULT_DATA_DIR,
};
pub use layers::{default_layers, filter_available, resolve, LayerAvailability};
pub use metadata::{DerivedValues, MetadataRecord, RunEnvironment, METADATA_FILENAME};
pub use plan::{ExtractRequest, ExtractionPlan};
pub use scale::Scale;

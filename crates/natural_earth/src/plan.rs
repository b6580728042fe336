//! The whole planning pipeline, from raw request strings to a destination.

use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::Serialize;

use crate::catalog::{Catalog, CatalogRow};
use crate::error::PlanError;
use crate::extent::{next_free_path, BufferConfig, Extent};
use crate::layers::{self, LayerAvailability};
use crate::scale::Scale;

/// The five raw fields of an extract invocation, kept verbatim for the record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractRequest {
    pub scale: Option<String>,
    pub extent: Option<String>,
    pub buffer: Option<String>,
    pub layers: Option<String>,
    pub output: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ExtractionPlan {
    pub scale: Scale,
    pub parsed_extent: Extent,
    pub buffer: BufferConfig,
    pub buffered_extent: Extent,
    pub resolved_layers: Vec<String>,
    pub layers: LayerAvailability,
    pub destination: PathBuf,
    pub catalog: Catalog,
}

impl ExtractionPlan {
    /// Validate the request against `rows` and pick a free destination under
    /// `base`. The destination is not created here.
    pub fn build(
        request: &ExtractRequest,
        rows: &[CatalogRow],
        base: &Path,
    ) -> Result<Self, PlanError> {
        let scale: Scale = request.scale.as_deref().unwrap_or("").parse()?;

        let parsed_extent = Extent::parse(request.extent.as_deref().unwrap_or(""))?;
        let buffer = BufferConfig::parse(request.buffer.as_deref())?;
        let buffered_extent = parsed_extent.buffered(buffer);
        debug!("extent {} buffered by {} -> {}", parsed_extent, buffer, buffered_extent);

        let catalog = Catalog::build(rows, scale);
        let resolved_layers = layers::resolve(request.layers.as_deref(), &catalog);
        if resolved_layers.is_empty() {
            return Err(PlanError::EmptyLayerSelection);
        }
        if catalog.is_empty() {
            return Err(PlanError::EmptyCatalog(catalog.scale()));
        }

        let availability = layers::filter_available(&resolved_layers, &catalog);
        if availability.available.is_empty() {
            return Err(PlanError::NoAvailableLayers {
                scale,
                unavailable: availability.unavailable,
            });
        }

        let destination = next_free_path(base, &parsed_extent.directory_fragment(scale));
        info!(
            "planned {} of {} layers into {}",
            availability.available.len(),
            resolved_layers.len(),
            destination.display()
        );

        Ok(Self {
            scale,
            parsed_extent,
            buffer,
            buffered_extent,
            resolved_layers,
            layers: availability,
            destination,
            catalog,
        })
    }
}

//! Sequential per-layer extraction loop. The clipping itself is delegated to
//! a [`LayerExtractor`].

use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::Serialize;

use crate::catalog::CatalogEntry;
use crate::error::ExtractError;
use crate::extent::Extent;
use crate::plan::ExtractionPlan;
use crate::scale::Scale;

/// Default root of the local Natural Earth shapefile tree.
pub const DEFAULT_DATA_DIR: &str = "/Users/Shared/Geodata/ne";

/// Everything needed to clip one layer.
#[derive(Debug, Clone)]
pub struct LayerJob<'a> {
    pub layer: &'a str,
    pub source: PathBuf,
    pub destination: &'a Path,
    pub extent: &'a Extent,
}

pub trait LayerExtractor {
    fn extract(&self, job: &LayerJob<'_>) -> Result<(), ExtractError>;
}

/// Progress hooks, called around each layer in order.
pub trait ExtractionProgress {
    fn started(&mut self, _index: usize, _total: usize, _layer: &str) {}
    fn finished(&mut self, _index: usize, _total: usize, _layer: &str, _success: bool) {}
}

impl ExtractionProgress for () {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerOutcome {
    pub name: String,
    pub success: bool,
}

/// Outcome of a run: counts plus one entry per attempted layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionSummary {
    pub total_layers: usize,
    pub successful: usize,
    pub failed: usize,
    pub layers: Vec<LayerOutcome>,
    pub unavailable_layers: Vec<String>,
}

impl ExtractionSummary {
    pub fn all_succeeded(&self) -> bool {
        self.successful == self.total_layers
    }
}

/// `{data_dir}/{scale}m_{theme}/ne_{scale}m_{layer}.shp`
pub fn source_path(data_dir: &Path, scale: Scale, entry: &CatalogEntry) -> PathBuf {
    data_dir
        .join(format!("{}m_{}", scale, entry.theme))
        .join(format!("ne_{}m_{}.shp", scale, entry.name))
}

/// Extract every available layer of `plan` one after another. A failed layer
/// is recorded and the loop moves on.
pub fn run_extraction<E, P>(
    extractor: &E,
    plan: &ExtractionPlan,
    data_dir: &Path,
    progress: &mut P,
) -> ExtractionSummary
where
    E: LayerExtractor + ?Sized,
    P: ExtractionProgress + ?Sized,
{
    let available = &plan.layers.available;
    let total = available.len();
    let mut outcomes = Vec::with_capacity(total);

    for (index, layer) in available.iter().enumerate() {
        progress.started(index, total, layer);

        let success = match plan.catalog.get(layer) {
            Some(entry) => {
                let job = LayerJob {
                    layer,
                    source: source_path(data_dir, plan.scale, entry),
                    destination: &plan.destination,
                    extent: &plan.buffered_extent,
                };
                debug!("extracting {} from {}", layer, job.source.display());

                match extractor.extract(&job) {
                    Ok(()) => true,
                    Err(err) => {
                        warn!("layer {} failed: {}", layer, err);
                        false
                    }
                }
            }
            None => {
                warn!("layer {} vanished from the catalog", layer);
                false
            }
        };

        progress.finished(index, total, layer, success);
        outcomes.push(LayerOutcome {
            name: layer.clone(),
            success,
        });
    }

    let successful = outcomes.iter().filter(|o| o.success).count();
    ExtractionSummary {
        total_layers: total,
        successful,
        failed: total - successful,
        layers: outcomes,
        unavailable_layers: plan.layers.unavailable.clone(),
    }
}

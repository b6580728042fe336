//! Layer selection: expanding `default`, and splitting a request into what
//! the catalog has and what it lacks.

use crate::catalog::Catalog;

/// Token that stands for the default layer set inside a selection.
pub const DEFAULT_TOKEN: &str = "default";

/// Basemap set used when the catalog carries no `default` column.
pub const FALLBACK_DEFAULT_LAYERS: [&str; 8] = [
    "land",
    "lakes",
    "rivers_lake_centerlines_scale_rank",
    "admin_0_countries",
    "admin_0_boundary_lines_disputed_areas",
    "admin_0_boundary_lines_land",
    "admin_1_states_provinces_scale_rank",
    "admin_1_states_provinces_lines",
];

/// Requested layers split by catalog membership. Both keep request order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerAvailability {
    pub available: Vec<String>,
    pub unavailable: Vec<String>,
}

/// Default-flagged layers in catalog order, or the fallback set when the
/// catalog source predates the flag.
pub fn default_layers(catalog: &Catalog) -> Vec<String> {
    if !catalog.has_default_flags() {
        return FALLBACK_DEFAULT_LAYERS.iter().map(|s| s.to_string()).collect();
    }

    catalog
        .entries()
        .iter()
        .filter(|entry| entry.is_default)
        .map(|entry| entry.name.clone())
        .collect()
}

/// Turn a raw selection into an ordered list of layer names.
///
/// Empty selection means the defaults. Any `default` token is removed and the
/// defaults are placed ahead of the remaining names. Duplicates are kept.
pub fn resolve(request: Option<&str>, catalog: &Catalog) -> Vec<String> {
    let request = match request {
        None | Some("") => return default_layers(catalog),
        Some(r) => r,
    };

    let tokens: Vec<&str> = request
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();

    if !tokens.contains(&DEFAULT_TOKEN) {
        return tokens.into_iter().map(String::from).collect();
    }

    let mut layers = default_layers(catalog);
    layers.extend(
        tokens
            .into_iter()
            .filter(|t| *t != DEFAULT_TOKEN)
            .map(String::from),
    );
    layers
}

pub fn filter_available(requested: &[String], catalog: &Catalog) -> LayerAvailability {
    let (available, unavailable): (Vec<String>, Vec<String>) = requested
        .iter()
        .cloned()
        .partition(|name| catalog.contains(name));

    LayerAvailability {
        available,
        unavailable,
    }
}

//! Scale-scoped layer catalog built from `ne.csv` style rows.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::debug;

use crate::error::PlanError;
use crate::scale::Scale;

/// Names starting with this prefix are auxiliary assets, not layers.
pub const AUXILIARY_PREFIX: &str = "ne/";

/// One raw catalog row. `default` is `None` when the source has no such column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRow {
    pub scale: String,
    pub theme: String,
    pub layer: String,
    pub default: Option<bool>,
}

impl CatalogRow {
    pub fn is_auxiliary(&self) -> bool {
        self.layer.starts_with(AUXILIARY_PREFIX)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: String,
    pub theme: String,
    pub scale: Scale,
    pub is_default: bool,
}

/// Layers available at one scale, keyed by name, in source order.
#[derive(Debug, Clone)]
pub struct Catalog {
    scale: Scale,
    entries: Vec<CatalogEntry>,
    by_name: HashMap<String, usize>,
    has_default_flags: bool,
}

impl Catalog {
    /// Keep rows for `scale`, drop auxiliary rows, and index the rest by name.
    /// A repeated name updates the earlier entry in place.
    pub fn build(rows: &[CatalogRow], scale: Scale) -> Self {
        let mut catalog = Catalog {
            scale,
            entries: Vec::new(),
            by_name: HashMap::new(),
            has_default_flags: false,
        };

        for row in rows {
            if row.scale != scale.as_str() || row.is_auxiliary() {
                continue;
            }

            catalog.has_default_flags |= row.default.is_some();

            let entry = CatalogEntry {
                name: row.layer.clone(),
                theme: row.theme.clone(),
                scale,
                is_default: row.default.unwrap_or(false),
            };

            match catalog.by_name.get(&row.layer) {
                Some(&index) => catalog.entries[index] = entry,
                None => {
                    catalog.by_name.insert(row.layer.clone(), catalog.entries.len());
                    catalog.entries.push(entry);
                }
            }
        }

        debug!("catalog for {}m: {} layers", scale, catalog.entries.len());
        catalog
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        self.by_name.get(name).map(|&index| &self.entries[index])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any source row for this scale carried a `default` column.
    pub fn has_default_flags(&self) -> bool {
        self.has_default_flags
    }
}

/// Read catalog rows from a header-first comma-separated file.
///
/// Required columns: `scale`, `theme`, `layer`. Optional: `default`
/// (`TRUE` in any case means true). Rows with an empty `layer` are skipped.
pub fn read_catalog_rows(path: &Path) -> Result<Vec<CatalogRow>, PlanError> {
    let unreadable = |reason: String| PlanError::CatalogUnreadable {
        path: path.to_path_buf(),
        reason,
    };

    let file = File::open(path).map_err(|e| unreadable(e.to_string()))?;
    let mut lines = BufReader::new(file).lines();

    let header = match lines.next() {
        Some(line) => line.map_err(|e| unreadable(e.to_string()))?,
        None => return Err(unreadable("file is empty".to_string())),
    };
    let columns: Vec<&str> = header.split(',').map(str::trim).collect();
    let column = |name: &str| columns.iter().position(|c| *c == name);

    let (scale_col, theme_col, layer_col) =
        match (column("scale"), column("theme"), column("layer")) {
            (Some(s), Some(t), Some(l)) => (s, t, l),
            _ => {
                return Err(unreadable(
                    "header must name scale, theme and layer columns".to_string(),
                ))
            }
        };
    let default_col = column("default");

    let mut rows = Vec::new();
    for line in lines {
        let line = line.map_err(|e| unreadable(e.to_string()))?;
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let field = |index: usize| fields.get(index).copied().unwrap_or("");

        let layer = field(layer_col);
        if layer.is_empty() {
            continue;
        }

        rows.push(CatalogRow {
            scale: field(scale_col).to_string(),
            theme: field(theme_col).to_string(),
            layer: layer.to_string(),
            default: default_col.map(|index| field(index).eq_ignore_ascii_case("true")),
        });
    }

    debug!("read {} catalog rows from {}", rows.len(), path.display());
    Ok(rows)
}

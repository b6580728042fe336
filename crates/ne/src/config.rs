use clap::{Args, Parser, Subcommand};
use natural_earth::{ExtractRequest, DEFAULT_DATA_DIR};
use std::path::PathBuf;

/// `ne` - plan and run Natural Earth extracts for a map extent.
///
/// Layers are clipped out of a local Natural Earth shapefile tree with
/// `ogr2ogr` into a fresh directory named after the scale and extent, and a
/// `metadata.json` provenance record is written alongside them.
#[derive(Parser, Debug)]
#[command(name = "ne", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub settings: Settings,

    #[command(subcommand)]
    pub command: Command,
}

/// Settings resolved once at startup and passed down explicitly.
#[derive(Args, Debug, Clone)]
pub struct Settings {
    /// Root of the Natural Earth shapefile tree
    /// (`{scale}m_{theme}/ne_{scale}m_{layer}.shp` underneath).
    #[arg(long, global = true, env = "NE_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Layer catalog with `scale,theme,layer[,default]` columns.
    #[arg(long, global = true, env = "NE_CATALOG", default_value = "ne.csv")]
    pub catalog: PathBuf,

    /// Clipping tool executable.
    #[arg(long, global = true, env = "NE_OGR2OGR", default_value = "ogr2ogr")]
    pub ogr2ogr: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List available Natural Earth layers
    #[command(visible_alias = "l")]
    List(ListArgs),

    /// Extract Natural Earth data for a specific extent
    #[command(visible_alias = "e")]
    Extract(ExtractArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Filter by scale (10, 50, or 110)
    #[arg(short, long)]
    pub scale: Option<String>,
}

#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Scale: 10, 50, or 110
    #[arg(short, long)]
    pub scale: Option<String>,

    /// Spatial extent: xmin,ymin,xmax,ymax
    #[arg(short, long, allow_hyphen_values = true)]
    pub extent: Option<String>,

    /// Expand extent by percentage, one value or EW,NS (default: 20)
    #[arg(short, long)]
    pub buffer: Option<String>,

    /// Comma-separated layer list; `default` expands to the standard basemap set
    #[arg(short, long)]
    pub layers: Option<String>,

    /// Output directory (default: current directory)
    #[arg(short, long)]
    pub output: Option<String>,
}

impl ExtractArgs {
    pub fn to_request(&self) -> ExtractRequest {
        ExtractRequest {
            scale: self.scale.clone(),
            extent: self.extent.clone(),
            buffer: self.buffer.clone(),
            layers: self.layers.clone(),
            output: self.output.clone(),
        }
    }
}

use clap::Parser;
use std::path::PathBuf;

use baresoil::{Method, ReportFormat};

#[derive(Parser, Debug)]
#[command(
    name = "baresoil",
    version,
    about = "Estimate the bare-soil fraction of red/NIR rasters"
)]
pub struct CliArgs {
    /// Input raster with red and NIR bands (single file mode)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Directory of rasters (.tif, .tiff, .json) to estimate (batch mode)
    #[arg(long)]
    pub input_dir: Option<PathBuf>,

    /// Write the report to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// JSON file with estimation parameters; flags below override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Estimator(s) to run (adaptive, fixed or both)
    #[arg(short, long, value_enum)]
    pub method: Option<Method>,

    /// Decomposition weight for the brightness endmembers (default 0.4)
    #[arg(long)]
    pub lambda: Option<f64>,

    /// 1-based index of the red band in multi-band rasters (default 1)
    #[arg(long)]
    pub red_band: Option<usize>,

    /// 1-based index of the NIR band in multi-band rasters (default 2)
    #[arg(long)]
    pub nir_band: Option<usize>,

    /// Report format (text or json)
    #[arg(short = 'f', long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Batch mode: keep going when a file cannot be estimated
    #[arg(long, default_value_t = false)]
    pub continue_on_error: bool,

    /// Enable logging (to stderr; RUST_LOG overrides the level)
    #[arg(long, default_value_t = false)]
    pub log: bool,
}

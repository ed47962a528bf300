use crate::pre::read_sim_pars::Variant;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser, Clone)]
#[clap(
    version = "0.1.0",
    name = "PathDrive",
    about = "Draw a path and let a car follow it under manual speed control"
)]
pub struct SimOpts {
    // FLAGS ---------------------------------------------------------------------------------------
    /// Activate debug logging
    #[clap(short, long)]
    pub debug: bool,

    /// Run scripted demo drives on a generated path instead of opening the GUI
    #[clap(long)]
    pub headless: bool,

    // OPTIONS -------------------------------------------------------------------------------------
    /// Set path to the parameter file (OPTIONAL: if not set, built-in defaults are used)
    #[clap(short, long)]
    pub config: Option<PathBuf>,

    /// Set feature variant, "basic" (speed max 10, no metrics) or "extended" (speed max 20,
    /// metrics and chart); overrides the parameter file
    #[clap(long)]
    pub variant: Option<Variant>,

    /// Set target speed of a demo drive in px/tick (only headless, can be given multiple times)
    #[clap(short = 's', long = "demo-speed", default_value = "5")]
    pub demo_speeds: Vec<u32>,

    /// Set motion tick period in milliseconds; overrides the parameter file
    #[clap(short, long)]
    pub tick_period_ms: Option<u64>,

    /// Set maximum number of ticks of a demo drive (only headless)
    #[clap(short, long, default_value = "10000")]
    pub max_ticks: u64,

    /// Set seed of the generated demo path (only headless)
    #[clap(long, default_value = "42")]
    pub seed: u64,

    /// Set directory for exported charts and speed samples
    #[clap(short, long, default_value = "output")]
    pub output_dir: PathBuf,
}

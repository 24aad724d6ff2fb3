pub mod dev;

use std::path::PathBuf;

use clap::Parser;

use crate::model::BundlerKind;

#[derive(Debug, Parser)]
#[command(
    name = "ms2dev",
    about = "Watch, bundle, and serve GooseMod modules locally",
    version
)]
pub struct Cli {
    /// Directory containing the modules to watch and build
    pub dir: PathBuf,

    /// Port for the local HTTP server
    #[arg(required_unless_present = "once")]
    pub port: Option<u16>,

    /// Address to bind the HTTP server to
    #[arg(long, env = "MS2DEV_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Output directory served over HTTP
    #[arg(long, env = "MS2DEV_OUT_DIR", default_value = "devDist")]
    pub out_dir: PathBuf,

    /// Scratch directory the source tree is copied into before each build
    #[arg(long, env = "MS2DEV_SCRATCH_DIR", default_value = "devTemp")]
    pub scratch_dir: PathBuf,

    /// Config file (default: <DIR>/ms2dev.toml if present)
    #[arg(short, long, env = "MS2DEV_CONFIG")]
    pub config: Option<PathBuf>,

    /// Bundler to drive (overrides the config file)
    #[arg(long, env = "MS2DEV_BUNDLER", value_enum)]
    pub bundler: Option<BundlerKind>,

    /// Path to the bundler executable (overrides the config file)
    #[arg(long, env = "MS2DEV_BUNDLER_PATH")]
    pub bundler_path: Option<PathBuf>,

    /// Build once and exit without serving or watching
    #[arg(long)]
    pub once: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

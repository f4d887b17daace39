use clap::Parser;
use serde::{
    Deserialize,
    Serialize,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the grid file (`R C` header followed by R rows of C integers)
    pub grid_path: PathBuf,

    /// Path to a JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// The format to use for the output (will over-write the config file)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Write the results to this file instead of stdout
    #[arg(short, long)]
    pub output_path: Option<PathBuf>,

    /// Build source trails on the rayon thread pool
    #[arg(short, long)]
    pub parallel: bool,

    /// Number of worker threads, implies --parallel
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Only print the first N qualifying paths in text mode
    #[arg(short = 'n', long)]
    pub max_shown: Option<usize>,
}

#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    PrettyJson,
}

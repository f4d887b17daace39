use serde::{
    Deserialize,
    Serialize,
};
use std::path::{
    Path,
    PathBuf,
};
use trailseek::ResolveOptions;

use crate::cli::{
    Cli,
    OutputFormat,
};
use crate::errors::CliError;

#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub resolve: ResolveConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ResolveConfig {
    pub parallel: bool,
    pub threads: Option<usize>,
}

#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub path: Option<PathBuf>,
    pub max_shown: Option<usize>,
}

impl Config {
    pub fn from_path(path: &Path) -> Result<Self, CliError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("unable to read {}: {}", path.display(), e))
        })?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Loads the config file named on the command line (if any) and applies
    /// the command line overrides on top of it.
    pub fn with_cli_args(args: &Cli) -> Result<Self, CliError> {
        let config = match &args.config {
            Some(path) => Self::from_path(path)?,
            None => Self::default(),
        };
        config.apply_overrides(args)
    }

    fn apply_overrides(mut self, args: &Cli) -> Result<Self, CliError> {
        if args.parallel {
            self.resolve.parallel = true;
        }
        if let Some(threads) = args.threads {
            self.resolve.threads = Some(threads);
        }
        if let Some(format) = args.format {
            self.output.format = format;
        }
        if let Some(path) = &args.output_path {
            self.output.path = Some(path.clone());
        }
        if let Some(max_shown) = args.max_shown {
            self.output.max_shown = Some(max_shown);
        }

        if self.resolve.threads == Some(0) {
            return Err(CliError::Config(
                "threads must be at least 1".to_string(),
            ));
        }
        if self.resolve.threads.is_some() {
            self.resolve.parallel = true;
        }
        Ok(self)
    }

    pub fn resolve_options(&self, show_progress: bool) -> ResolveOptions {
        ResolveOptions {
            parallel: self.resolve.parallel,
            show_progress,
        }
    }
}

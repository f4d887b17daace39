use thiserror::Error;
use trailseek::TrailError;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Trail(#[from] TrailError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Error interpreting the config: {0}")]
    Config(String),

    #[error("Unable to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrailError {
    /// The grid source could not be opened or read.
    #[error("Unable to read grid source {}: {source}", path.display())]
    InputNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The grid text or the declared dimensions are inconsistent.
    /// Always raised before any graph is built.
    #[error("Malformed grid: {context}")]
    MalformedGrid { context: String },

    /// The descent graph is not in the shape construction guarantees
    /// (e.g. a cycle, or a child resolved after its parent).
    #[error("Invariant violated: {context}")]
    InvariantViolation { context: String },
}

impl TrailError {
    pub fn malformed(context: impl Into<String>) -> Self {
        Self::MalformedGrid {
            context: context.into(),
        }
    }

    pub fn invariant(context: impl Into<String>) -> Self {
        Self::InvariantViolation {
            context: context.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TrailError>;

//! Error taxonomy for the benchmark harness
//!
//! Every variant is fatal for a run. Library code returns these values and
//! leaves the decision to exit to the binary.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while cataloguing, running or reporting a benchmark
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("usage error: {0}")]
    Usage(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("load failed for {}: {reason}", path.display())]
    Load { path: PathBuf, reason: String },

    #[error("compute failed for {}: {reason}", path.display())]
    Compute { path: PathBuf, reason: String },

    #[error("store failed for {}: {reason}", path.display())]
    Store { path: PathBuf, reason: String },

    #[error("verification failed for {}: {reason}", path.display())]
    Verification { path: PathBuf, reason: String },
}

impl BenchError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Load {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn compute(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Compute {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn store(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Store {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn verification(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Verification {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Short name of the phase that failed, used in the fatal log line
    pub fn phase(&self) -> &'static str {
        match self {
            BenchError::Usage(_) => "usage",
            BenchError::Io { .. } => "io",
            BenchError::Load { .. } => "load",
            BenchError::Compute { .. } => "compute",
            BenchError::Store { .. } => "store",
            BenchError::Verification { .. } => "verify",
        }
    }
}

pub type Result<T> = std::result::Result<T, BenchError>;

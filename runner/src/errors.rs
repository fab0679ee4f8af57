//! Error taxonomy for the run sequence.
//!
//! Every variant is fatal and aborts the run, except `Cleanup`, which
//! is logged and then ignored so a stuck deletion cannot turn an
//! otherwise successful run into a failure.

use std::path::PathBuf;

use thiserror::Error;

use crate::supervisor::SupervisorError;

#[derive(Debug, Error)]
pub enum RunError {
    /// The working directory could not be determined.
    #[error("cannot resolve working directory: {0}")]
    Environment(#[source] std::io::Error),

    /// The manifest file could not be created or written.
    #[error("cannot write manifest {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The supervisor's load call failed. The run aborts here and the
    /// manifest file is deliberately left on disk for inspection.
    #[error("supervisor load failed for {}: {source}", path.display())]
    SupervisorLoad {
        path: PathBuf,
        source: SupervisorError,
    },

    /// The manifest could not be read back for display, e.g. it was
    /// removed externally during the wait.
    #[error("cannot display manifest {}: {message}", path.display())]
    Display { path: PathBuf, message: String },

    /// Deletion of the manifest file failed. Non-fatal.
    #[error("cannot remove manifest {}: {source}", path.display())]
    Cleanup {
        path: PathBuf,
        source: std::io::Error,
    },
}

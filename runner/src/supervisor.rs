//! Thin client for the external supervisor's control binary.
//!
//! The supervisor is an opaque, already-running daemon; the only
//! contact point is its control binary, invoked with direct process
//! arguments (never through a shell) and observed via exit status.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::process::Command;

/// Where the control binary lives relative to a test checkout.
pub const DEFAULT_SUPERVISOR: &str = "../launchctl";

#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("cannot spawn {}: {source}", binary.display())]
    Spawn {
        binary: PathBuf,
        source: std::io::Error,
    },

    #[error("load exited with {status}")]
    Load { status: std::process::ExitStatus },
}

/// Handle on the supervisor's control interface.
#[derive(Debug, Clone)]
pub struct Supervisor {
    binary: PathBuf,
}

impl Supervisor {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Ask the supervisor to load a manifest file.
    ///
    /// Only the boolean exit status is captured; the control binary's
    /// stdout/stderr pass through untouched.
    pub async fn load(&self, manifest: &Path) -> Result<(), SupervisorError> {
        let status = Command::new(&self.binary)
            .arg("load")
            .arg(manifest)
            .status()
            .await
            .map_err(|source| SupervisorError::Spawn {
                binary: self.binary.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(SupervisorError::Load { status })
        }
    }
}

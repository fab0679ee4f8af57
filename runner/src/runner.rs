//! The linear run sequence: write, load, wait, display, delete.

use std::path::{Path, PathBuf};
use std::time::Duration;

use sawrap_manifest::{Manifest, SocketSpec};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::errors::RunError;
use crate::supervisor::{Supervisor, DEFAULT_SUPERVISOR};

/// Fixed name of the transient manifest file.
pub const MANIFEST_FILENAME: &str = "sa-wrapper.json";

/// How long to give the supervisor before reading the manifest back.
/// A flat wait, not a poll; the runner has no visibility into what the
/// supervisor does during this interval.
pub const DEFAULT_WAIT: Duration = Duration::from_secs(2);

/// Knobs for a single run. The defaults reproduce the fixed harness
/// behavior; tests override `wait` and `dir`.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Path to the supervisor control binary.
    pub supervisor: PathBuf,

    /// Interval between the load call and the display step.
    pub wait: Duration,

    /// Directory to run in; `None` means the process working directory.
    pub dir: Option<PathBuf>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            supervisor: PathBuf::from(DEFAULT_SUPERVISOR),
            wait: DEFAULT_WAIT,
            dir: None,
        }
    }
}

/// What a completed run did, for callers that want to verify it.
#[derive(Debug)]
pub struct RunReport {
    /// Where the manifest file was written (and, on success, deleted).
    pub manifest_path: PathBuf,

    /// False when the final deletion failed and was only logged.
    pub cleaned_up: bool,
}

/// The wrapper job manifest: runs `<dir>/test-wrapper` as nobody with
/// the socket-activation shim preloaded, one pre-bound TCP socket on
/// port 8088, and its streams redirected under `dir`.
pub fn wrapper_manifest(dir: &Path) -> Manifest {
    Manifest {
        label: "test.sa-wrapper".to_string(),
        user_name: "nobody".to_string(),
        group_name: "nogroup".to_string(),
        program: dir.join("test-wrapper"),
        program_arguments: Vec::new(),
        environment_variables: [("LD_PRELOAD".to_string(), "sa-wrapper.so".to_string())]
            .into_iter()
            .collect(),
        enable_globbing: true,
        run_at_load: false,
        init_groups: None,
        working_directory: PathBuf::from("/"),
        root_directory: PathBuf::from("/"),
        standard_in_path: PathBuf::from("/dev/null"),
        standard_out_path: dir.join("test-wrapper.out"),
        standard_error_path: dir.join("test-wrapper.err"),
        sockets: [("MyService".to_string(), SocketSpec::service("8088"))]
            .into_iter()
            .collect(),
    }
}

/// Execute one run end to end.
///
/// On success the manifest file no longer exists and its contents were
/// echoed to stdout exactly once. If the supervisor rejects the load,
/// the run aborts immediately and the file stays on disk.
pub async fn run(opts: &RunOptions) -> Result<RunReport, RunError> {
    let dir = match &opts.dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().map_err(RunError::Environment)?,
    };

    let manifest = wrapper_manifest(&dir);
    let path = dir.join(MANIFEST_FILENAME);

    let mut json = serde_json::to_string_pretty(&manifest).map_err(|e| RunError::Write {
        path: path.clone(),
        source: std::io::Error::other(e),
    })?;
    json.push('\n');
    tokio::fs::write(&path, json.as_bytes())
        .await
        .map_err(|source| RunError::Write {
            path: path.clone(),
            source,
        })?;
    info!("wrote manifest {}", path.display());

    let supervisor = Supervisor::new(&opts.supervisor);
    supervisor
        .load(&path)
        .await
        .map_err(|source| RunError::SupervisorLoad {
            path: path.clone(),
            source,
        })?;
    info!("supervisor accepted load of {}", path.display());

    debug!("waiting {:?} for the supervisor to act", opts.wait);
    tokio::time::sleep(opts.wait).await;

    println!("plist:\n");
    display(&path).await?;

    let cleaned_up = match tokio::fs::remove_file(&path).await {
        Ok(()) => true,
        Err(source) => {
            let err = RunError::Cleanup {
                path: path.clone(),
                source,
            };
            warn!("{err}");
            false
        }
    };

    Ok(RunReport {
        manifest_path: path,
        cleaned_up,
    })
}

/// Dump the manifest file's raw contents to stdout.
async fn display(path: &Path) -> Result<(), RunError> {
    let status = Command::new("cat")
        .arg(path)
        .status()
        .await
        .map_err(|e| RunError::Display {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    if status.success() {
        Ok(())
    } else {
        Err(RunError::Display {
            path: path.to_path_buf(),
            message: format!("cat exited with {status}"),
        })
    }
}

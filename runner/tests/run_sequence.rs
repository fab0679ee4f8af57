#![allow(clippy::unwrap_used, clippy::expect_used)]
//! End-to-end run sequence against a stub supervisor.
//!
//! Each test drops an executable shell stub into a temp directory and
//! points the runner at it, so both the success path (load, display,
//! delete) and the abort path (failed load leaves the file on disk)
//! are exercised without a real supervisor.

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use sawrap_manifest::Manifest;
use sawrap_runner::errors::RunError;
use sawrap_runner::runner::{self, RunOptions, MANIFEST_FILENAME};

fn write_stub(dir: &Path, script: &str) -> PathBuf {
    let path = dir.join("launchctl");
    std::fs::write(&path, script).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

fn options(supervisor: PathBuf, dir: &Path) -> RunOptions {
    RunOptions {
        supervisor,
        wait: Duration::ZERO,
        dir: Some(dir.to_path_buf()),
    }
}

#[tokio::test]
async fn successful_run_loads_and_cleans_up() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("load.log");
    // The stub records its argv so the test can check the load call.
    let stub = write_stub(
        dir.path(),
        &format!("#!/bin/sh\necho \"$@\" > '{}'\n", log.display()),
    );

    let report = runner::run(&options(stub, dir.path())).await.unwrap();

    let manifest_path = dir.path().join(MANIFEST_FILENAME);
    assert_eq!(report.manifest_path, manifest_path);
    assert!(report.cleaned_up);
    assert!(!manifest_path.exists(), "manifest must be deleted on success");

    let recorded = std::fs::read_to_string(&log).unwrap();
    assert_eq!(
        recorded.trim(),
        format!("load {}", manifest_path.display()),
        "load must be called with the path that was written"
    );
}

#[tokio::test]
async fn failed_load_aborts_and_leaves_manifest_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let stub = write_stub(dir.path(), "#!/bin/sh\nexit 1\n");

    let err = runner::run(&options(stub, dir.path())).await.unwrap_err();

    assert!(matches!(err, RunError::SupervisorLoad { .. }), "got {err}");
    assert!(
        dir.path().join(MANIFEST_FILENAME).exists(),
        "manifest must remain on disk after a failed load"
    );
}

#[tokio::test]
async fn missing_supervisor_binary_is_a_load_failure() {
    let dir = tempfile::tempdir().unwrap();

    let err = runner::run(&options(dir.path().join("no-such-binary"), dir.path()))
        .await
        .unwrap_err();

    assert!(matches!(err, RunError::SupervisorLoad { .. }), "got {err}");
    assert!(dir.path().join(MANIFEST_FILENAME).exists());
}

#[tokio::test]
async fn manifest_removed_during_load_is_a_display_failure() {
    let dir = tempfile::tempdir().unwrap();
    // The stub accepts the load but deletes the manifest out from
    // under the runner, so the display step finds nothing to read.
    let stub = write_stub(dir.path(), "#!/bin/sh\nrm -f \"$2\"\nexit 0\n");

    let err = runner::run(&options(stub, dir.path())).await.unwrap_err();

    assert!(matches!(err, RunError::Display { .. }), "got {err}");
}

/// Whether a read-only parent directory actually blocks deletion.
/// Root ignores directory write bits, so the cleanup test is skipped
/// when it cannot set the failure up.
fn readonly_dir_blocks_removal() -> bool {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("marker");
    std::fs::write(&file, b"x").unwrap();
    let mut perms = std::fs::metadata(dir.path()).unwrap().permissions();
    perms.set_mode(0o555);
    std::fs::set_permissions(dir.path(), perms).unwrap();
    let blocked = std::fs::remove_file(&file).is_err();
    let mut perms = std::fs::metadata(dir.path()).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(dir.path(), perms).unwrap();
    blocked
}

#[tokio::test]
async fn blocked_deletion_is_nonfatal_and_reported() {
    if !readonly_dir_blocks_removal() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    // The stub makes the run directory read-only so the final delete
    // fails while the write, load, and display steps all succeed.
    let stub = write_stub(
        dir.path(),
        &format!("#!/bin/sh\nchmod 555 '{}'\n", dir.path().display()),
    );

    let report = runner::run(&options(stub, dir.path())).await.unwrap();

    assert!(!report.cleaned_up, "deletion failure must be reported");
    assert!(report.manifest_path.exists());

    // Restore write access so the tempdir can clean itself up.
    let mut perms = std::fs::metadata(dir.path()).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(dir.path(), perms).unwrap();
}

#[tokio::test]
async fn written_manifest_round_trips_with_run_dir_paths() {
    let dir = tempfile::tempdir().unwrap();
    // A failing stub stops the run right after the write, so the file
    // is still there to inspect.
    let stub = write_stub(dir.path(), "#!/bin/sh\nexit 1\n");

    let _ = runner::run(&options(stub, dir.path())).await;

    let raw = std::fs::read_to_string(dir.path().join(MANIFEST_FILENAME)).unwrap();
    let manifest: Manifest = serde_json::from_str(&raw).unwrap();

    assert_eq!(manifest.label, "test.sa-wrapper");
    assert_eq!(manifest.user_name, "nobody");
    assert_eq!(manifest.group_name, "nogroup");
    assert_eq!(manifest.program, dir.path().join("test-wrapper"));
    assert_eq!(manifest.standard_out_path, dir.path().join("test-wrapper.out"));
    assert_eq!(manifest.standard_error_path, dir.path().join("test-wrapper.err"));
    assert_eq!(
        manifest.environment_variables.get("LD_PRELOAD").unwrap(),
        "sa-wrapper.so"
    );
    assert_eq!(
        manifest.sockets.get("MyService").unwrap().sock_service_name,
        "8088"
    );
}

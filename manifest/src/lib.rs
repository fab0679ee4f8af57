//! Job manifest wire format for a launchd-style supervisor.
//!
//! A manifest tells the supervisor how to launch and supervise one
//! program instance: identity to run as, environment, stream
//! redirections, chroot, and the listening sockets the supervisor
//! pre-binds and hands to the child. The wire format is JSON with the
//! supervisor's PascalCase key convention (`Label`, `UserName`,
//! `StandardOutPath`, ...), so the structs here rename accordingly and
//! a serialized manifest is always strict JSON.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A named listening socket the supervisor binds on the job's behalf.
///
/// `sock_service_name` is a service name or port number. The remaining
/// knobs are accepted by the supervisor's manifest grammar but rarely
/// set, so they serialize only when present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SocketSpec {
    pub sock_service_name: String,

    /// Listen rather than connect. Defaults to true supervisor-side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sock_passive: Option<bool>,

    /// Filesystem path for a Unix-domain socket.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sock_path_name: Option<PathBuf>,

    /// Mode bits applied to `sock_path_name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sock_path_mode: Option<u32>,
}

impl SocketSpec {
    /// Socket spec for a TCP service name or port.
    pub fn service(name: impl Into<String>) -> Self {
        Self {
            sock_service_name: name.into(),
            ..Self::default()
        }
    }
}

/// Description of one supervised job.
///
/// Maps (`BTreeMap`) fields keep serialization order deterministic, so
/// two manifests built from the same inputs are byte-identical on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Manifest {
    /// Unique name identifying the job to the supervisor.
    pub label: String,

    /// Unprivileged identity to execute the program under.
    pub user_name: String,
    pub group_name: String,

    /// Absolute path of the executable to launch.
    pub program: PathBuf,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub program_arguments: Vec<String>,

    /// Variables injected into the child's environment.
    pub environment_variables: BTreeMap<String, String>,

    /// Whether shell-style wildcard expansion is permitted for the
    /// program's arguments.
    pub enable_globbing: bool,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub run_at_load: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub init_groups: Option<bool>,

    /// Directory the child starts in.
    pub working_directory: PathBuf,

    /// Filesystem root the child is confined to.
    pub root_directory: PathBuf,

    pub standard_in_path: PathBuf,
    pub standard_out_path: PathBuf,
    pub standard_error_path: PathBuf,

    /// Named sockets the supervisor pre-binds and hands to the child.
    pub sockets: BTreeMap<String, SocketSpec>,
}

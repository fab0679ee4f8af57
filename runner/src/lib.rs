//! `sawrap-runner` — drives one test manifest through an external
//! launchd-style supervisor, end to end.
//!
//! The sequence is strictly linear: build the fixed wrapper manifest,
//! write it to `sa-wrapper.json`, hand the file to the supervisor's
//! `load` command, wait a fixed interval, print the file back, delete
//! it. One abort branch (a failed load), no retries, no concurrency.

pub mod errors;
pub mod runner;
pub mod supervisor;

pub use errors::RunError;
pub use runner::{run, RunOptions, RunReport, MANIFEST_FILENAME};
pub use supervisor::{Supervisor, SupervisorError, DEFAULT_SUPERVISOR};

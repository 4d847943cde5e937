//! Shared E2E test helpers for `hfm` binary tests.

use assert_cmd::cargo::cargo_bin_cmd;
use std::time::Duration;

/// Timeout for a single order.
pub const TIMEOUT_ORDER: Duration = Duration::from_secs(10);

/// Environment variables read by the config loader or the log filter.
const HFM_ENV_VARS: &[&str] = &[
    "HFM_DEBUG",
    "HFM_MAX_DEPTH",
    "HFM_MAX_STEPS",
    "HFM_TRACE_COMMANDS",
    "RUST_LOG",
];

/// Build a Command for the `hfm` binary, isolated from user config.
///
/// Both the home directory and the project root point at a fresh temp
/// directory, so no `.hfm/config.toml` leaks in.
/// Returns (command, guard); keep the guard alive for the test's duration.
pub fn hfm_cmd() -> (assert_cmd::Command, tempfile::TempDir) {
    let tmp = tempfile::tempdir().expect("create temp dir for config");
    let mut cmd: assert_cmd::Command = cargo_bin_cmd!("hfm");
    cmd.timeout(TIMEOUT_ORDER);
    for var in HFM_ENV_VARS {
        cmd.env_remove(var);
    }
    cmd.env("HOME", tmp.path());
    cmd.args(["-C", tmp.path().to_str().expect("valid utf8")]);
    (cmd, tmp)
}

//! Daemon help and version specs
//!
//! Verify recurd --help, --version, and related flags work without
//! acquiring the daemon lock (no startup attempt).

use crate::prelude::*;
use assert_cmd::Command;

fn recurd() -> Command {
    Command::new(recurd_binary())
}

fn stdout_of(args: &[&str]) -> String {
    let assert = recurd().args(args).assert().success();
    String::from_utf8_lossy(&assert.get_output().stdout).into_owned()
}

#[test]
fn recurd_version_shows_version() {
    for flag in ["--version", "-v", "-V"] {
        let stdout = stdout_of(&[flag]);
        assert!(
            stdout.starts_with("recurd 0.1.0"),
            "expected version for {flag}, got: {stdout}"
        );
    }
}

#[test]
fn recurd_help_shows_usage() {
    let stdout = stdout_of(&["--help"]);
    assert!(
        stdout.contains("USAGE:"),
        "expected USAGE section, got: {stdout}"
    );
    assert!(stdout.contains("--help"), "expected --help in output");
    assert!(stdout.contains("--version"), "expected --version in output");
    assert!(stdout.contains("RECUR_MANIFEST"), "expected manifest variable");
}

#[test]
fn recurd_short_help_and_subcommand_show_usage() {
    for flag in ["-h", "help"] {
        let stdout = stdout_of(&[flag]);
        assert!(
            stdout.contains("USAGE:"),
            "expected USAGE section for {flag}, got: {stdout}"
        );
    }
}

#[test]
fn recurd_unknown_arg_fails() {
    let assert = recurd().arg("--bogus").assert().failure();
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr);
    assert!(
        stderr.contains("unexpected argument"),
        "expected error message, got: {stderr}"
    );
}

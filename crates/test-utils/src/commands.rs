#![allow(dead_code)]

//! Canonical shell commands for exercising the process runner (C3).
//!
//! `Task::tokenize_command` is a brittle whitespace split with no shell
//! interpretation, so these all resolve to plain unix binaries rather than
//! anything needing `sh -c` quoting.

/// Exits 0 immediately.
pub fn succeed() -> String {
    "true".to_string()
}

/// Exits 1 immediately.
pub fn fail() -> String {
    "false".to_string()
}

/// Sleeps for `secs` seconds, then exits 0. Used to exercise timeouts and
/// cancellation, which both race against an in-flight process.
pub fn sleep_seconds(secs: u64) -> String {
    format!("sleep {secs}")
}

/// Writes `line` to stdout, then exits 0.
pub fn echo(line: &str) -> String {
    format!("echo {line}")
}

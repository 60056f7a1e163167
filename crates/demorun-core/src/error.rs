//! Error type shared by every stage of a run.

use std::path::PathBuf;

use crate::constants::{exit_codes, MAX_REPORTED_FAILURES};

/// Error raised by discovery, dispatch, or the post-pass.
///
/// Every variant is fatal. [`RunError::exit_code`] gives the status the
/// process should exit with, which for child failures is the child's own.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// A demo run by the sequential strategy exited non-zero.
    #[error("demo {} exited with status {code}", .path.display())]
    DemoFailed { path: PathBuf, code: i32 },

    /// One or more jobs of the process pool failed.
    #[error("{failed} job(s) failed{}", halted_note(.halted))]
    JobsFailed { failed: usize, halted: bool },

    /// The external parallel helper exited non-zero.
    #[error("parallel helper exited with status {code}")]
    HelperFailed { code: i32 },

    /// A fixed post-pass invocation exited non-zero.
    #[error("post-pass {program} exited with status {code}")]
    PostPassFailed { program: String, code: i32 },

    /// A child process could not be started.
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The working directory could not be walked.
    #[error("discovery error: {0}")]
    Discovery(String),

    /// No demo was discovered and the run requires at least one.
    #[error("no demo programs found")]
    NoDemos,

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// The run was cancelled.
    #[error("run cancelled")]
    Cancelled,
}

impl RunError {
    /// Exit status to propagate for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::DemoFailed { code, .. }
            | Self::HelperFailed { code }
            | Self::PostPassFailed { code, .. } => *code,
            Self::JobsFailed { failed, .. } => failure_count_status(*failed),
            Self::Spawn { source, .. } if source.kind() == std::io::ErrorKind::NotFound => {
                exit_codes::ERROR_NOT_FOUND
            }
            Self::Spawn { .. } | Self::Discovery(_) => exit_codes::ERROR_GENERIC,
            Self::NoDemos | Self::Config(_) => exit_codes::ERROR_CONFIG,
            Self::Cancelled => exit_codes::ERROR_CANCELED,
        }
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn halted_note(halted: &bool) -> &'static str {
    if *halted {
        " (halted)"
    } else {
        ""
    }
}

/// Exit status for a number of failed jobs: the count itself, capped.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub fn failure_count_status(failed: usize) -> i32 {
    match failed {
        0 => exit_codes::SUCCESS,
        n if n <= MAX_REPORTED_FAILURES => n as i32,
        _ => MAX_REPORTED_FAILURES as i32 + 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_status_passes_through() {
        let err = RunError::DemoFailed {
            path: PathBuf::from("b/demo2.py"),
            code: 3,
        };
        assert_eq!(err.exit_code(), 3);
        assert_eq!(RunError::HelperFailed { code: 2 }.exit_code(), 2);
        let err = RunError::PostPassFailed {
            program: "hodge.py".into(),
            code: 7,
        };
        assert_eq!(err.exit_code(), 7);
    }

    #[test]
    fn failure_count_is_capped() {
        assert_eq!(failure_count_status(0), 0);
        assert_eq!(failure_count_status(2), 2);
        assert_eq!(failure_count_status(100), 100);
        assert_eq!(failure_count_status(250), 101);
    }

    #[test]
    fn spawn_not_found_is_127() {
        let err = RunError::Spawn {
            program: "python3".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert_eq!(err.exit_code(), 127);

        let err = RunError::Spawn {
            program: "python3".into(),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn config_and_cancel_codes() {
        assert_eq!(RunError::NoDemos.exit_code(), 4);
        assert_eq!(RunError::Config("bad".into()).exit_code(), 4);
        assert_eq!(RunError::Cancelled.exit_code(), 130);
    }

    #[test]
    fn display_messages() {
        let err = RunError::JobsFailed {
            failed: 2,
            halted: true,
        };
        assert_eq!(err.to_string(), "2 job(s) failed (halted)");
        let err = RunError::DemoFailed {
            path: PathBuf::from("b/demo2.py"),
            code: 1,
        };
        assert_eq!(err.to_string(), "demo b/demo2.py exited with status 1");
    }
}

//! Defaults for discovery, dispatch, and the fixed post-pass.

/// File extension that marks a demo program.
pub const DEFAULT_EXTENSION: &str = "py";

/// Interpreter used to run each demo.
pub const DEFAULT_INTERPRETER: &str = "python3";

/// External parallel-job helper looked up on `PATH`.
pub const DEFAULT_HELPER: &str = "parallel";

/// Distributed launcher used for the post-pass invocations.
pub const DEFAULT_LAUNCHER: &str = "mpirun";

/// Flag the launcher takes before the process count.
pub const LAUNCHER_PROCESS_FLAG: &str = "-np";

/// Job slots relative to available cores (`+0` = one job per core).
pub const DEFAULT_JOB_SLOTS: &str = "+0";

/// Number of failed jobs after which no further jobs are scheduled.
pub const DEFAULT_HALT_THRESHOLD: usize = 2;

/// Process count for each fixed post-pass invocation.
pub const POST_PASS_PROCESSES: u32 = 3;

/// Environment variable the simulation library reads to suppress plot windows.
pub const NOPLOT_VAR: &str = "DOLFIN_NOPLOT";

/// Largest failure count reported verbatim as an exit status.
/// Anything above it is reported as `MAX_REPORTED_FAILURES + 1`.
pub const MAX_REPORTED_FAILURES: usize = 100;

/// Exit codes.
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;
    /// Generic error.
    pub const ERROR_GENERIC: i32 = 1;
    /// Invalid configuration, or no demos found with `--require-demos`.
    pub const ERROR_CONFIG: i32 = 4;
    /// Program could not be started.
    pub const ERROR_NOT_FOUND: i32 = 127;
    /// Offset added to a signal number when a child is killed by it.
    pub const SIGNAL_BASE: i32 = 128;
    /// Run cancelled by user (Ctrl+C).
    pub const ERROR_CANCELED: i32 = 130;
}

//! Application configuration from CLI flags and environment.

use std::path::PathBuf;

use clap::Parser;

use demorun_core::constants::{
    DEFAULT_EXTENSION, DEFAULT_HALT_THRESHOLD, DEFAULT_HELPER, DEFAULT_INTERPRETER,
    DEFAULT_LAUNCHER, DEFAULT_JOB_SLOTS,
};
use demorun_core::options::{HaltPolicy, JobSlots, RunOptions, StrategyKind};

/// Run every demo program, stop at the first failure.
///
/// With no arguments: discover `*.py` under the current directory, run them
/// through `parallel` if installed (sequentially otherwise), run the fixed
/// `mpirun` post-pass, then print elapsed and CPU time.
#[derive(Parser, Debug)]
#[command(name = "demorun", version, about)]
pub struct AppConfig {
    /// Root of the demo tree; children run in this directory.
    ///
    /// Defaults to the current working directory, not the directory holding
    /// the demorun binary. Run from the demo tree or pass its path here.
    #[arg(long, default_value = ".", env = "DEMORUN_DIR")]
    pub dir: PathBuf,

    /// File extension of demo programs.
    #[arg(long, default_value = DEFAULT_EXTENSION, env = "DEMORUN_EXTENSION")]
    pub extension: String,

    /// Interpreter that runs each demo.
    #[arg(long, default_value = DEFAULT_INTERPRETER, env = "DEMORUN_INTERPRETER")]
    pub interpreter: String,

    /// Execution strategy: auto, helper, pool, or sequential.
    #[arg(long, default_value = "auto", env = "DEMORUN_STRATEGY")]
    pub strategy: StrategyKind,

    /// Concurrent jobs: +N/-N relative to cores, or a fixed N.
    #[arg(short, long, default_value = DEFAULT_JOB_SLOTS, env = "DEMORUN_JOBS", allow_hyphen_values = true)]
    pub jobs: JobSlots,

    /// Stop scheduling after this many failed jobs (0 = never).
    #[arg(long, default_value_t = DEFAULT_HALT_THRESHOLD, env = "DEMORUN_HALT_ON_ERROR")]
    pub halt_on_error: usize,

    /// External parallel-job helper.
    #[arg(long, default_value = DEFAULT_HELPER, env = "DEMORUN_HELPER")]
    pub helper: String,

    /// Distributed launcher for the post-pass.
    #[arg(long, default_value = DEFAULT_LAUNCHER, env = "DEMORUN_LAUNCHER")]
    pub launcher: String,

    /// JSON plan overriding the post-pass table and child environment.
    #[arg(long, env = "DEMORUN_PLAN")]
    pub plan: Option<PathBuf>,

    /// Fail when no demo program is found.
    #[arg(long)]
    pub require_demos: bool,

    /// Verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet mode (only the timing line).
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Generate shell completion.
    #[arg(long, value_enum)]
    pub completion: Option<clap_complete::Shell>,
}

impl AppConfig {
    /// Parse CLI arguments.
    #[must_use]
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Run options from flags alone, with the built-in post-pass table.
    #[must_use]
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            workdir: self.dir.clone(),
            extension: self.extension.clone(),
            interpreter: self.interpreter.clone(),
            strategy: self.strategy,
            slots: self.jobs,
            halt: HaltPolicy::after(self.halt_on_error),
            helper: self.helper.clone(),
            launcher: self.launcher.clone(),
            require_demos: self.require_demos,
            ..RunOptions::default()
        }
    }
}

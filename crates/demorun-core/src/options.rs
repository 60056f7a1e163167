//! Run options: concurrency, halt policy, strategy choice, and collaborators.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::constants::{
    DEFAULT_EXTENSION, DEFAULT_HALT_THRESHOLD, DEFAULT_HELPER, DEFAULT_INTERPRETER,
    DEFAULT_LAUNCHER,
};
use crate::environment::RunEnvironment;
use crate::error::RunError;
use crate::launch::{default_post_pass, LaunchSpec};

/// Concurrency bound, in the helper's `-j` notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobSlots {
    /// Available cores plus (or minus) an offset: `+0`, `+2`, `-1`.
    PerCore(i64),
    /// A fixed number of slots.
    Fixed(usize),
}

impl Default for JobSlots {
    fn default() -> Self {
        Self::PerCore(0)
    }
}

impl JobSlots {
    /// Resolve against `cores` available processors. Never below 1.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_possible_wrap,
        clippy::cast_sign_loss
    )]
    pub fn resolve(self, cores: usize) -> usize {
        match self {
            Self::PerCore(offset) => (cores as i64).saturating_add(offset).max(1) as usize,
            Self::Fixed(n) => n.max(1),
        }
    }

    /// Resolve against this machine's available parallelism.
    #[must_use]
    pub fn resolve_local(self) -> usize {
        self.resolve(available_cores())
    }
}

/// Number of processors available to this process (at least 1).
#[must_use]
pub fn available_cores() -> usize {
    std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
}

impl fmt::Display for JobSlots {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PerCore(offset) if *offset < 0 => write!(f, "{offset}"),
            Self::PerCore(offset) => write!(f, "+{offset}"),
            Self::Fixed(n) => write!(f, "{n}"),
        }
    }
}

impl FromStr for JobSlots {
    type Err = RunError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || RunError::Config(format!("invalid job slots '{s}'"));
        if let Some(rest) = s.strip_prefix('+') {
            rest.parse().map(Self::PerCore).map_err(|_| invalid())
        } else if s.starts_with('-') {
            s.parse().map(Self::PerCore).map_err(|_| invalid())
        } else {
            match s.parse::<usize>() {
                Ok(0) => Err(RunError::Config("job slots must be at least 1".into())),
                Ok(n) => Ok(Self::Fixed(n)),
                Err(_) => Err(invalid()),
            }
        }
    }
}

/// Stop scheduling new jobs once this many jobs have failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HaltPolicy {
    /// Failure count that halts scheduling; 0 never halts.
    pub threshold: usize,
}

impl Default for HaltPolicy {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_HALT_THRESHOLD,
        }
    }
}

impl HaltPolicy {
    /// Policy that halts after `threshold` failures.
    #[must_use]
    pub fn after(threshold: usize) -> Self {
        Self { threshold }
    }

    /// Whether `failures` observed failures halt scheduling.
    #[must_use]
    pub fn should_halt(self, failures: usize) -> bool {
        self.threshold > 0 && failures >= self.threshold
    }
}

/// How the discovery-driven pass is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrategyKind {
    /// External helper if installed, sequential otherwise.
    #[default]
    Auto,
    /// External parallel helper; it must be installed.
    Helper,
    /// Built-in process pool.
    Pool,
    /// One demo at a time.
    Sequential,
}

impl StrategyKind {
    /// Name as accepted on the command line.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Helper => "helper",
            Self::Pool => "pool",
            Self::Sequential => "sequential",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = RunError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "helper" | "parallel" => Ok(Self::Helper),
            "pool" => Ok(Self::Pool),
            "sequential" | "seq" => Ok(Self::Sequential),
            other => Err(RunError::Config(format!("unknown strategy '{other}'"))),
        }
    }
}

/// Everything a run needs besides the command runner.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Root of the demo tree; also the working directory of every child.
    pub workdir: PathBuf,
    /// Demo file extension, without the dot.
    pub extension: String,
    /// Interpreter that runs one demo file.
    pub interpreter: String,
    /// Strategy for the discovery-driven pass.
    pub strategy: StrategyKind,
    /// Concurrency bound for parallel strategies.
    pub slots: JobSlots,
    /// Halt-on-error policy for parallel strategies.
    pub halt: HaltPolicy,
    /// External parallel helper program.
    pub helper: String,
    /// Distributed launcher program.
    pub launcher: String,
    /// Variables injected into every child.
    pub env: RunEnvironment,
    /// Fixed invocations run after the discovery pass.
    pub post_pass: Vec<LaunchSpec>,
    /// Treat an empty discovery as an error.
    pub require_demos: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            workdir: PathBuf::from("."),
            extension: DEFAULT_EXTENSION.to_string(),
            interpreter: DEFAULT_INTERPRETER.to_string(),
            strategy: StrategyKind::default(),
            slots: JobSlots::default(),
            halt: HaltPolicy::default(),
            helper: DEFAULT_HELPER.to_string(),
            launcher: DEFAULT_LAUNCHER.to_string(),
            env: RunEnvironment::default(),
            post_pass: default_post_pass(),
            require_demos: false,
        }
    }
}

impl RunOptions {
    /// Check the options for values no run could use.
    pub fn validate(&self) -> Result<(), RunError> {
        if self.extension.trim_start_matches('.').is_empty() {
            return Err(RunError::Config("extension must not be empty".into()));
        }
        if self.interpreter.trim().is_empty() {
            return Err(RunError::Config("interpreter must not be empty".into()));
        }
        if !self.workdir.is_dir() {
            return Err(RunError::Config(format!(
                "working directory {} does not exist",
                self.workdir.display()
            )));
        }
        for spec in &self.post_pass {
            spec.validate()?;
        }
        Ok(())
    }
}

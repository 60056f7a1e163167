//! Child-process invocations and their outcomes.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use crate::constants::exit_codes;
use crate::environment::RunEnvironment;

/// A fully specified child-process invocation.
///
/// Built once, then handed to a command runner. The environment is explicit:
/// nothing is read from or written to the runner's own process environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program to execute (looked up on `PATH` if not a path).
    pub program: OsString,
    /// Arguments, in order.
    pub args: Vec<OsString>,
    /// Variables added to the inherited environment.
    pub env: Vec<(String, String)>,
    /// Working directory, or the runner's own if `None`.
    pub cwd: Option<PathBuf>,
    /// Bytes written to the child's standard input, which is closed afterwards.
    /// `None` means stdin is inherited.
    pub stdin: Option<Vec<u8>>,
}

impl Invocation {
    /// Start an invocation of `program` with no arguments.
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        Self {
            program: program.as_ref().to_os_string(),
            args: Vec::new(),
            env: Vec::new(),
            cwd: None,
            stdin: None,
        }
    }

    /// Append one argument.
    #[must_use]
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Append several arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    /// Add every variable of `env` to the child's environment.
    #[must_use]
    pub fn with_env(mut self, env: &RunEnvironment) -> Self {
        self.env
            .extend(env.iter().map(|(k, v)| (k.to_string(), v.to_string())));
        self
    }

    /// Run the child in `dir`.
    #[must_use]
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Feed `input` to the child's standard input.
    #[must_use]
    pub fn stdin(mut self, input: impl Into<Vec<u8>>) -> Self {
        self.stdin = Some(input.into());
        self
    }

    /// Program name as a lossy string, for messages.
    #[must_use]
    pub fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }
}

impl fmt::Display for Invocation {
    /// Shell-like rendering used when echoing commands.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", quote(arg))?;
        }
        Ok(())
    }
}

fn quote(word: &OsStr) -> String {
    let s = word.to_string_lossy();
    if s.is_empty() {
        "''".to_string()
    } else if s.chars().any(|c| c.is_whitespace() || "'\"$`\\".contains(c)) {
        format!("'{}'", s.replace('\'', r"'\''"))
    } else {
        s.into_owned()
    }
}

/// Exit status of a finished child, normalized to a shell-style code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitOutcome {
    /// Exit code; `128 + signal` for children killed by a signal.
    pub code: i32,
}

impl ExitOutcome {
    /// Successful outcome.
    pub const SUCCESS: Self = Self {
        code: exit_codes::SUCCESS,
    };

    /// Outcome with an explicit code.
    #[must_use]
    pub fn from_code(code: i32) -> Self {
        Self { code }
    }

    /// Normalize a process exit status.
    #[must_use]
    pub fn from_status(status: ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return Self { code };
        }
        Self {
            code: signal_code(status),
        }
    }

    /// Whether the child exited with status 0.
    #[must_use]
    pub fn is_success(self) -> bool {
        self.code == exit_codes::SUCCESS
    }
}

#[cfg(unix)]
fn signal_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status
        .signal()
        .map_or(exit_codes::ERROR_GENERIC, |sig| exit_codes::SIGNAL_BASE + sig)
}

#[cfg(not(unix))]
fn signal_code(_status: ExitStatus) -> i32 {
    exit_codes::ERROR_GENERIC
}

//! Command runner backed by real child processes.

use std::io::Write;
use std::process::{Command, Stdio};

use demorun_core::error::RunError;
use demorun_core::invocation::{ExitOutcome, Invocation};

use crate::interfaces::CommandRunner;

/// Spawns each invocation as an OS process with inherited stdout/stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<ExitOutcome, RunError> {
        let spawn_error = |source| RunError::Spawn {
            program: invocation.program_name(),
            source,
        };

        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args)
            .envs(invocation.env.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        if let Some(dir) = &invocation.cwd {
            cmd.current_dir(dir);
        }

        let status = match &invocation.stdin {
            None => cmd.status().map_err(spawn_error)?,
            Some(input) => {
                cmd.stdin(Stdio::piped());
                let mut child = cmd.spawn().map_err(spawn_error)?;
                if let Some(mut stdin) = child.stdin.take() {
                    // A child that exits without reading its input closes the pipe.
                    if let Err(err) = stdin.write_all(input) {
                        if err.kind() != std::io::ErrorKind::BrokenPipe {
                            tracing::warn!("writing job list to {}: {err}", invocation.program_name());
                        }
                    }
                }
                child.wait().map_err(spawn_error)?
            }
        };

        let outcome = ExitOutcome::from_status(status);
        tracing::debug!(command = %invocation, code = outcome.code, "child exited");
        Ok(outcome)
    }
}

//! Test doubles for the runner and presenter seams.
//!
//! Used by this crate's unit tests and by integration tests in other crates.

use parking_lot::Mutex;

use demorun_core::error::RunError;
use demorun_core::invocation::{ExitOutcome, Invocation};
use demorun_core::timing::TimingReport;

use crate::interfaces::{CommandRunner, JobReport, RunPresenter};

/// Command runner that records invocations and answers from a script.
///
/// Every invocation succeeds unless its rendered command line contains a
/// needle registered with [`ScriptedRunner::fail_when`], or its program was
/// registered with [`ScriptedRunner::missing`].
#[derive(Default)]
pub struct ScriptedRunner {
    failures: Vec<(String, i32)>,
    missing: Vec<String>,
    calls: Mutex<Vec<Invocation>>,
}

impl ScriptedRunner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Exit with `code` when the command line contains `needle`.
    #[must_use]
    pub fn fail_when(mut self, needle: impl Into<String>, code: i32) -> Self {
        self.failures.push((needle.into(), code));
        self
    }

    /// Fail to start `program`, as if it were not installed.
    #[must_use]
    pub fn missing(mut self, program: impl Into<String>) -> Self {
        self.missing.push(program.into());
        self
    }

    /// Every invocation seen, in call order.
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().clone()
    }

    /// Rendered command lines, in call order.
    pub fn commands(&self) -> Vec<String> {
        self.calls.lock().iter().map(ToString::to_string).collect()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, invocation: &Invocation) -> Result<ExitOutcome, RunError> {
        self.calls.lock().push(invocation.clone());

        let program = invocation.program_name();
        if self.missing.iter().any(|m| *m == program) {
            return Err(RunError::Spawn {
                program,
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        }

        let line = invocation.to_string();
        let code = self
            .failures
            .iter()
            .find(|(needle, _)| line.contains(needle.as_str()))
            .map_or(0, |(_, code)| *code);
        Ok(ExitOutcome::from_code(code))
    }
}

/// Presenter that remembers everything it was asked to show.
#[derive(Default)]
pub struct RecordingPresenter {
    announced: Mutex<Vec<String>>,
    started: Mutex<Vec<(usize, String)>>,
    finished: Mutex<Vec<JobReport>>,
    timings: Mutex<Vec<TimingReport>>,
}

impl RecordingPresenter {
    /// Commands echoed by the sequential pass.
    pub fn announced(&self) -> Vec<String> {
        self.announced.lock().clone()
    }

    /// Pool jobs started, as `(index, command)`.
    pub fn started(&self) -> Vec<(usize, String)> {
        self.started.lock().clone()
    }

    /// Pool jobs finished.
    pub fn finished(&self) -> Vec<JobReport> {
        self.finished.lock().clone()
    }

    /// Number of timing lines presented.
    pub fn timings(&self) -> usize {
        self.timings.lock().len()
    }
}

impl RunPresenter for RecordingPresenter {
    fn announce(&self, invocation: &Invocation) {
        self.announced.lock().push(invocation.to_string());
    }

    fn job_started(&self, index: usize, invocation: &Invocation) {
        self.started.lock().push((index, invocation.to_string()));
    }

    fn job_finished(&self, report: &JobReport) {
        self.finished.lock().push(report.clone());
    }

    fn present_timing(&self, report: &TimingReport) {
        self.timings.lock().push(*report);
    }
}

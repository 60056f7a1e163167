//! Orchestration interfaces.

use std::time::Duration;

use demorun_core::discovery::DemoItem;
use demorun_core::error::RunError;
use demorun_core::invocation::{ExitOutcome, Invocation};
use demorun_core::timing::TimingReport;

/// Runs one child invocation to completion.
///
/// The seam between dispatch logic and the operating system; tests swap in a
/// scripted runner.
pub trait CommandRunner: Send + Sync {
    /// Run `invocation` and wait for it.
    ///
    /// `Err` only when the child could not be started; a child that ran and
    /// failed is `Ok` with a non-zero outcome.
    fn run(&self, invocation: &Invocation) -> Result<ExitOutcome, RunError>;
}

/// Trait for presenting run progress to the user.
pub trait RunPresenter: Send + Sync {
    /// Echo a command about to run in the sequential pass.
    fn announce(&self, invocation: &Invocation);

    /// A pool job was dispatched.
    fn job_started(&self, index: usize, invocation: &Invocation);

    /// A pool job finished.
    fn job_finished(&self, report: &JobReport);

    /// Final timing line.
    fn present_timing(&self, report: &TimingReport);
}

/// Result of a single pool job.
#[derive(Debug, Clone)]
pub struct JobReport {
    /// Dispatch index (position in discovery order).
    pub index: usize,
    /// The demo that ran.
    pub item: DemoItem,
    /// Normalized exit status.
    pub outcome: ExitOutcome,
    /// Wall-clock duration of the job.
    pub duration: Duration,
}

/// Null presenter (does nothing).
pub struct NullPresenter;

impl RunPresenter for NullPresenter {
    fn announce(&self, _invocation: &Invocation) {}
    fn job_started(&self, _index: usize, _invocation: &Invocation) {}
    fn job_finished(&self, _report: &JobReport) {}
    fn present_timing(&self, _report: &TimingReport) {}
}

//! Execution strategy trait and the context strategies run in.

use demorun_core::cancel::CancellationToken;
use demorun_core::discovery::DemoItem;
use demorun_core::error::RunError;
use demorun_core::invocation::Invocation;
use demorun_core::options::RunOptions;

use crate::interfaces::{CommandRunner, RunPresenter};

/// Everything a strategy needs to run jobs.
pub struct ExecutionContext<'a> {
    pub options: &'a RunOptions,
    pub runner: &'a dyn CommandRunner,
    pub presenter: &'a dyn RunPresenter,
    pub cancel: &'a CancellationToken,
}

impl ExecutionContext<'_> {
    /// `<interpreter> <demo>` with the run environment, in the working directory.
    #[must_use]
    pub fn job_invocation(&self, item: &DemoItem) -> Invocation {
        item.invocation(&self.options.interpreter)
            .with_env(&self.options.env)
            .current_dir(&self.options.workdir)
    }
}

/// What a successful discovery-driven pass did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassSummary {
    /// Strategy that ran the pass.
    pub strategy: &'static str,
    /// Demos handed to the strategy.
    pub submitted: usize,
}

/// A way of running the discovered demos.
///
/// Implementations fail fast: the first error (or the halt threshold, for
/// parallel strategies) ends the pass with `Err`.
pub trait ExecutionStrategy: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Run every item.
    fn execute(
        &self,
        items: &[DemoItem],
        ctx: &ExecutionContext<'_>,
    ) -> Result<PassSummary, RunError>;
}

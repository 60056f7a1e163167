//! One demo at a time, echoing each command, aborting on the first failure.

use demorun_core::discovery::DemoItem;
use demorun_core::error::RunError;

use crate::strategy::{ExecutionContext, ExecutionStrategy, PassSummary};

/// Sequential fallback used when no parallel helper is installed.
#[derive(Debug, Default, Clone, Copy)]
pub struct SequentialStrategy;

impl ExecutionStrategy for SequentialStrategy {
    fn name(&self) -> &'static str {
        "sequential"
    }

    fn execute(
        &self,
        items: &[DemoItem],
        ctx: &ExecutionContext<'_>,
    ) -> Result<PassSummary, RunError> {
        for item in items {
            ctx.cancel.check_cancelled()?;

            let invocation = ctx.job_invocation(item);
            ctx.presenter.announce(&invocation);

            let outcome = ctx.runner.run(&invocation)?;
            if !outcome.is_success() {
                return Err(RunError::DemoFailed {
                    path: item.path.clone(),
                    code: outcome.code,
                });
            }
        }

        Ok(PassSummary {
            strategy: self.name(),
            submitted: items.len(),
        })
    }
}

//! Delegation to an external parallel-job helper (GNU `parallel`).

use std::path::{Path, PathBuf};

use demorun_core::discovery::DemoItem;
use demorun_core::error::RunError;
use demorun_core::invocation::Invocation;
use demorun_core::options::{HaltPolicy, JobSlots};

use crate::strategy::{ExecutionContext, ExecutionStrategy, PassSummary};

/// Hands the whole job list to the helper in one invocation.
///
/// The list goes to the helper's standard input, one path per line, so an
/// empty set is an empty input rather than a malformed argument list.
#[derive(Debug, Clone)]
pub struct HelperStrategy {
    program: PathBuf,
    slots: JobSlots,
    halt: HaltPolicy,
}

impl HelperStrategy {
    #[must_use]
    pub fn new(program: impl Into<PathBuf>, slots: JobSlots, halt: HaltPolicy) -> Self {
        Self {
            program: program.into(),
            slots,
            halt,
        }
    }

    /// `<helper> -j<slots> --halt-on-error <n> -v -n1 <interpreter>` fed the job list.
    #[must_use]
    pub fn invocation(&self, items: &[DemoItem], ctx: &ExecutionContext<'_>) -> Invocation {
        let job_list = job_list(items);

        Invocation::new(&self.program)
            .arg(format!("-j{}", self.slots))
            .arg("--halt-on-error")
            .arg(self.halt.threshold.to_string())
            .arg("-v")
            .arg("-n1")
            .arg(&ctx.options.interpreter)
            .with_env(&ctx.options.env)
            .current_dir(&ctx.options.workdir)
            .stdin(job_list)
    }
}

/// One path per line, as raw bytes so non-UTF-8 names reach the helper intact.
fn job_list(items: &[DemoItem]) -> Vec<u8> {
    let mut list = Vec::new();
    for item in items {
        list.extend_from_slice(&path_bytes(&item.path));
        list.push(b'\n');
    }
    list
}

#[cfg(unix)]
fn path_bytes(path: &Path) -> std::borrow::Cow<'_, [u8]> {
    use std::os::unix::ffi::OsStrExt;
    std::borrow::Cow::Borrowed(path.as_os_str().as_bytes())
}

#[cfg(not(unix))]
fn path_bytes(path: &Path) -> std::borrow::Cow<'_, [u8]> {
    std::borrow::Cow::Owned(path.to_string_lossy().into_owned().into_bytes())
}

impl ExecutionStrategy for HelperStrategy {
    fn name(&self) -> &'static str {
        "helper"
    }

    fn execute(
        &self,
        items: &[DemoItem],
        ctx: &ExecutionContext<'_>,
    ) -> Result<PassSummary, RunError> {
        ctx.cancel.check_cancelled()?;

        let invocation = self.invocation(items, ctx);
        tracing::info!(jobs = items.len(), command = %invocation, "dispatching to parallel helper");

        let outcome = ctx.runner.run(&invocation)?;
        if !outcome.is_success() {
            return Err(RunError::HelperFailed { code: outcome.code });
        }

        Ok(PassSummary {
            strategy: self.name(),
            submitted: items.len(),
        })
    }
}

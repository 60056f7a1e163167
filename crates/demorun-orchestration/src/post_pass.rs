//! Fixed post-pass: hard-coded demos under the distributed launcher.

use demorun_core::error::RunError;

use crate::strategy::ExecutionContext;

/// Run every post-pass entry in order, stopping at the first failure.
///
/// Returns the number of entries run.
pub fn run_post_pass(ctx: &ExecutionContext<'_>) -> Result<usize, RunError> {
    let options = ctx.options;
    for spec in &options.post_pass {
        ctx.cancel.check_cancelled()?;

        let invocation = spec.invocation(
            &options.launcher,
            &options.interpreter,
            &options.workdir,
            &options.env,
        );
        tracing::info!(command = %invocation, "post-pass");

        let outcome = ctx.runner.run(&invocation)?;
        if !outcome.is_success() {
            return Err(RunError::PostPassFailed {
                program: spec.program.display().to_string(),
                code: outcome.code,
            });
        }
    }
    Ok(options.post_pass.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingPresenter, ScriptedRunner};
    use demorun_core::cancel::CancellationToken;
    use demorun_core::launch::LaunchSpec;
    use demorun_core::options::RunOptions;

    #[test]
    fn runs_default_table_in_order() {
        let opts = RunOptions::default();
        let runner = ScriptedRunner::new();
        let cancel = CancellationToken::new();
        let ctx = ExecutionContext {
            options: &opts,
            runner: &runner,
            presenter: &RecordingPresenter::default(),
            cancel: &cancel,
        };
        assert_eq!(run_post_pass(&ctx).unwrap(), 2);
        assert_eq!(
            runner.commands(),
            vec![
                "mpirun -np 3 python3 fenics-book/hodge.py N=4",
                "mpirun -np 3 python3 parallelmixedpoisson.py",
            ]
        );
    }

    #[test]
    fn first_failure_stops() {
        let opts = RunOptions::default();
        let runner = ScriptedRunner::new().fail_when("hodge.py", 5);
        let cancel = CancellationToken::new();
        let ctx = ExecutionContext {
            options: &opts,
            runner: &runner,
            presenter: &RecordingPresenter::default(),
            cancel: &cancel,
        };
        let err = run_post_pass(&ctx).unwrap_err();
        assert!(matches!(err, RunError::PostPassFailed { code: 5, .. }));
        assert_eq!(runner.commands().len(), 1);
    }

    #[test]
    fn second_failure_propagates() {
        let opts = RunOptions::default();
        let runner = ScriptedRunner::new().fail_when("parallelmixedpoisson", 1);
        let cancel = CancellationToken::new();
        let ctx = ExecutionContext {
            options: &opts,
            runner: &runner,
            presenter: &RecordingPresenter::default(),
            cancel: &cancel,
        };
        let err = run_post_pass(&ctx).unwrap_err();
        assert_eq!(err.exit_code(), 1);
        assert_eq!(runner.commands().len(), 2);
    }

    #[test]
    fn custom_table() {
        let opts = RunOptions {
            launcher: "mpiexec".into(),
            post_pass: vec![LaunchSpec {
                program: "stokes.py".into(),
                args: vec!["N=8".into()],
                processes: 4,
            }],
            ..RunOptions::default()
        };
        let runner = ScriptedRunner::new();
        let cancel = CancellationToken::new();
        let ctx = ExecutionContext {
            options: &opts,
            runner: &runner,
            presenter: &RecordingPresenter::default(),
            cancel: &cancel,
        };
        run_post_pass(&ctx).unwrap();
        assert_eq!(runner.commands(), vec!["mpiexec -np 4 python3 stokes.py N=8"]);
    }

    #[test]
    fn empty_table_is_noop() {
        let opts = RunOptions {
            post_pass: Vec::new(),
            ..RunOptions::default()
        };
        let runner = ScriptedRunner::new();
        let cancel = CancellationToken::new();
        let ctx = ExecutionContext {
            options: &opts,
            runner: &runner,
            presenter: &RecordingPresenter::default(),
            cancel: &cancel,
        };
        assert_eq!(run_post_pass(&ctx).unwrap(), 0);
    }
}

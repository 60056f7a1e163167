//! Built-in process pool with a halt-after-N-failures policy.
//!
//! Worker threads pull demos from a shared queue and run one child process
//! each. Once the halt threshold is reached no new job is dispatched; jobs
//! already running are waited for.

use std::time::Instant;

use crossbeam_channel::Receiver;
use parking_lot::Mutex;

use demorun_core::discovery::DemoItem;
use demorun_core::error::RunError;
use demorun_core::invocation::ExitOutcome;
use demorun_core::options::HaltPolicy;

use crate::interfaces::JobReport;
use crate::strategy::{ExecutionContext, ExecutionStrategy, PassSummary};

/// Parallel strategy that fans demos out over `slots` child processes.
#[derive(Debug, Clone, Copy)]
pub struct PoolStrategy {
    slots: usize,
    halt: HaltPolicy,
}

#[derive(Debug, Default)]
struct PoolState {
    failed: usize,
    halted: bool,
}

impl PoolStrategy {
    /// Pool with at most `slots` concurrent jobs (at least 1).
    #[must_use]
    pub fn new(slots: usize, halt: HaltPolicy) -> Self {
        Self {
            slots: slots.max(1),
            halt,
        }
    }

    /// Resolved concurrency bound.
    #[must_use]
    pub fn slots(&self) -> usize {
        self.slots
    }

    fn worker(
        &self,
        queue: &Receiver<(usize, &DemoItem)>,
        state: &Mutex<PoolState>,
        ctx: &ExecutionContext<'_>,
    ) {
        while let Ok((index, item)) = queue.recv() {
            if state.lock().halted || ctx.cancel.is_cancelled() {
                break;
            }

            let invocation = ctx.job_invocation(item);
            ctx.presenter.job_started(index, &invocation);

            let start = Instant::now();
            let outcome = ctx.runner.run(&invocation).unwrap_or_else(|err| {
                tracing::warn!("{err}");
                ExitOutcome::from_code(err.exit_code())
            });
            let duration = start.elapsed();

            ctx.presenter.job_finished(&JobReport {
                index,
                item: item.clone(),
                outcome,
                duration,
            });

            if !outcome.is_success() {
                let mut state = state.lock();
                state.failed += 1;
                if !state.halted && self.halt.should_halt(state.failed) {
                    state.halted = true;
                    tracing::warn!(
                        failed = state.failed,
                        threshold = self.halt.threshold,
                        "halt threshold reached, no new jobs will start"
                    );
                }
            }
        }
    }
}

impl ExecutionStrategy for PoolStrategy {
    fn name(&self) -> &'static str {
        "pool"
    }

    fn execute(
        &self,
        items: &[DemoItem],
        ctx: &ExecutionContext<'_>,
    ) -> Result<PassSummary, RunError> {
        let workers = self.slots.min(items.len());
        tracing::info!(jobs = items.len(), workers, "dispatching to process pool");

        let (tx, rx) = crossbeam_channel::unbounded();
        for job in items.iter().enumerate() {
            // The receiver is alive until the end of this function.
            let _ = tx.send(job);
        }
        drop(tx);

        let state = Mutex::new(PoolState::default());
        std::thread::scope(|scope| {
            for _ in 0..workers {
                scope.spawn(|| self.worker(&rx, &state, ctx));
            }
        });

        let state = state.into_inner();
        if state.failed > 0 {
            return Err(RunError::JobsFailed {
                failed: state.failed,
                halted: state.halted,
            });
        }
        ctx.cancel.check_cancelled()?;

        Ok(PassSummary {
            strategy: self.name(),
            submitted: items.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use crate::interfaces::CommandRunner;
    use crate::testing::{RecordingPresenter, ScriptedRunner};
    use demorun_core::cancel::CancellationToken;
    use demorun_core::invocation::Invocation;
    use demorun_core::options::RunOptions;

    fn items(n: usize) -> Vec<DemoItem> {
        (0..n).map(|i| DemoItem::new(format!("d{i:02}.py"))).collect()
    }

    fn run_pool(
        pool: PoolStrategy,
        runner: &ScriptedRunner,
        presenter: &RecordingPresenter,
        cancel: &CancellationToken,
        jobs: &[DemoItem],
    ) -> Result<PassSummary, RunError> {
        let opts = RunOptions::default();
        let ctx = ExecutionContext {
            options: &opts,
            runner,
            presenter,
            cancel,
        };
        pool.execute(jobs, &ctx)
    }

    #[test]
    fn all_jobs_succeed() {
        let runner = ScriptedRunner::new();
        let presenter = RecordingPresenter::default();
        let summary = run_pool(
            PoolStrategy::new(4, HaltPolicy::default()),
            &runner,
            &presenter,
            &CancellationToken::new(),
            &items(10),
        )
        .unwrap();
        assert_eq!(summary.submitted, 10);
        assert_eq!(runner.commands().len(), 10);
        assert_eq!(presenter.finished().len(), 10);
        assert_eq!(presenter.started().len(), 10);
    }

    #[test]
    fn single_failure_fails_pass_without_halting() {
        let runner = ScriptedRunner::new().fail_when("d03.py", 1);
        let err = run_pool(
            PoolStrategy::new(1, HaltPolicy::default()),
            &runner,
            &RecordingPresenter::default(),
            &CancellationToken::new(),
            &items(6),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RunError::JobsFailed {
                failed: 1,
                halted: false
            }
        ));
        assert_eq!(err.exit_code(), 1);
        // Below the threshold every job still runs.
        assert_eq!(runner.commands().len(), 6);
    }

    #[test]
    fn halts_after_two_failures() {
        let runner = ScriptedRunner::new()
            .fail_when("d01.py", 1)
            .fail_when("d02.py", 1);
        let err = run_pool(
            PoolStrategy::new(1, HaltPolicy::default()),
            &runner,
            &RecordingPresenter::default(),
            &CancellationToken::new(),
            &items(8),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RunError::JobsFailed {
                failed: 2,
                halted: true
            }
        ));
        assert_eq!(err.exit_code(), 2);
        // One worker: d00, d01, d02 ran, nothing after the halt.
        assert_eq!(runner.commands().len(), 3);
    }

    #[test]
    fn halt_bounds_fan_out_with_many_workers() {
        let runner = ScriptedRunner::new().fail_when(".py", 1);
        let jobs = items(40);
        let err = run_pool(
            PoolStrategy::new(4, HaltPolicy::default()),
            &runner,
            &RecordingPresenter::default(),
            &CancellationToken::new(),
            &jobs,
        )
        .unwrap_err();
        let RunError::JobsFailed { failed, halted } = err else {
            panic!("unexpected error: {err}");
        };
        assert!(halted);
        assert!(failed >= 2);
        // At most one in-flight job per worker can finish after the halt.
        assert!(runner.commands().len() <= 2 + 4);
    }

    #[test]
    fn zero_threshold_never_halts() {
        let runner = ScriptedRunner::new().fail_when(".py", 1);
        let err = run_pool(
            PoolStrategy::new(2, HaltPolicy::after(0)),
            &runner,
            &RecordingPresenter::default(),
            &CancellationToken::new(),
            &items(5),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RunError::JobsFailed {
                failed: 5,
                halted: false
            }
        ));
    }

    #[test]
    fn spawn_error_counts_as_failure() {
        let runner = ScriptedRunner::new().missing("python3");
        let presenter = RecordingPresenter::default();
        let err = run_pool(
            PoolStrategy::new(1, HaltPolicy::default()),
            &runner,
            &presenter,
            &CancellationToken::new(),
            &items(3),
        )
        .unwrap_err();
        assert!(matches!(err, RunError::JobsFailed { failed: 2, .. }));
        assert!(presenter.finished().iter().all(|r| r.outcome.code == 127));
    }

    #[test]
    fn empty_set_succeeds() {
        let runner = ScriptedRunner::new();
        let summary = run_pool(
            PoolStrategy::new(4, HaltPolicy::default()),
            &runner,
            &RecordingPresenter::default(),
            &CancellationToken::new(),
            &[],
        )
        .unwrap();
        assert_eq!(summary.submitted, 0);
        assert!(runner.commands().is_empty());
    }

    #[test]
    fn cancelled_pool_dispatches_nothing() {
        let runner = ScriptedRunner::new();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = run_pool(
            PoolStrategy::new(2, HaltPolicy::default()),
            &runner,
            &RecordingPresenter::default(),
            &cancel,
            &items(4),
        )
        .unwrap_err();
        assert!(matches!(err, RunError::Cancelled));
        assert!(runner.commands().is_empty());
    }

    #[test]
    fn slots_never_zero() {
        assert_eq!(PoolStrategy::new(0, HaltPolicy::default()).slots(), 1);
    }

    /// Tracks how many `run` calls overlap.
    #[derive(Default)]
    struct ConcurrencyRunner {
        in_flight: AtomicUsize,
        max_seen: AtomicUsize,
        total: AtomicUsize,
    }

    impl CommandRunner for ConcurrencyRunner {
        fn run(&self, _invocation: &Invocation) -> Result<ExitOutcome, RunError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_seen.fetch_max(now, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(20));
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.total.fetch_add(1, Ordering::SeqCst);
            Ok(ExitOutcome::SUCCESS)
        }
    }

    #[test]
    fn concurrency_capped_at_slots() {
        let runner = ConcurrencyRunner::default();
        let opts = RunOptions::default();
        let cancel = CancellationToken::new();
        let ctx = ExecutionContext {
            options: &opts,
            runner: &runner,
            presenter: &RecordingPresenter::default(),
            cancel: &cancel,
        };

        PoolStrategy::new(2, HaltPolicy::default())
            .execute(&items(8), &ctx)
            .unwrap();

        assert_eq!(runner.total.load(Ordering::SeqCst), 8);
        assert!(runner.max_seen.load(Ordering::SeqCst) <= 2);
        assert_eq!(runner.in_flight.load(Ordering::SeqCst), 0);
    }
}

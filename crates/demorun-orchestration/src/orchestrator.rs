//! Core orchestration: discovery, the demo pass, the post-pass, and timing.

use demorun_core::cancel::CancellationToken;
use demorun_core::discovery::discover_by_extension;
use demorun_core::environment::which;
use demorun_core::error::RunError;
use demorun_core::options::RunOptions;
use demorun_core::timing::{Stopwatch, TimingReport};

use crate::interfaces::{CommandRunner, RunPresenter};
use crate::post_pass::run_post_pass;
use crate::strategy::{ExecutionContext, PassSummary};
use crate::strategy_selection::{select_strategy, ToolLocator};

/// What a successful run did.
#[derive(Debug, Clone)]
pub struct SuiteReport {
    /// Number of demos discovered.
    pub discovered: usize,
    /// The discovery-driven pass.
    pub pass: PassSummary,
    /// Number of post-pass invocations run.
    pub post_pass: usize,
    /// Elapsed and CPU time, as presented.
    pub timing: TimingReport,
}

/// Runs a whole suite against a command runner and a presenter.
pub struct Orchestrator<'a> {
    runner: &'a dyn CommandRunner,
    presenter: &'a dyn RunPresenter,
    cancel: CancellationToken,
    locate: Box<ToolLocator<'a>>,
}

impl<'a> Orchestrator<'a> {
    /// Orchestrator that looks the helper up on `PATH`.
    #[must_use]
    pub fn new(runner: &'a dyn CommandRunner, presenter: &'a dyn RunPresenter) -> Self {
        Self {
            runner,
            presenter,
            cancel: CancellationToken::new(),
            locate: Box::new(which),
        }
    }

    /// Share a cancellation token (e.g. with a Ctrl+C handler).
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Replace the helper lookup.
    #[must_use]
    pub fn with_locator(mut self, locate: impl Fn(&str) -> Option<std::path::PathBuf> + 'a) -> Self {
        self.locate = Box::new(locate);
        self
    }

    /// Discover, run the demo pass, run the post-pass, present timing.
    ///
    /// The first failure ends the run; nothing after it executes.
    pub fn run(&self, options: &RunOptions) -> Result<SuiteReport, RunError> {
        let stopwatch = Stopwatch::start();
        options.validate()?;

        let items = discover_by_extension(&options.workdir, &options.extension)?;
        if items.is_empty() {
            if options.require_demos {
                return Err(RunError::NoDemos);
            }
            tracing::warn!(
                dir = %options.workdir.display(),
                extension = %options.extension,
                "no demo programs found"
            );
        }

        let strategy = select_strategy(options, self.locate.as_ref())?;
        tracing::info!(
            strategy = strategy.name(),
            demos = items.len(),
            "starting demo pass"
        );

        let ctx = ExecutionContext {
            options,
            runner: self.runner,
            presenter: self.presenter,
            cancel: &self.cancel,
        };
        let pass = strategy.execute(&items, &ctx)?;
        let post_pass = run_post_pass(&ctx)?;

        let timing = stopwatch.report();
        self.presenter.present_timing(&timing);

        Ok(SuiteReport {
            discovered: items.len(),
            pass,
            post_pass,
            timing,
        })
    }
}

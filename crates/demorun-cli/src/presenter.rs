//! CLI run presenter.

use std::fmt;
use std::io::{self, Write};

use console::style;
use parking_lot::Mutex;

use demorun_core::invocation::Invocation;
use demorun_core::timing::TimingReport;
use demorun_orchestration::interfaces::{JobReport, RunPresenter};

use crate::output::{format_duration, format_outcome, format_timing};

type Sink = Mutex<Box<dyn Write + Send>>;

/// Prints echoed commands and pool job lines to stdout, timing last.
///
/// Quiet mode keeps only the timing line; verbose mode adds a line per
/// finished pool job. Failed jobs are reported on stderr.
pub struct CliPresenter {
    verbose: bool,
    quiet: bool,
    out: Sink,
    err: Sink,
}

impl CliPresenter {
    /// Presenter writing to the process's stdout and stderr.
    #[must_use]
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self::with_writers(verbose, quiet, io::stdout(), io::stderr())
    }

    /// Presenter writing to the given sinks.
    pub fn with_writers(
        verbose: bool,
        quiet: bool,
        out: impl Write + Send + 'static,
        err: impl Write + Send + 'static,
    ) -> Self {
        Self {
            verbose,
            quiet,
            out: Mutex::new(Box::new(out)),
            err: Mutex::new(Box::new(err)),
        }
    }

    fn line(sink: &Sink, text: fmt::Arguments<'_>) {
        // Write errors (closed pipe) are dropped.
        let _ = writeln!(sink.lock(), "{text}");
    }
}

impl RunPresenter for CliPresenter {
    fn announce(&self, invocation: &Invocation) {
        if !self.quiet {
            Self::line(&self.out, format_args!("{invocation}"));
        }
    }

    fn job_started(&self, index: usize, invocation: &Invocation) {
        if !self.quiet {
            Self::line(&self.out, format_args!("[{index}] {invocation}"));
        }
    }

    fn job_finished(&self, report: &JobReport) {
        if self.quiet {
            return;
        }
        if !report.outcome.is_success() {
            Self::line(
                &self.err,
                format_args!(
                    "[{}] {} {} [{}]",
                    report.index,
                    style("FAILED").red().bold(),
                    report.item,
                    format_outcome(report.outcome)
                ),
            );
        } else if self.verbose {
            Self::line(
                &self.out,
                format_args!(
                    "[{}] {} {} in {}",
                    report.index,
                    style("done").green(),
                    report.item,
                    format_duration(report.duration)
                ),
            );
        }
    }

    fn present_timing(&self, report: &TimingReport) {
        Self::line(&self.out, format_args!("{}", format_timing(report)));
    }
}

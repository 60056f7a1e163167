//! CLI output formatting.

use std::time::Duration;

use demorun_core::invocation::ExitOutcome;
use demorun_core::timing::TimingReport;

/// Format a duration for display.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 0.001 {
        format!("{:.2}µs", secs * 1_000_000.0)
    } else if secs < 1.0 {
        format!("{:.2}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{secs:.3}s")
    } else {
        let mins = (secs / 60.0).floor() as u64;
        let remaining = secs - (mins as f64 * 60.0);
        format!("{mins}m{remaining:.1}s")
    }
}

/// The single timing line printed at the end of a successful run.
///
/// CPU time covers this process and every child it has waited for.
#[must_use]
pub fn format_timing(report: &TimingReport) -> String {
    let elapsed = format_duration(report.elapsed);
    match report.cpu {
        Some(cpu) => {
            let total = cpu.accumulated();
            format!(
                "Elapsed: {elapsed}  CPU: {} (user {}, sys {})",
                format_duration(total.total()),
                format_duration(total.user),
                format_duration(total.system),
            )
        }
        None => format!("Elapsed: {elapsed}  CPU: n/a"),
    }
}

/// Short status word for a finished job.
#[must_use]
pub fn format_outcome(outcome: ExitOutcome) -> String {
    if outcome.is_success() {
        "ok".to_string()
    } else {
        format!("exit {}", outcome.code)
    }
}

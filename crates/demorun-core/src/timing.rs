//! Wall-clock and CPU accounting for the final timing report.

use std::time::{Duration, Instant};

/// User and system CPU time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuTimes {
    pub user: Duration,
    pub system: Duration,
}

impl CpuTimes {
    /// User plus system time.
    #[must_use]
    pub fn total(self) -> Duration {
        self.user + self.system
    }
}

impl std::ops::Add for CpuTimes {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            user: self.user + rhs.user,
            system: self.system + rhs.system,
        }
    }
}

/// CPU usage of this process and of its reaped children.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessCpu {
    pub own: CpuTimes,
    pub children: CpuTimes,
}

impl ProcessCpu {
    /// Read the current counters. `None` where the platform has no `getrusage`.
    #[must_use]
    pub fn sample() -> Option<Self> {
        sample_rusage()
    }

    /// Own plus children.
    #[must_use]
    pub fn accumulated(self) -> CpuTimes {
        self.own + self.children
    }
}

#[cfg(unix)]
fn sample_rusage() -> Option<ProcessCpu> {
    use nix::sys::resource::{getrusage, Usage, UsageWho};
    use nix::sys::time::TimeVal;

    fn duration(tv: TimeVal) -> Duration {
        let secs = u64::try_from(tv.tv_sec()).unwrap_or(0);
        let micros = u64::try_from(tv.tv_usec()).unwrap_or(0);
        Duration::from_secs(secs) + Duration::from_micros(micros)
    }

    fn times(usage: &Usage) -> CpuTimes {
        CpuTimes {
            user: duration(usage.user_time()),
            system: duration(usage.system_time()),
        }
    }

    let own = getrusage(UsageWho::RUSAGE_SELF).ok()?;
    let children = getrusage(UsageWho::RUSAGE_CHILDREN).ok()?;
    Some(ProcessCpu {
        own: times(&own),
        children: times(&children),
    })
}

#[cfg(not(unix))]
fn sample_rusage() -> Option<ProcessCpu> {
    None
}

/// Measures one run from start to report.
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    started: Instant,
}

impl Stopwatch {
    /// Start measuring now.
    #[must_use]
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    /// Wall-clock time since start.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Snapshot for the timing report.
    #[must_use]
    pub fn report(&self) -> TimingReport {
        TimingReport {
            elapsed: self.elapsed(),
            cpu: ProcessCpu::sample(),
        }
    }
}

/// Elapsed and CPU time printed at the end of a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingReport {
    pub elapsed: Duration,
    pub cpu: Option<ProcessCpu>,
}

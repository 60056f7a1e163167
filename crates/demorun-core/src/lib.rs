//! # demorun-core
//!
//! Domain model for the demo runner: discovery of demo programs, the
//! invocation and outcome types, the environment injected into children,
//! concurrency and halt policies, the fixed post-pass table, and timing.

pub mod cancel;
pub mod constants;
pub mod discovery;
pub mod environment;
pub mod error;
pub mod invocation;
pub mod launch;
pub mod options;
pub mod timing;

// Re-exports
pub use cancel::CancellationToken;
pub use constants::exit_codes;
pub use discovery::{discover, discover_by_extension, DemoItem, DemoPattern};
pub use environment::RunEnvironment;
pub use error::RunError;
pub use invocation::{ExitOutcome, Invocation};
pub use launch::{default_post_pass, LaunchSpec};
pub use options::{HaltPolicy, JobSlots, RunOptions, StrategyKind};
pub use timing::{CpuTimes, ProcessCpu, Stopwatch, TimingReport};

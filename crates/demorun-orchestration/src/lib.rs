//! # demorun-orchestration
//!
//! Execution strategies (sequential, process pool, external helper),
//! strategy selection, the fixed post-pass, and suite orchestration.

pub mod helper;
pub mod interfaces;
pub mod orchestrator;
pub mod pool;
pub mod post_pass;
pub mod process;
pub mod sequential;
pub mod strategy;
pub mod strategy_selection;
pub mod testing;

pub use interfaces::{CommandRunner, JobReport, NullPresenter, RunPresenter};
pub use orchestrator::{Orchestrator, SuiteReport};
pub use process::SystemRunner;
pub use strategy::{ExecutionContext, ExecutionStrategy, PassSummary};
pub use strategy_selection::select_strategy;

//! # demorun-cli
//!
//! Terminal output: command echo, per-job log, timing report, and shell completion.

pub mod completion;
pub mod output;
pub mod presenter;

pub use presenter::CliPresenter;

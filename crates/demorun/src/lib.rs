//! demorun library: application logic for the demo runner.

pub mod app;
pub mod config;
pub mod errors;
pub mod plan;

//! Workspace-level integration tests for demorun.
//!
//! The tests live in `tests/`; this crate has no code of its own.

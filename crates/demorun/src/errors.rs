//! Error handling and exit codes.

use demorun_core::constants::exit_codes;
use demorun_core::error::RunError;

/// Exit status for an application error.
///
/// A [`RunError`] anywhere in the chain decides the status (a failing
/// child's own status passes through); anything else is a configuration
/// problem such as an unreadable plan file.
#[must_use]
pub fn exit_code(err: &anyhow::Error) -> u8 {
    let code = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<RunError>())
        .map_or(exit_codes::ERROR_CONFIG, RunError::exit_code);
    clamp_status(code)
}

/// Fit a status into the 1..=255 range the OS reports.
#[must_use]
pub fn clamp_status(code: i32) -> u8 {
    match u8::try_from(code) {
        Ok(0) | Err(_) => 1,
        Ok(code) => code,
    }
}

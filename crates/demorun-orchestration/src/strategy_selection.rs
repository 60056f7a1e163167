//! Strategy selection logic.

use std::path::PathBuf;

use demorun_core::error::RunError;
use demorun_core::options::{RunOptions, StrategyKind};

use crate::helper::HelperStrategy;
use crate::pool::PoolStrategy;
use crate::sequential::SequentialStrategy;
use crate::strategy::ExecutionStrategy;

/// Resolves a program name to an installed executable.
pub type ToolLocator<'a> = dyn Fn(&str) -> Option<PathBuf> + 'a;

/// Pick the strategy for the discovery-driven pass.
///
/// `Auto` uses the helper when `locate` finds it and falls back to the
/// sequential loop otherwise.
pub fn select_strategy(
    options: &RunOptions,
    locate: &ToolLocator<'_>,
) -> Result<Box<dyn ExecutionStrategy>, RunError> {
    match options.strategy {
        StrategyKind::Auto => match locate(options.helper.as_str()) {
            Some(path) => Ok(helper_strategy(path, options)),
            None => {
                tracing::info!(helper = %options.helper, "parallel helper not found, running sequentially");
                Ok(Box::new(SequentialStrategy))
            }
        },
        StrategyKind::Helper => {
            let path = locate(options.helper.as_str()).ok_or_else(|| {
                RunError::Config(format!("parallel helper '{}' not found", options.helper))
            })?;
            Ok(helper_strategy(path, options))
        }
        StrategyKind::Pool => {
            let pool = PoolStrategy::new(options.slots.resolve_local(), options.halt);
            tracing::debug!(slots = pool.slots(), requested = %options.slots, "using process pool");
            Ok(Box::new(pool))
        }
        StrategyKind::Sequential => Ok(Box::new(SequentialStrategy)),
    }
}

fn helper_strategy(path: PathBuf, options: &RunOptions) -> Box<dyn ExecutionStrategy> {
    tracing::debug!(helper = %path.display(), "using parallel helper");
    Box::new(HelperStrategy::new(path, options.slots, options.halt))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn found(name: &str) -> Option<PathBuf> {
        Some(PathBuf::from("/usr/bin").join(name))
    }

    fn not_found(_: &str) -> Option<PathBuf> {
        None
    }

    fn opts(strategy: StrategyKind) -> RunOptions {
        RunOptions {
            strategy,
            ..RunOptions::default()
        }
    }

    #[test]
    fn auto_prefers_helper() {
        let s = select_strategy(&opts(StrategyKind::Auto), &found).unwrap();
        assert_eq!(s.name(), "helper");
    }

    #[test]
    fn auto_falls_back_to_sequential() {
        let s = select_strategy(&opts(StrategyKind::Auto), &not_found).unwrap();
        assert_eq!(s.name(), "sequential");
    }

    #[test]
    fn explicit_helper_requires_installation() {
        let result = select_strategy(&opts(StrategyKind::Helper), &not_found);
        assert!(matches!(result, Err(RunError::Config(_))));
        let s = select_strategy(&opts(StrategyKind::Helper), &found).unwrap();
        assert_eq!(s.name(), "helper");
    }

    #[test]
    fn pool_and_sequential_ignore_helper() {
        let s = select_strategy(&opts(StrategyKind::Pool), &found).unwrap();
        assert_eq!(s.name(), "pool");
        let s = select_strategy(&opts(StrategyKind::Sequential), &found).unwrap();
        assert_eq!(s.name(), "sequential");
    }

    #[test]
    fn locator_sees_configured_helper_name() {
        let options = RunOptions {
            helper: "my-parallel".into(),
            ..RunOptions::default()
        };
        let locate = |name: &str| (name == "my-parallel").then(|| PathBuf::from(name));
        let s = select_strategy(&options, &locate).unwrap();
        assert_eq!(s.name(), "helper");
    }
}

//! Application entry point and dispatch.

use anyhow::Result;

use demorun_cli::presenter::CliPresenter;
use demorun_core::cancel::CancellationToken;
use demorun_core::options::RunOptions;
use demorun_orchestration::{Orchestrator, SystemRunner};

use crate::config::AppConfig;
use crate::plan::load_plan;

/// Run the application.
pub fn run(config: &AppConfig) -> Result<()> {
    // Handle shell completion
    if let Some(shell) = config.completion {
        let mut cmd = <AppConfig as clap::CommandFactory>::command();
        demorun_cli::completion::generate_completion(&mut cmd, shell, &mut std::io::stdout());
        return Ok(());
    }

    let options = resolve_options(config)?;
    run_suite(config, &options)
}

/// Flags plus the optional plan file.
pub fn resolve_options(config: &AppConfig) -> Result<RunOptions> {
    let mut options = config.run_options();
    if let Some(path) = &config.plan {
        load_plan(path)?.apply(&mut options);
    }
    Ok(options)
}

fn run_suite(config: &AppConfig, options: &RunOptions) -> Result<()> {
    let cancel = CancellationToken::new();
    ctrlc_handler(cancel.clone());

    let runner = SystemRunner::new();
    let presenter = CliPresenter::new(config.verbose, config.quiet);
    let report = Orchestrator::new(&runner, &presenter)
        .with_cancellation(cancel)
        .run(options)?;

    tracing::info!(
        demos = report.discovered,
        strategy = report.pass.strategy,
        post_pass = report.post_pass,
        "all demos passed"
    );
    Ok(())
}

fn ctrlc_handler(cancel: CancellationToken) {
    if let Err(err) = ctrlc::set_handler(move || cancel.cancel()) {
        tracing::warn!("Ctrl+C handler not installed: {err}");
    }
}

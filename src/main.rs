mod cli;
mod config;
mod error;
mod failed;
mod logging;
mod orchestrator;
mod payload;
mod queue;
mod resolver;
mod ui;

use std::pin::pin;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command, SelectionArgs};
use config::RequeueConfig;
use console::Style;
use futures::StreamExt;
use orchestrator::RetryOrchestrator;
use ui::RetryProgress;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {e:#}", Style::new().red().bold().apply_to("error:"));
            ExitCode::from(2)
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = RequeueConfig::load(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    let store = config.build_store();
    let queue = Arc::new(config.build_queue()?);
    tracing::debug!(
        connections = ?queue.connection_names().collect::<Vec<_>>(),
        "queue connections ready"
    );
    let orchestrator = RetryOrchestrator::new(store, queue);

    match cli.command {
        Command::Retry(args) => retry(&orchestrator, &args).await,
        Command::List(args) => list(&orchestrator, &args).await,
    }
}

async fn retry(orchestrator: &RetryOrchestrator, args: &SelectionArgs) -> Result<ExitCode> {
    let outcomes = orchestrator
        .run(args.criteria())
        .await
        .context("failed to select failed jobs")?;
    let mut outcomes = pin!(outcomes);

    let progress = (!args.json).then(RetryProgress::start);
    let (mut succeeded, mut failed) = (0usize, 0usize);
    while let Some(outcome) = outcomes.next().await {
        if outcome.is_success() {
            succeeded += 1;
        } else {
            failed += 1;
        }
        match &progress {
            Some(progress) => progress.report(&outcome),
            None => ui::print_json(&outcome)?,
        }
    }
    if let Some(progress) = &progress {
        progress.finish(succeeded, failed);
    }

    Ok(if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn list(orchestrator: &RetryOrchestrator, args: &SelectionArgs) -> Result<ExitCode> {
    let records = orchestrator
        .preview(&args.criteria())
        .await
        .context("failed to select failed jobs")?;

    if args.json {
        for record in &records {
            ui::print_json(record)?;
        }
    } else {
        ui::print_records(&records);
    }
    Ok(ExitCode::SUCCESS)
}

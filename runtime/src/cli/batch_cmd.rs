//! `fame batch <input.csv>`: score every artist in a dataset and write
//! the enriched CSV plus the unresolved log.

use crate::batch::{self, BatchOrchestrator, BatchOutcome, Dataset};
use crate::browser::chromium::ChromiumLauncher;
use crate::browser::BrowserSession;
use crate::cli::output::{self, Styled};
use crate::config::FameConfig;
use crate::pool::SessionPool;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Per-invocation overrides of the batch settings.
#[derive(Debug, Default)]
pub struct BatchArgs {
    pub output: Option<PathBuf>,
    pub unresolved_log: Option<PathBuf>,
    pub column: Option<String>,
    pub workers: Option<usize>,
}

/// Run the batch command.
pub async fn run(input: &Path, args: BatchArgs, config: &FameConfig) -> Result<()> {
    let mut config = config.clone();
    if let Some(column) = args.column {
        config.batch.entity_column = column;
    }
    if let Some(workers) = args.workers {
        config.batch.workers = workers.max(1);
    }
    let output_path = args.output.unwrap_or_else(|| config.batch.output.clone());
    let log_path = args
        .unresolved_log
        .unwrap_or_else(|| config.batch.unresolved_log.clone());

    let mut dataset =
        Dataset::read(input).with_context(|| format!("reading {}", input.display()))?;
    let entities = dataset
        .column(&config.batch.entity_column)
        .with_context(|| format!("in {}", input.display()))?;

    let s = Styled::new();
    let show_progress = !output::is_quiet() && !output::is_json();
    if show_progress {
        output::print_header(&s);
        eprintln!(
            "  Scoring {} row(s) from {} with {} worker(s)",
            entities.len(),
            input.display(),
            config.batch.workers
        );
        eprintln!();
    }

    let pool = SessionPool::new(
        Arc::new(ChromiumLauncher),
        config.browser.clone(),
        config.batch.workers,
    );
    let bar = if show_progress {
        progress_bar(entities.len() as u64)
    } else {
        ProgressBar::hidden()
    };

    let mut orchestrator = BatchOrchestrator::new(&config, &pool).with_progress(bar.clone());
    let outcome = if config.batch.workers > 1 {
        orchestrator.run_pooled(&entities).await
    } else {
        let mut session = BrowserSession::new();
        let outcome = orchestrator.run(&entities, &mut session).await;
        session.close().await;
        outcome
    };
    bar.finish_and_clear();

    batch::export(
        &outcome,
        &mut dataset,
        &config.batch,
        &output_path,
        &log_path,
    )?;

    if output::is_json() {
        output::print_json(&summary_json(&outcome, &output_path, &log_path));
    } else if !output::is_quiet() {
        print_summary(&s, &outcome, &output_path, &log_path);
    }

    Ok(())
}

fn progress_bar(len: u64) -> ProgressBar {
    let bar = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::with_template("  {bar:30.cyan/blue} {pos}/{len} {msg}") {
        bar.set_style(style);
    }
    bar
}

fn summary_json(outcome: &BatchOutcome, output: &Path, log: &Path) -> serde_json::Value {
    serde_json::json!({
        "run_id": outcome.run_id,
        "started_at": outcome.started_at,
        "finished_at": outcome.finished_at,
        "rows": outcome.outcomes.len(),
        "queried": outcome.queried,
        "unresolved": outcome.unresolved.iter().collect::<Vec<_>>(),
        "failed": outcome.failed(),
        "output": output.display().to_string(),
        "unresolved_log": log.display().to_string(),
    })
}

fn print_summary(s: &Styled, outcome: &BatchOutcome, output: &Path, log: &Path) {
    let elapsed = (outcome.finished_at - outcome.started_at)
        .num_seconds()
        .max(0) as u64;
    let scored = outcome
        .outcomes
        .iter()
        .filter(|o| o.value().is_some())
        .count();

    output::print_section(s, "Results");
    output::print_check(
        s.ok_sym(),
        "Scored:",
        &format!("{scored} of {} row(s)", outcome.outcomes.len()),
    );
    output::print_check(
        s.ok_sym(),
        "Queried:",
        &format!(
            "{} unique name(s) in {}",
            outcome.queried,
            output::format_duration(elapsed)
        ),
    );
    let unresolved_sym = if outcome.unresolved.is_empty() {
        s.ok_sym()
    } else {
        s.warn_sym()
    };
    output::print_check(
        unresolved_sym,
        "Unresolved:",
        &outcome.unresolved.len().to_string(),
    );
    if output::is_verbose() {
        for name in outcome.unresolved.iter() {
            output::print_detail(&s.dim(name));
        }
    }
    if outcome.failed() > 0 {
        output::print_check(
            s.fail_sym(),
            "Failed:",
            &format!("{} (scored as 0)", outcome.failed()),
        );
    }
    eprintln!();
    output::print_check(s.ok_sym(), "Output:", &s.green(&output.display().to_string()));
    output::print_check(s.ok_sym(), "Unresolved log:", &log.display().to_string());
    output::print_status(
        s,
        &s.green("done"),
        &format!("run {}", &outcome.run_id[..8.min(outcome.run_id.len())]),
    );
}

//! Batch scoring: orchestration, the unresolved log, and dataset export.

pub mod dataset;
pub mod orchestrator;
pub mod unresolved;

pub use dataset::Dataset;
pub use orchestrator::{score_entity, BatchOrchestrator, BatchOutcome, EntityOutcome, FameCache};
pub use unresolved::UnresolvedSet;

use crate::config::BatchSettings;
use anyhow::{Context, Result};
use std::path::Path;

/// Persist a finished run: write the unresolved log, merge the fame column
/// after the entity column, and write the dataset to `output`.
pub fn export(
    outcome: &BatchOutcome,
    dataset: &mut Dataset,
    settings: &BatchSettings,
    output: &Path,
    unresolved_log: &Path,
) -> Result<()> {
    outcome.unresolved.write_log(unresolved_log)?;

    let column: Vec<Option<String>> = outcome
        .column(dataset.len())
        .into_iter()
        .map(|v| v.map(|n| n.to_string()))
        .collect();
    dataset
        .insert_column_after(&settings.entity_column, &settings.fame_column, &column)
        .context("merging fame column")?;
    dataset
        .write(output)
        .with_context(|| format!("writing {}", output.display()))?;
    Ok(())
}

//! Batch fame scoring over a list of entity names.
//!
//! Each unique name is resolved once per run; repeats reuse the cached
//! outcome. Session faults are contained per entity: the entity scores 0
//! and the session is re-initialized before the next one.

use super::unresolved::UnresolvedSet;
use crate::browser::BrowserSession;
use crate::config::FameConfig;
use crate::extract::BiographyExtractor;
use crate::fame::fame;
use crate::pool::SessionPool;
use chrono::{DateTime, Utc};
use indicatif::ProgressBar;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::{info, warn};
use uuid::Uuid;

/// Result of scoring one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EntityOutcome {
    /// A biography was found.
    Scored { fame: u32 },
    /// Every strategy was exhausted without a biography.
    Unresolved,
    /// The session faulted while resolving.
    Failed { reason: String },
    /// Blank name; nothing was queried.
    Skipped,
}

impl EntityOutcome {
    /// Value for the dataset column. Absent is distinct from 0.
    pub fn value(&self) -> Option<u32> {
        match self {
            Self::Scored { fame } => Some(*fame),
            Self::Failed { .. } => Some(0),
            Self::Unresolved | Self::Skipped => None,
        }
    }

    /// Fame as a plain integer, 0 when unavailable.
    pub fn fame_or_zero(&self) -> u32 {
        self.value().unwrap_or(0)
    }
}

/// Per-run memo of outcomes by entity name.
#[derive(Debug, Default)]
pub struct FameCache {
    entries: HashMap<String, EntityOutcome>,
}

impl FameCache {
    pub fn get(&self, name: &str) -> Option<&EntityOutcome> {
        self.entries.get(name)
    }

    pub fn insert(&mut self, name: &str, outcome: EntityOutcome) {
        self.entries.insert(name.to_string(), outcome);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Everything a batch run produced.
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// One outcome per input entity, in input order.
    pub outcomes: Vec<EntityOutcome>,
    pub unresolved: UnresolvedSet,
    /// Names actually queried (cache misses).
    pub queried: usize,
}

impl BatchOutcome {
    /// Column values aligned to the input entities.
    pub fn scores(&self) -> Vec<Option<u32>> {
        self.outcomes.iter().map(EntityOutcome::value).collect()
    }

    /// Column values padded with absent markers up to `len` rows.
    pub fn column(&self, len: usize) -> Vec<Option<u32>> {
        let mut scores = self.scores();
        if scores.len() < len {
            scores.resize(len, None);
        }
        scores
    }

    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, EntityOutcome::Failed { .. }))
            .count()
    }
}

/// Score one entity, containing session faults.
pub async fn score_entity(
    extractor: &BiographyExtractor<'_>,
    name: &str,
    session: &mut BrowserSession,
    unresolved: &mut UnresolvedSet,
) -> EntityOutcome {
    match extractor.extract(name, session, unresolved).await {
        Ok(Some(bio)) => EntityOutcome::Scored {
            fame: fame(Some(&bio)),
        },
        Ok(None) => EntityOutcome::Unresolved,
        Err(e) => {
            warn!("{name}: {e}; scoring as 0");
            EntityOutcome::Failed {
                reason: e.to_string(),
            }
        }
    }
}

/// Drives the pipeline over a batch, owning the cache and unresolved set.
pub struct BatchOrchestrator<'a> {
    config: &'a FameConfig,
    pool: &'a SessionPool,
    cache: FameCache,
    unresolved: UnresolvedSet,
    progress: ProgressBar,
}

impl<'a> BatchOrchestrator<'a> {
    /// `pool` supplies sessions for pooled runs and re-initializes the
    /// caller's session after faults in sequential runs.
    pub fn new(config: &'a FameConfig, pool: &'a SessionPool) -> Self {
        Self {
            config,
            pool,
            cache: FameCache::default(),
            unresolved: UnresolvedSet::new(),
            progress: ProgressBar::hidden(),
        }
    }

    /// Report progress (one tick per input entity) on `bar`.
    pub fn with_progress(mut self, bar: ProgressBar) -> Self {
        self.progress = bar;
        self
    }

    pub fn cache(&self) -> &FameCache {
        &self.cache
    }

    pub fn unresolved(&self) -> &UnresolvedSet {
        &self.unresolved
    }

    /// Score `entities` in order on a single session.
    pub async fn run(&mut self, entities: &[String], session: &mut BrowserSession) -> BatchOutcome {
        let started_at = Utc::now();
        let extractor = BiographyExtractor::new(self.config);
        let mut outcomes = Vec::with_capacity(entities.len());
        let mut queried = 0;

        for name in entities {
            let outcome = match self.cache.get(name) {
                Some(cached) => cached.clone(),
                None if name.trim().is_empty() => EntityOutcome::Skipped,
                None => {
                    queried += 1;
                    let outcome = self.query(&extractor, name, session).await;
                    self.cache.insert(name, outcome.clone());
                    outcome
                }
            };
            self.progress.inc(1);
            outcomes.push(outcome);
        }

        self.finish(started_at, outcomes, queried)
    }

    async fn query(
        &mut self,
        extractor: &BiographyExtractor<'_>,
        name: &str,
        session: &mut BrowserSession,
    ) -> EntityOutcome {
        if !session.is_active() {
            if let Err(e) = self.pool.initialize(session).await {
                warn!("{name}: could not start browser: {e}; scoring as 0");
                return EntityOutcome::Failed {
                    reason: e.to_string(),
                };
            }
        }
        let outcome = score_entity(extractor, name, session, &mut self.unresolved).await;
        if matches!(outcome, EntityOutcome::Failed { .. }) {
            // the next query starts from a fresh browser
            session.close().await;
        }
        outcome
    }

    /// Score `entities` with up to `batch.workers` sessions from the pool.
    ///
    /// Unique uncached names are dealt round-robin to the workers; results
    /// are merged in first-seen order, so the outcome matches a sequential
    /// run.
    pub async fn run_pooled(&mut self, entities: &[String]) -> BatchOutcome {
        let started_at = Utc::now();

        let mut seen = HashSet::new();
        let pending: Vec<&str> = entities
            .iter()
            .map(String::as_str)
            .filter(|n| !n.trim().is_empty() && self.cache.get(n).is_none())
            .filter(|n| seen.insert(*n))
            .collect();

        let workers = self
            .config
            .batch
            .workers
            .max(1)
            .min(self.pool.max_sessions())
            .min(pending.len());
        // zero workers (and no browser) when everything is blank or cached
        let mut shares: Vec<Vec<(usize, &str)>> = vec![Vec::new(); workers];
        for (pos, name) in pending.iter().enumerate() {
            shares[pos % workers].push((pos, name));
        }
        info!("scoring {} unique name(s) with {workers} worker(s)", pending.len());

        let extractor = BiographyExtractor::new(self.config);
        let pool = self.pool;
        let progress = &self.progress;
        let reports = futures::future::join_all(
            shares
                .into_iter()
                .map(|share| run_worker(pool, &extractor, share, progress)),
        )
        .await;

        let mut results: Vec<(usize, &str, EntityOutcome)> = reports.into_iter().flatten().collect();
        results.sort_by_key(|(pos, _, _)| *pos);
        for (_, name, outcome) in results {
            if outcome == EntityOutcome::Unresolved {
                self.unresolved.record(name);
            }
            self.cache.insert(name, outcome);
        }

        let outcomes = entities
            .iter()
            .map(|name| {
                self.cache
                    .get(name)
                    .cloned()
                    .unwrap_or(EntityOutcome::Skipped)
            })
            .collect();
        self.progress
            .inc(entities.len().saturating_sub(pending.len()) as u64);

        self.finish(started_at, outcomes, pending.len())
    }

    fn finish(
        &self,
        started_at: DateTime<Utc>,
        outcomes: Vec<EntityOutcome>,
        queried: usize,
    ) -> BatchOutcome {
        let outcome = BatchOutcome {
            run_id: Uuid::new_v4().to_string(),
            started_at,
            finished_at: Utc::now(),
            outcomes,
            unresolved: self.unresolved.clone(),
            queried,
        };
        info!(
            "batch {}: {} entities, {} queried, {} unresolved, {} failed",
            outcome.run_id,
            outcome.outcomes.len(),
            outcome.queried,
            outcome.unresolved.len(),
            outcome.failed()
        );
        outcome
    }
}

/// Score one worker's share on its own session.
async fn run_worker<'n>(
    pool: &SessionPool,
    extractor: &BiographyExtractor<'_>,
    share: Vec<(usize, &'n str)>,
    progress: &ProgressBar,
) -> Vec<(usize, &'n str, EntityOutcome)> {
    let mut handle = match pool.acquire().await {
        Ok(handle) => handle,
        Err(e) => {
            warn!("worker could not start browser: {e}; scoring its share as 0");
            progress.inc(share.len() as u64);
            return share
                .into_iter()
                .map(|(pos, name)| {
                    (
                        pos,
                        name,
                        EntityOutcome::Failed {
                            reason: e.to_string(),
                        },
                    )
                })
                .collect();
        }
    };

    // the orchestrator rebuilds the shared set from the outcomes
    let mut unresolved = UnresolvedSet::new();
    let mut results = Vec::with_capacity(share.len());
    for (pos, name) in share {
        let session = handle.session_mut();
        let outcome = if session.is_active() {
            score_entity(extractor, name, session, &mut unresolved).await
        } else {
            match pool.initialize(session).await {
                Ok(_) => score_entity(extractor, name, session, &mut unresolved).await,
                Err(e) => EntityOutcome::Failed {
                    reason: e.to_string(),
                },
            }
        };
        if matches!(outcome, EntityOutcome::Failed { .. }) {
            handle.session_mut().close().await;
        }
        progress.inc(1);
        results.push((pos, name, outcome));
    }

    pool.release(handle).await;
    results
}

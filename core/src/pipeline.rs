//! Run orchestration.
//!
//! One run is a single batch pass: fetch every enabled source, snapshot
//! today's sets, rebuild the window artifacts, prune old snapshots, then
//! emit the consensus prefix artifact. The first fetch or storage failure
//! aborts the whole run; the next scheduled invocation starts over.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDate;
use siftr_common::config::Config;
use siftr_common::success;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::info;

use crate::fetch::IndicatorSource;
use crate::store::SnapshotStore;
use crate::{consensus, output, retention, window};

/// Upper bound on concurrent feed downloads.
const FETCH_WORKERS: usize = 8;

/// Name of the consensus prefix artifact inside the data directory.
const CONSENSUS_ARTIFACT: &str = "aggregated.txt";

#[derive(Debug, Default)]
pub struct RunReport {
    pub fetched_sources: usize,
    pub window_artifacts: usize,
    pub evicted_snapshots: usize,
    pub consensus_lines: usize,
}

/// Fetches all sources concurrently, bounded by [`FETCH_WORKERS`].
///
/// Fail-fast: the first error aborts the remaining downloads and the run.
pub async fn fetch_all(
    sources: Vec<Arc<dyn IndicatorSource>>,
) -> anyhow::Result<Vec<(String, BTreeSet<String>)>> {
    let semaphore = Arc::new(Semaphore::new(FETCH_WORKERS));
    let mut tasks = JoinSet::new();

    for source in sources {
        let semaphore = semaphore.clone();
        tasks.spawn(async move {
            let _permit = semaphore.acquire().await.expect("semaphore closed");
            let name = source.name().to_string();
            info!("Fetching feed `{name}`");
            let indicators = source.fetch().await?;
            anyhow::Ok((name, indicators))
        });
    }

    let mut fetched = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        // Dropping the set on error aborts the still-running downloads.
        fetched.push(joined??);
    }
    Ok(fetched)
}

/// Rebuilds every `(source, window)` artifact from the stored snapshots.
pub fn write_window_artifacts(
    cfg: &Config,
    store: &dyn SnapshotStore,
    today: NaiveDate,
) -> anyhow::Result<usize> {
    let mut written = 0;
    for source in cfg.enabled_sources() {
        for win in &cfg.windows {
            let lines = window::aggregate(store, &source.name, win, today)?;
            let path = cfg.data_dir.join(&source.name).join(format!("{}.txt", win.label));
            output::write_lines(&path, &lines)?;
            written += 1;
        }
    }
    Ok(written)
}

/// Prunes every enabled source down to `max_raw_days` snapshots.
pub fn prune_all(cfg: &Config, store: &dyn SnapshotStore) -> anyhow::Result<usize> {
    let mut evicted = 0;
    for source in cfg.enabled_sources() {
        evicted += retention::prune(store, &source.name, cfg.max_raw_days)?.len();
    }
    Ok(evicted)
}

/// Summarizes `date`'s snapshots across all enabled sources into the
/// consensus prefix artifact. Returns the number of emitted lines.
pub fn write_consensus_artifact(
    cfg: &Config,
    store: &dyn SnapshotStore,
    date: NaiveDate,
) -> anyhow::Result<usize> {
    let sources: Vec<_> = cfg.enabled_sources().cloned().collect();
    let counts = consensus::assemble(store, &sources, date)?;

    let params = consensus::SummaryParams {
        promote_threshold: cfg.promote_threshold,
        max_lines: cfg.max_lines,
    };
    let lines = consensus::render(&consensus::summarize(&counts, &params));

    output::write_lines(&cfg.data_dir.join(CONSENSUS_ARTIFACT), &lines)?;
    Ok(lines.len())
}

/// Executes a full batch run for `today`.
pub async fn run(
    cfg: &Config,
    store: &dyn SnapshotStore,
    sources: Vec<Arc<dyn IndicatorSource>>,
    today: NaiveDate,
) -> anyhow::Result<RunReport> {
    let fetched = fetch_all(sources).await?;
    let fetched_sources = fetched.len();

    for (name, indicators) in &fetched {
        store.put(name, today, indicators)?;
        success!("Stored {} indicators for `{name}`", indicators.len());
    }

    let window_artifacts = write_window_artifacts(cfg, store, today)?;
    let evicted_snapshots = prune_all(cfg, store)?;
    let consensus_lines = write_consensus_artifact(cfg, store, today)?;

    Ok(RunReport {
        fetched_sources,
        window_artifacts,
        evicted_snapshots,
        consensus_lines,
    })
}

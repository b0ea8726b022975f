//! Snapshot retention.
//!
//! Bounds per-source history to a fixed number of daily snapshots. Eviction
//! is FIFO by date; indicator contents and access recency play no part.
//! Runs after the current day's snapshot has been written, so a fresh
//! snapshot is never evicted by its own run.

use tracing::info;

use crate::store::SnapshotStore;

/// Deletes all but the `max_keep` most recent snapshots for `source`.
///
/// Returns the evicted dates, oldest first. Deletion is permanent.
pub fn prune(
    store: &dyn SnapshotStore,
    source: &str,
    max_keep: usize,
) -> anyhow::Result<Vec<chrono::NaiveDate>> {
    let dates = store.list(source)?;
    if dates.len() <= max_keep {
        return Ok(Vec::new());
    }

    let evict = dates[..dates.len() - max_keep].to_vec();
    for date in &evict {
        info!("Removing old raw snapshot: {source}/{date}");
        store.remove(source, *date)?;
    }
    Ok(evict)
}

//! Trailing-window aggregation.
//!
//! A window of `days` covers `[today - (days - 1), today]`. The aggregate is
//! the union of every stored snapshot inside that range, sorted
//! lexicographically, deduplicated. It is a pure function of the currently
//! retained snapshots; re-running over the same store yields byte-identical
//! artifacts.

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};
use siftr_common::config::Window;

use crate::store::SnapshotStore;

/// Unions all of `source`'s snapshots inside the trailing window.
///
/// Zero matching snapshots yield an empty vec, not an error.
pub fn aggregate(
    store: &dyn SnapshotStore,
    source: &str,
    window: &Window,
    today: NaiveDate,
) -> anyhow::Result<Vec<String>> {
    let cutoff = today - Duration::days(i64::from(window.days) - 1);

    let mut union: BTreeSet<String> = BTreeSet::new();
    for date in store.list(source)? {
        if date < cutoff {
            continue;
        }
        if let Some(snapshot) = store.get(source, date)? {
            union.extend(snapshot);
        }
    }

    Ok(union.into_iter().collect())
}

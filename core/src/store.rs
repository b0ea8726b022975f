//! The central **abstraction** for snapshot persistence.
//!
//! This module defines the unified interface that concrete stores (the
//! filesystem-backed [`fs::FsStore`], the in-memory [`memory::MemoryStore`])
//! must implement. One snapshot is the full indicator set collected from one
//! source on one calendar date, keyed by `(source, date)`.
//!
//! **Architectural Note:**
//! Retention and windowing depend strictly on this abstraction rather than on
//! concrete stores, so both are exercised in tests against the in-memory
//! implementation without touching real file I/O.

use std::collections::BTreeSet;

use chrono::NaiveDate;

pub mod fs;
pub mod memory;

/// Date-keyed persistence for per-source indicator snapshots.
///
/// Contract:
/// * `put` is an idempotent create-or-replace; readers never observe a
///   partially written snapshot.
/// * `list` returns stored dates in ascending order.
/// * snapshots are immutable once written; `remove` deletes whole snapshots
///   and is only driven by the retention pruner.
pub trait SnapshotStore: Send + Sync {
    fn put(
        &self,
        source: &str,
        date: NaiveDate,
        indicators: &BTreeSet<String>,
    ) -> anyhow::Result<()>;

    fn get(&self, source: &str, date: NaiveDate) -> anyhow::Result<Option<BTreeSet<String>>>;

    fn list(&self, source: &str) -> anyhow::Result<Vec<NaiveDate>>;

    fn remove(&self, source: &str, date: NaiveDate) -> anyhow::Result<()>;
}

//! In-memory snapshot store.
//!
//! Backs the retention and windowing tests; same contract as the
//! filesystem store, no I/O.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use chrono::NaiveDate;

use super::SnapshotStore;

#[derive(Default)]
pub struct MemoryStore {
    snapshots: Mutex<BTreeMap<(String, NaiveDate), BTreeSet<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemoryStore {
    fn put(
        &self,
        source: &str,
        date: NaiveDate,
        indicators: &BTreeSet<String>,
    ) -> anyhow::Result<()> {
        self.snapshots
            .lock()
            .expect("snapshot map poisoned")
            .insert((source.to_string(), date), indicators.clone());
        Ok(())
    }

    fn get(&self, source: &str, date: NaiveDate) -> anyhow::Result<Option<BTreeSet<String>>> {
        Ok(self
            .snapshots
            .lock()
            .expect("snapshot map poisoned")
            .get(&(source.to_string(), date))
            .cloned())
    }

    fn list(&self, source: &str) -> anyhow::Result<Vec<NaiveDate>> {
        // Keys are ordered, so dates per source come out ascending.
        Ok(self
            .snapshots
            .lock()
            .expect("snapshot map poisoned")
            .keys()
            .filter(|(name, _)| name == source)
            .map(|(_, date)| *date)
            .collect())
    }

    fn remove(&self, source: &str, date: NaiveDate) -> anyhow::Result<()> {
        self.snapshots
            .lock()
            .expect("snapshot map poisoned")
            .remove(&(source.to_string(), date));
        Ok(())
    }
}

//! Filesystem-backed snapshot store.
//!
//! Layout, one file per `(source, date)` key:
//!
//! ```text
//! <root>/<source>/raw/2026-08-06.txt
//! ```
//!
//! Files are newline-delimited, sorted, and written through a temp-file +
//! rename so readers never observe a half-written snapshot.

use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDate;

use crate::output;

use super::SnapshotStore;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn raw_dir(&self, source: &str) -> PathBuf {
        self.root.join(source).join("raw")
    }

    fn snapshot_path(&self, source: &str, date: NaiveDate) -> PathBuf {
        self.raw_dir(source)
            .join(format!("{}.txt", date.format(DATE_FORMAT)))
    }
}

impl SnapshotStore for FsStore {
    fn put(
        &self,
        source: &str,
        date: NaiveDate,
        indicators: &BTreeSet<String>,
    ) -> anyhow::Result<()> {
        let lines: Vec<String> = indicators.iter().cloned().collect();
        let path = self.snapshot_path(source, date);
        output::write_lines(&path, &lines)
            .with_context(|| format!("failed to write snapshot {source}/{date}"))
    }

    fn get(&self, source: &str, date: NaiveDate) -> anyhow::Result<Option<BTreeSet<String>>> {
        let path = self.snapshot_path(source, date);
        let body = match fs::read_to_string(&path) {
            Ok(body) => body,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err).with_context(|| format!("failed to read {}", path.display()));
            }
        };

        let indicators = body
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect();
        Ok(Some(indicators))
    }

    fn list(&self, source: &str) -> anyhow::Result<Vec<NaiveDate>> {
        let dir = self.raw_dir(source);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(err).with_context(|| format!("failed to list {}", dir.display()));
            }
        };

        let mut dates = Vec::new();
        for entry in entries {
            let entry = entry?;
            if let Some(date) = parse_snapshot_name(&entry.path()) {
                dates.push(date);
            }
        }
        dates.sort_unstable();
        Ok(dates)
    }

    fn remove(&self, source: &str, date: NaiveDate) -> anyhow::Result<()> {
        let path = self.snapshot_path(source, date);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).with_context(|| format!("failed to remove {}", path.display())),
        }
    }
}

/// Extracts the snapshot date from a `YYYY-MM-DD.txt` file name.
///
/// Anything else in the raw directory (temp files, strays) is ignored.
fn parse_snapshot_name(path: &Path) -> Option<NaiveDate> {
    if path.extension()?.to_str()? != "txt" {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    NaiveDate::parse_from_str(stem, DATE_FORMAT).ok()
}

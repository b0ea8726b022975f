#![cfg(test)]

use std::fs;
use std::sync::Arc;

use siftr_core::fetch::IndicatorSource;
use siftr_core::pipeline;
use siftr_core::store::SnapshotStore;
use siftr_core::store::fs::FsStore;

use crate::util::{StaticSource, day, test_config};

const ALPHA_BODY: &str = "# alpha feed\n5.5.0.1\n5.5.1.1\n5.5.2.1\n7.7.7.7\n";
const BETA_BODY: &str = "7.7.7.7\n8.8.8.8\n";

fn arc(source: StaticSource) -> Arc<dyn IndicatorSource> {
    Arc::new(source)
}

#[tokio::test]
async fn full_run_produces_snapshots_windows_and_consensus() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = test_config(dir.path(), &["alpha", "beta"]);
    let store = FsStore::new(dir.path());

    let sources = vec![
        arc(StaticSource::new("alpha", ALPHA_BODY)),
        arc(StaticSource::new("beta", BETA_BODY)),
    ];

    let report = pipeline::run(&cfg, &store, sources, day(6)).await.unwrap();

    assert_eq!(report.fetched_sources, 2);
    assert_eq!(report.window_artifacts, 4);
    assert_eq!(report.evicted_snapshots, 0);

    // Snapshots: one dated file per source, comments stripped.
    let alpha_raw =
        fs::read_to_string(dir.path().join("alpha/raw/2026-08-06.txt")).unwrap();
    assert_eq!(alpha_raw, "5.5.0.1\n5.5.1.1\n5.5.2.1\n7.7.7.7\n");

    // Window artifacts: sorted union of in-window snapshots.
    let beta_1d = fs::read_to_string(dir.path().join("beta/1d.txt")).unwrap();
    assert_eq!(beta_1d, "7.7.7.7\n8.8.8.8\n");

    // Consensus: 5.5.0.0/16 spans three /24s and promotes (threshold 3);
    // 7.7.7.7 is corroborated by both feeds and outranks 8.8.8.8.
    let consensus = fs::read_to_string(dir.path().join("aggregated.txt")).unwrap();
    assert_eq!(consensus, "5.5.\n7.7.7.\n8.8.8.\n");
    assert_eq!(report.consensus_lines, 3);
}

#[tokio::test]
async fn one_unreachable_feed_aborts_the_whole_run() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = test_config(dir.path(), &["alpha", "beta"]);
    let store = FsStore::new(dir.path());

    let sources = vec![
        arc(StaticSource::new("alpha", ALPHA_BODY)),
        arc(StaticSource::unreachable("beta")),
    ];

    let result = pipeline::run(&cfg, &store, sources, day(6)).await;

    assert!(result.is_err());
    // Nothing was snapshotted: no partial-success mode.
    assert!(store.list("alpha").unwrap().is_empty());
    assert!(store.list("beta").unwrap().is_empty());
    assert!(!dir.path().join("aggregated.txt").exists());
}

#[tokio::test]
async fn malformed_lines_are_skipped_without_failing_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = test_config(dir.path(), &["alpha"]);
    let store = FsStore::new(dir.path());

    let body = "203.0.113.1\nnot an indicator!\n999.1.1.1\n203.0.113.2\nc2.badcorp.net\n";
    let report = pipeline::run(&cfg, &store, vec![arc(StaticSource::new("alpha", body))], day(6))
        .await
        .unwrap();

    assert_eq!(report.fetched_sources, 1);
    let snapshot = store.get("alpha", day(6)).unwrap().unwrap();
    assert_eq!(snapshot.len(), 3);
    assert!(snapshot.contains("203.0.113.1"));
    assert!(snapshot.contains("203.0.113.2"));
    assert!(snapshot.contains("c2.badcorp.net"));
}

#[tokio::test]
async fn rerunning_the_same_day_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = test_config(dir.path(), &["alpha", "beta"]);
    let store = FsStore::new(dir.path());

    let sources = || {
        vec![
            arc(StaticSource::new("alpha", ALPHA_BODY)),
            arc(StaticSource::new("beta", BETA_BODY)),
        ]
    };

    pipeline::run(&cfg, &store, sources(), day(6)).await.unwrap();
    let consensus_first = fs::read(dir.path().join("aggregated.txt")).unwrap();
    let window_first = fs::read(dir.path().join("alpha/3d.txt")).unwrap();

    pipeline::run(&cfg, &store, sources(), day(6)).await.unwrap();
    let consensus_second = fs::read(dir.path().join("aggregated.txt")).unwrap();
    let window_second = fs::read(dir.path().join("alpha/3d.txt")).unwrap();

    assert_eq!(consensus_first, consensus_second);
    assert_eq!(window_first, window_second);
    // Re-running replaced, not duplicated, the day's snapshot.
    assert_eq!(store.list("alpha").unwrap(), vec![day(6)]);
}

#[tokio::test]
async fn retention_evicts_oldest_snapshots_during_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = test_config(dir.path(), &["alpha"]);
    let store = FsStore::new(dir.path());

    // Pre-seed more history than the bound allows (max_raw_days = 5).
    for n in 1..=6 {
        let set = ["198.51.100.1".to_string()].into_iter().collect();
        store.put("alpha", day(n), &set).unwrap();
    }

    let report = pipeline::run(
        &cfg,
        &store,
        vec![arc(StaticSource::new("alpha", ALPHA_BODY))],
        day(7),
    )
    .await
    .unwrap();

    assert_eq!(report.evicted_snapshots, 2);
    let remaining = store.list("alpha").unwrap();
    assert_eq!(remaining, (3..=7).map(day).collect::<Vec<_>>());
}

#![cfg(test)]

use std::collections::BTreeSet;
use std::net::Ipv4Addr;

use siftr_common::config::FeedSource;
use siftr_core::consensus::{self, SummaryParams};
use siftr_core::store::SnapshotStore;
use siftr_core::store::memory::MemoryStore;

use crate::util::day;

fn source(name: &str) -> FeedSource {
    FeedSource {
        name: name.to_string(),
        url: format!("https://feeds.test/{name}.txt"),
        enabled: true,
    }
}

fn put(store: &MemoryStore, name: &str, n: u32, indicators: &[&str]) {
    let set: BTreeSet<String> = indicators.iter().map(|s| s.to_string()).collect();
    store.put(name, day(n), &set).unwrap();
}

#[test]
fn weight_counts_one_per_listing_source() {
    let store = MemoryStore::new();
    put(&store, "a", 6, &["203.0.113.1", "203.0.113.9"]);
    put(&store, "b", 6, &["203.0.113.1"]);
    put(&store, "c", 6, &["203.0.113.1"]);

    let sources = [source("a"), source("b"), source("c")];
    let counts = consensus::assemble(&store, &sources, day(6)).unwrap();

    assert_eq!(counts[&"203.0.113.1".parse::<Ipv4Addr>().unwrap()], 3);
    assert_eq!(counts[&"203.0.113.9".parse::<Ipv4Addr>().unwrap()], 1);
}

#[test]
fn sources_without_a_snapshot_contribute_nothing() {
    let store = MemoryStore::new();
    put(&store, "a", 6, &["203.0.113.1"]);

    let sources = [source("a"), source("missing")];
    let counts = consensus::assemble(&store, &sources, day(6)).unwrap();

    assert_eq!(counts.len(), 1);
}

#[test]
fn domains_in_snapshots_are_skipped_for_subnet_math() {
    let store = MemoryStore::new();
    put(&store, "a", 6, &["203.0.113.1", "c2.badcorp.net"]);

    let counts = consensus::assemble(&store, &[source("a")], day(6)).unwrap();

    assert_eq!(counts.len(), 1);
}

/// Ten distinct /24s under one /16 collapse at threshold 10; nine stay
/// individual.
#[test]
fn promotion_boundary_across_sources() {
    let store = MemoryStore::new();
    // /24 spread comes from different sources; promotion counts distinct
    // children regardless of which feed contributed them.
    let first: Vec<String> = (0..5).map(|c| format!("1.2.{c}.1")).collect();
    let second: Vec<String> = (5..10).map(|c| format!("1.2.{c}.1")).collect();
    put(&store, "a", 6, &first.iter().map(String::as_str).collect::<Vec<_>>());
    put(&store, "b", 6, &second.iter().map(String::as_str).collect::<Vec<_>>());

    let sources = [source("a"), source("b")];
    let counts = consensus::assemble(&store, &sources, day(6)).unwrap();

    let params = SummaryParams {
        promote_threshold: 10,
        max_lines: 100,
    };
    let lines = consensus::render(&consensus::summarize(&counts, &params));
    assert_eq!(lines, vec!["1.2."]);

    // Drop one /24 below the threshold: all nine emit individually.
    let store = MemoryStore::new();
    let nine: Vec<String> = (0..9).map(|c| format!("1.2.{c}.1")).collect();
    put(&store, "a", 6, &nine.iter().map(String::as_str).collect::<Vec<_>>());
    let counts = consensus::assemble(&store, &[source("a")], day(6)).unwrap();

    let lines = consensus::render(&consensus::summarize(&counts, &params));
    assert_eq!(lines.len(), 9);
    assert!(!lines.contains(&"1.2.".to_string()));
    for c in 0..9 {
        assert!(lines.contains(&format!("1.2.{c}.")));
    }
}

#[test]
fn consensus_is_idempotent_over_unchanged_snapshots() {
    let store = MemoryStore::new();
    put(&store, "a", 6, &["10.0.0.1", "10.0.1.1", "10.0.2.1", "172.16.0.5"]);

    let sources = [source("a")];
    let params = SummaryParams {
        promote_threshold: 3,
        max_lines: 100,
    };

    let first = consensus::render(&consensus::summarize(
        &consensus::assemble(&store, &sources, day(6)).unwrap(),
        &params,
    ));
    let second = consensus::render(&consensus::summarize(
        &consensus::assemble(&store, &sources, day(6)).unwrap(),
        &params,
    ));

    assert_eq!(first, second);
    assert_eq!(first, vec!["10.0.", "172.16.0."]);
}

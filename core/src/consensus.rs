//! Consensus subnet generalization.
//!
//! Turns a weighted multiset of individual IPv4 addresses into a compact,
//! ranked list of network prefixes. Dense /16 blocks (many distinct /24
//! children) are promoted to a single two-octet entry; everything else stays
//! a three-octet entry. Promotion looks only at how widely a /16 is spread
//! across its /24s; volume concentrated in one /24 never promotes.
//!
//! The transform is one-shot and deterministic: same input, same parameters,
//! same bytes out.

use std::cmp::Reverse;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::net::Ipv4Addr;

use rayon::prelude::*;
use siftr_common::config::FeedSource;
use siftr_common::network::prefix::{Prefix16, Prefix24};

use crate::store::SnapshotStore;

pub struct SummaryParams {
    /// Distinct /24 children required to promote a /16.
    pub promote_threshold: usize,
    /// Upper bound on emitted entries.
    pub max_lines: usize,
}

/// One line of the consensus artifact.
///
/// A promoted /16 subsumes and hides all of its /24 children, even heavy
/// ones; a /24 is emitted iff its parent was not promoted. Together the two
/// variants partition the observed network space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryEntry {
    Net16 { prefix: Prefix16, children: usize },
    Net24 { prefix: Prefix24, weight: u64 },
}

impl fmt::Display for SummaryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummaryEntry::Net16 { prefix, .. } => write!(f, "{prefix}"),
            SummaryEntry::Net24 { prefix, .. } => write!(f, "{prefix}"),
        }
    }
}

/// Per-worker accumulation state, merged in a final sequential reduce so
/// concurrent workers never race on shared counters.
#[derive(Default)]
struct Accumulator {
    weight24: HashMap<Prefix24, u64>,
    children16: HashMap<Prefix16, BTreeSet<Prefix24>>,
}

impl Accumulator {
    fn add(mut self, ip: Ipv4Addr, weight: u32) -> Self {
        let net24 = Prefix24::from(ip);
        *self.weight24.entry(net24).or_default() += u64::from(weight);
        self.children16.entry(net24.parent()).or_default().insert(net24);
        self
    }

    fn merge(mut self, other: Self) -> Self {
        for (net24, weight) in other.weight24 {
            *self.weight24.entry(net24).or_default() += weight;
        }
        for (net16, children) in other.children16 {
            self.children16.entry(net16).or_default().extend(children);
        }
        self
    }
}

/// Ranks the weighted multiset into a bounded entry list.
///
/// Promoted /16s come first, ordered by descending distinct-child count;
/// remaining /24s follow, ordered by descending accumulated weight. Ties
/// break by ascending numeric prefix so output never depends on map
/// iteration order.
pub fn summarize(counts: &HashMap<Ipv4Addr, u32>, params: &SummaryParams) -> Vec<SummaryEntry> {
    let acc = counts
        .par_iter()
        .fold(Accumulator::default, |acc, (ip, weight)| acc.add(*ip, *weight))
        .reduce(Accumulator::default, Accumulator::merge);

    let mut promoted: Vec<(Prefix16, usize)> = acc
        .children16
        .iter()
        .filter(|(_, children)| children.len() >= params.promote_threshold)
        .map(|(net16, children)| (*net16, children.len()))
        .collect();
    promoted.sort_unstable_by_key(|&(net16, children)| (Reverse(children), net16));

    let promoted_set: HashSet<Prefix16> = promoted.iter().map(|&(net16, _)| net16).collect();

    let mut remaining: Vec<(Prefix24, u64)> = acc
        .weight24
        .into_iter()
        .filter(|(net24, _)| !promoted_set.contains(&net24.parent()))
        .collect();
    remaining.sort_unstable_by_key(|&(net24, weight)| (Reverse(weight), net24));

    promoted
        .into_iter()
        .map(|(prefix, children)| SummaryEntry::Net16 { prefix, children })
        .chain(
            remaining
                .into_iter()
                .map(|(prefix, weight)| SummaryEntry::Net24 { prefix, weight }),
        )
        .take(params.max_lines)
        .collect()
}

/// Renders entries to artifact lines, dropping any duplicate rendering
/// while preserving rank order. The partition already guarantees unique
/// prefixes; this guards the textual layer.
pub fn render(entries: &[SummaryEntry]) -> Vec<String> {
    let mut seen = HashSet::new();
    entries
        .iter()
        .map(|entry| entry.to_string())
        .filter(|line| seen.insert(line.clone()))
        .collect()
}

/// Counts IPv4 occurrences in raw indicator lines, one unit of weight per
/// occurrence. Tokens that do not parse as IPv4 literals are dropped
/// silently; the feeds are noisy and this path is best-effort.
pub fn count_ips<'a>(lines: impl IntoIterator<Item = &'a str>) -> HashMap<Ipv4Addr, u32> {
    let mut counts = HashMap::new();
    for line in lines {
        if let Ok(ip) = line.parse::<Ipv4Addr>() {
            *counts.entry(ip).or_default() += 1;
        }
    }
    counts
}

/// Builds the weighted multiset for `date` from every listed source's
/// snapshot: each source contributes one unit of weight per IP it lists.
/// Sources with no snapshot for that date contribute nothing.
pub fn assemble(
    store: &dyn SnapshotStore,
    sources: &[FeedSource],
    date: chrono::NaiveDate,
) -> anyhow::Result<HashMap<Ipv4Addr, u32>> {
    let mut counts = HashMap::new();
    for source in sources {
        let Some(snapshot) = store.get(&source.name, date)? else {
            continue;
        };
        for (ip, weight) in count_ips(snapshot.iter().map(String::as_str)) {
            *counts.entry(ip).or_default() += weight;
        }
    }
    Ok(counts)
}

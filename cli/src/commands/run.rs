use std::sync::Arc;
use std::time::Instant;

use colored::*;
use siftr_common::config::Config;
use siftr_common::success;
use siftr_core::fetch::{HttpSource, IndicatorSource};
use siftr_core::pipeline;
use siftr_core::store::fs::FsStore;

use crate::terminal::spinner;

pub async fn run(cfg: &Config) -> anyhow::Result<()> {
    let store = FsStore::new(&cfg.data_dir);
    let sources: Vec<Arc<dyn IndicatorSource>> = HttpSource::from_config(cfg)?
        .into_iter()
        .map(|source| Arc::new(source) as Arc<dyn IndicatorSource>)
        .collect();

    let today = chrono::Utc::now().date_naive();
    let started = Instant::now();

    let pb = spinner::start(format!("aggregating {} feeds", sources.len()));
    let report = pipeline::run(cfg, &store, sources, today).await;
    pb.finish_and_clear();
    let report = report?;

    let elapsed: ColoredString = format!("{:.2}s", started.elapsed().as_secs_f64())
        .bold()
        .yellow();
    success!(
        "Run complete in {elapsed}: {} feeds, {} window artifacts, {} consensus lines, {} snapshots evicted",
        report.fetched_sources,
        report.window_artifacts,
        report.consensus_lines,
        report.evicted_snapshots,
    );
    Ok(())
}

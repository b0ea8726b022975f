use siftr_common::config::Config;
use siftr_common::success;
use siftr_core::pipeline;
use siftr_core::store::fs::FsStore;

pub fn generalize(cfg: &Config) -> anyhow::Result<()> {
    let store = FsStore::new(&cfg.data_dir);
    let today = chrono::Utc::now().date_naive();

    let lines = pipeline::write_consensus_artifact(cfg, &store, today)?;

    success!("Consensus artifact written: {lines} prefixes");
    Ok(())
}

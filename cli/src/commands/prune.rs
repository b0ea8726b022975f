use siftr_common::config::Config;
use siftr_common::success;
use siftr_core::pipeline;
use siftr_core::store::fs::FsStore;

pub fn prune(cfg: &Config) -> anyhow::Result<()> {
    let store = FsStore::new(&cfg.data_dir);

    let evicted = pipeline::prune_all(cfg, &store)?;

    success!("{evicted} snapshots evicted (keeping at most {} per source)", cfg.max_raw_days);
    Ok(())
}

use siftr_common::config::Config;
use siftr_common::success;
use siftr_core::pipeline;
use siftr_core::store::fs::FsStore;

pub fn windows(cfg: &Config) -> anyhow::Result<()> {
    let store = FsStore::new(&cfg.data_dir);
    let today = chrono::Utc::now().date_naive();

    let written = pipeline::write_window_artifacts(cfg, &store, today)?;

    success!("{written} window artifacts rebuilt");
    Ok(())
}

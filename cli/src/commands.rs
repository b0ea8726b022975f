pub mod generalize;
pub mod prune;
pub mod run;
pub mod windows;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use siftr_common::config::Config;

#[derive(Parser)]
#[command(name = "siftr")]
#[command(about = "A threat-feed aggregator with consensus subnet generalization.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// YAML config file; the built-in feed table is used when omitted
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the data directory from the config
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch all feeds, then snapshot, window, prune, and generalize
    #[command(alias = "r")]
    Run,
    /// Rebuild window artifacts from stored snapshots (no network)
    #[command(alias = "w")]
    Windows,
    /// Build the consensus prefix artifact from today's snapshots (no network)
    #[command(alias = "g")]
    Generalize,
    /// Evict snapshots beyond the retention bound
    #[command(alias = "p")]
    Prune,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn load_config(&self) -> anyhow::Result<Config> {
        let mut cfg = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::defaults(),
        };
        if let Some(dir) = &self.data_dir {
            cfg.data_dir = dir.clone();
        }
        Ok(cfg)
    }
}

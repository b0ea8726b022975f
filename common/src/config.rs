//! # Runtime Configuration
//!
//! One [`Config`] value is built at startup (from YAML or the built-in
//! defaults) and passed by reference through the whole run. Nothing in the
//! pipeline reads configuration from anywhere else, and nothing mutates it
//! after construction.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// One upstream indicator feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedSource {
    pub name: String,
    pub url: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// A trailing aggregation window, e.g. `7d` covering today and the six
/// days before it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Window {
    pub label: String,
    pub days: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root directory for snapshots and artifacts.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    pub sources: Vec<FeedSource>,
    pub windows: Vec<Window>,
    /// Snapshots retained per source before FIFO eviction.
    #[serde(default = "default_max_raw_days")]
    pub max_raw_days: usize,
    /// Distinct /24 children required to promote a /16.
    #[serde(default = "default_promote_threshold")]
    pub promote_threshold: usize,
    /// Upper bound on consensus artifact lines.
    #[serde(default = "default_max_lines")]
    pub max_lines: usize,
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("aggregated")
}

fn default_max_raw_days() -> usize {
    200
}

fn default_promote_threshold() -> usize {
    10
}

fn default_max_lines() -> usize {
    10_000
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no feed sources configured")]
    NoSources,
    #[error("window `{0}` must cover at least one day")]
    EmptyWindow(String),
    #[error("duplicate source name `{0}`")]
    DuplicateSource(String),
}

impl Config {
    /// Loads a YAML configuration file and validates it.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("failed to open config file: {}", path.display()))?;
        let reader = BufReader::new(file);
        let config: Config =
            serde_yaml::from_reader(reader).context("failed to parse YAML config")?;
        config.validate()?;
        Ok(config)
    }

    /// The built-in feed table and windows used when no config file is given.
    pub fn defaults() -> Self {
        let sources = [
            ("ciarmy", "https://iplists.firehol.org/files/ciarmy.ipset"),
            ("bds_atif", "https://iplists.firehol.org/files/bds_atif.ipset"),
            ("blocklist_de", "https://iplists.firehol.org/files/blocklist_de.ipset"),
            ("ipsum_1", "https://raw.githubusercontent.com/stamparm/ipsum/master/levels/1.txt"),
            ("ipsum_2", "https://raw.githubusercontent.com/stamparm/ipsum/master/levels/2.txt"),
            ("ipsum_3", "https://raw.githubusercontent.com/stamparm/ipsum/master/levels/3.txt"),
            ("ipsum_4", "https://raw.githubusercontent.com/stamparm/ipsum/master/levels/4.txt"),
            ("ipsum_5", "https://raw.githubusercontent.com/stamparm/ipsum/master/levels/5.txt"),
            ("ipsum_6", "https://raw.githubusercontent.com/stamparm/ipsum/master/levels/6.txt"),
            ("ipsum_7", "https://raw.githubusercontent.com/stamparm/ipsum/master/levels/7.txt"),
            ("ipsum_8", "https://raw.githubusercontent.com/stamparm/ipsum/master/levels/8.txt"),
        ]
        .into_iter()
        .map(|(name, url)| FeedSource {
            name: name.to_string(),
            url: url.to_string(),
            enabled: true,
        })
        .collect();

        let windows = [("7d", 7), ("30d", 30), ("90d", 90)]
            .into_iter()
            .map(|(label, days)| Window {
                label: label.to_string(),
                days,
            })
            .collect();

        Self {
            data_dir: default_data_dir(),
            sources,
            windows,
            max_raw_days: default_max_raw_days(),
            promote_threshold: default_promote_threshold(),
            max_lines: default_max_lines(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }

    /// Enabled sources only, in configured order.
    pub fn enabled_sources(&self) -> impl Iterator<Item = &FeedSource> {
        self.sources.iter().filter(|s| s.enabled)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sources.is_empty() {
            return Err(ConfigError::NoSources);
        }
        for window in &self.windows {
            if window.days == 0 {
                return Err(ConfigError::EmptyWindow(window.label.clone()));
            }
        }
        let mut seen = std::collections::BTreeSet::new();
        for source in &self.sources {
            if !seen.insert(source.name.as_str()) {
                return Err(ConfigError::DuplicateSource(source.name.clone()));
            }
        }
        Ok(())
    }
}

//! Feed fetching.
//!
//! One HTTP GET per source per run. A fetch either returns the source's full
//! normalized indicator set or fails; there is no retry and no partial
//! result. Timeouts and non-success statuses are failures.

use std::collections::BTreeSet;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use siftr_common::config::{Config, FeedSource};
use siftr_common::indicator;

const USER_AGENT: &str = concat!("siftr/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("feed `{name}` returned HTTP {status}")]
    BadStatus {
        name: String,
        status: reqwest::StatusCode,
    },
    #[error("feed `{name}` request failed")]
    Request {
        name: String,
        #[source]
        source: reqwest::Error,
    },
}

/// A feed that can be asked for its current indicator set.
///
/// The production implementation is [`HttpSource`]; tests substitute canned
/// sources behind the same trait.
#[async_trait]
pub trait IndicatorSource: Send + Sync {
    fn name(&self) -> &str;

    /// Fetches and normalizes the feed's current contents.
    async fn fetch(&self) -> anyhow::Result<BTreeSet<String>>;
}

pub struct HttpSource {
    name: String,
    url: String,
    client: Client,
}

impl HttpSource {
    pub fn new(source: &FeedSource, client: Client) -> Self {
        Self {
            name: source.name.clone(),
            url: source.url.clone(),
            client,
        }
    }

    /// One shared client for all sources of a run.
    pub fn build_client(timeout_secs: u64) -> anyhow::Result<Client> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(client)
    }

    /// Builds one source per enabled config entry, sharing a client.
    pub fn from_config(cfg: &Config) -> anyhow::Result<Vec<HttpSource>> {
        let client = Self::build_client(cfg.fetch_timeout_secs)?;
        Ok(cfg
            .enabled_sources()
            .map(|source| Self::new(source, client.clone()))
            .collect())
    }
}

#[async_trait]
impl IndicatorSource for HttpSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> anyhow::Result<BTreeSet<String>> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                name: self.name.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::BadStatus {
                name: self.name.clone(),
                status,
            }
            .into());
        }

        let body = response.text().await.map_err(|source| FetchError::Request {
            name: self.name.clone(),
            source,
        })?;

        Ok(indicator::normalize_body(&body))
    }
}

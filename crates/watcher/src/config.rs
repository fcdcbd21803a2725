use anyhow::Context;
use filwatch_types::WatchList;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatcherConfig {
    pub rpc_url: String,
    pub poll_interval_seconds: u64,
    pub rpc_timeout_seconds: u64,
    pub watched_producers: Vec<String>,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            rpc_url: std::env::var("CHAIN_RPC_URL")
                .unwrap_or_else(|_| "https://api.node.glif.io".to_string()),
            poll_interval_seconds: std::env::var("POLL_INTERVAL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            rpc_timeout_seconds: std::env::var("RPC_TIMEOUT_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            watched_producers: std::env::var("WATCHED_PRODUCERS")
                .map(|v| {
                    v.split(',')
                        .map(str::trim)
                        .filter(|id| !id.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_else(|_| {
                    vec![
                        "f019806".to_string(),
                        "f01180639".to_string(),
                        "f01769576".to_string(),
                        "f02146033".to_string(),
                    ]
                }),
        }
    }
}

impl WatcherConfig {
    /// Builds the watch-list, rejecting an empty one at startup rather than
    /// silently classifying every block as unwatched.
    pub fn watch_list(&self) -> anyhow::Result<WatchList> {
        let list = WatchList::new(self.watched_producers.iter().cloned());
        if list.is_empty() {
            anyhow::bail!("watch-list is empty; set WATCHED_PRODUCERS");
        }
        Ok(list)
    }

    pub fn poll_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.poll_interval_seconds)
    }

    pub fn from_env() -> anyhow::Result<Self> {
        let config = Self::default();
        config
            .watch_list()
            .context("invalid watcher configuration")?;
        Ok(config)
    }
}

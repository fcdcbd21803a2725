use chrono::{DateTime, Utc};
use serde_json::Value;

use filwatch_types::{BlockObservation, ObservationBatch, WatchList};

use crate::config::WatcherConfig;
use crate::error::WatchError;
use crate::rpc_client::RpcClient;

const CHAIN_HEAD_METHOD: &str = "Filecoin.ChainHead";

/// Fetches the current chain head and classifies each block's producer
/// against the watch-list.
pub struct ChainHeadPoller {
    rpc: RpcClient,
    watch_list: WatchList,
}

impl ChainHeadPoller {
    pub fn new(config: &WatcherConfig) -> anyhow::Result<Self> {
        let timeout = std::time::Duration::from_secs(config.rpc_timeout_seconds);
        let rpc = RpcClient::new(config.rpc_url.as_str(), timeout)?;
        let watch_list = config.watch_list()?;

        Ok(Self { rpc, watch_list })
    }

    /// One remote call, one observation per block entry, in source order.
    pub async fn fetch_observations(&self) -> Result<ObservationBatch, WatchError> {
        let envelope = self.rpc.call(CHAIN_HEAD_METHOD, serde_json::json!([])).await?;
        parse_head_response(&envelope, &self.watch_list, Utc::now())
    }
}

/// Validates the untyped head envelope field-by-field. Any missing or
/// mistyped field is a `MalformedResponse`, never a partial batch.
fn parse_head_response(
    envelope: &Value,
    watch_list: &WatchList,
    observed_at: DateTime<Utc>,
) -> Result<ObservationBatch, WatchError> {
    let result = envelope
        .get("result")
        .ok_or_else(|| WatchError::MalformedResponse("missing result".to_string()))?;

    let blocks = result
        .get("Blocks")
        .and_then(|v| v.as_array())
        .ok_or_else(|| WatchError::MalformedResponse("missing Blocks list".to_string()))?;

    let mut batch = Vec::with_capacity(blocks.len());
    for block in blocks {
        let producer_id = block
            .get("Miner")
            .and_then(|v| v.as_str())
            .ok_or_else(|| WatchError::MalformedResponse("block entry missing Miner".to_string()))?;

        let height = block
            .get("Height")
            .and_then(|v| v.as_u64())
            .ok_or_else(|| {
                WatchError::MalformedResponse("block entry missing Height".to_string())
            })?;

        batch.push(BlockObservation {
            producer_id: producer_id.to_string(),
            observed_at,
            is_watched: watch_list.contains(producer_id),
            height,
        });
    }

    Ok(batch)
}

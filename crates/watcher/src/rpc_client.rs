use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::error::WatchError;

/// Minimal JSON-RPC 2.0 client for the chain-state query service.
pub struct RpcClient {
    client: reqwest::Client,
    rpc_url: String,
}

impl RpcClient {
    pub fn new(rpc_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            rpc_url: rpc_url.into(),
        })
    }

    /// Issues one call and returns the raw response envelope. No retry: a
    /// failed call fails the cycle, and the next cycle tries again.
    pub async fn call(&self, method: &str, params: Value) -> Result<Value, WatchError> {
        let payload = serde_json::json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": 1
        });

        debug!("calling {} at {}", method, self.rpc_url);

        let response = self
            .client
            .post(&self.rpc_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| WatchError::RemoteUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WatchError::RemoteUnavailable(format!(
                "HTTP status {}",
                status
            )));
        }

        let envelope: Value = response
            .json()
            .await
            .map_err(|e| WatchError::MalformedResponse(e.to_string()))?;

        if let Some(error) = envelope.get("error") {
            let message = error
                .get("message")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown RPC error");
            let code = error.get("code").and_then(|v| v.as_i64()).unwrap_or(-1);
            return Err(WatchError::RemoteUnavailable(format!(
                "RPC error ({}): {}",
                code, message
            )));
        }

        Ok(envelope)
    }
}

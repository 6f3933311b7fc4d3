use anyhow::{Context, Result, anyhow};
use serde_json::json;
use tracing::debug;

/// Publish-to-topic client for the realtime gateway. Connected sessions
/// subscribe to `chat-{id}`, `messages-{user}` and
/// `subscription-permissions-{user}` channels; this client only pushes.
pub struct CentrifugoClient {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl CentrifugoClient {
    pub fn new(api_url: String, api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url,
            api_key,
        }
    }

    pub async fn publish(&self, channel: &str, data: serde_json::Value) -> Result<()> {
        let response = self
            .http
            .post(format!("{}/publish", self.api_url))
            .header("Authorization", format!("apikey {}", self.api_key))
            .json(&json!({
                "channel": channel,
                "data": data,
            }))
            .send()
            .await
            .context("realtime gateway is unreachable")?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "realtime publish to {} failed: {}",
                channel,
                response.status()
            ));
        }

        debug!(channel, "realtime: published");
        Ok(())
    }
}

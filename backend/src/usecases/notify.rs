use anyhow::Result as AnyResult;
use async_trait::async_trait;
use infra::realtime::centrifugo_client::CentrifugoClient;
use uuid::Uuid;

/// Push side of the realtime transport. Failures are logged by callers and
/// never fail the enclosing request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RealtimeNotifier: Send + Sync {
    async fn publish(&self, channel: &str, payload: serde_json::Value) -> AnyResult<()>;
}

#[async_trait]
impl RealtimeNotifier for CentrifugoClient {
    async fn publish(&self, channel: &str, payload: serde_json::Value) -> AnyResult<()> {
        self.publish(channel, payload).await
    }
}

pub fn chat_topic(chat_id: i64) -> String {
    format!("chat-{}", chat_id)
}

pub fn messages_topic(user_id: Uuid) -> String {
    format!("messages-{}", user_id)
}

pub fn permissions_topic(user_id: Uuid) -> String {
    format!("subscription-permissions-{}", user_id)
}

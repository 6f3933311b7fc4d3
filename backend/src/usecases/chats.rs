use std::sync::Arc;

use domain::{
    entities::chats::{ChatEntity, InsertMessageEntity, MessageEntity},
    repositories::chats::ChatRepository,
    value_objects::chats::ChatWithUnread,
};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::usecases::{
    error::{ApiError, ApiResult},
    notify::{RealtimeNotifier, chat_topic, messages_topic},
};

pub struct ChatUseCase<C, N>
where
    C: ChatRepository + Send + Sync + 'static,
    N: RealtimeNotifier + 'static,
{
    chat_repo: Arc<C>,
    notifier: Arc<N>,
}

impl<C, N> ChatUseCase<C, N>
where
    C: ChatRepository + Send + Sync + 'static,
    N: RealtimeNotifier + 'static,
{
    pub fn new(chat_repo: Arc<C>, notifier: Arc<N>) -> Self {
        Self {
            chat_repo,
            notifier,
        }
    }

    pub async fn list_chats(&self, user_id: Uuid) -> ApiResult<Vec<ChatWithUnread>> {
        Ok(self.chat_repo.list_for_user(user_id).await?)
    }

    pub async fn list_messages(
        &self,
        chat_id: i64,
        user_id: Uuid,
    ) -> ApiResult<Vec<MessageEntity>> {
        self.require_participant(chat_id, user_id).await?;
        Ok(self.chat_repo.list_messages(chat_id).await?)
    }

    pub async fn send_message(
        &self,
        chat_id: i64,
        user_id: Uuid,
        text: String,
    ) -> ApiResult<MessageEntity> {
        if text.trim().is_empty() {
            return Err(ApiError::BadRequest("message must not be empty".to_string()));
        }

        self.require_participant(chat_id, user_id).await?;

        let message = self
            .chat_repo
            .insert_message(InsertMessageEntity {
                chat_id,
                user_id: Some(user_id),
                text,
            })
            .await?;

        info!(chat_id, message_id = message.id, "chats: message sent");

        let payload = json!({
            "type": "chat_message",
            "chat_id": chat_id,
            "message_id": message.id,
            "user_id": user_id,
            "text": message.text,
        });
        self.notify(&chat_topic(chat_id), payload.clone()).await;

        // Participants not currently inside the chat get the per-user topic.
        match self.chat_repo.participants(chat_id).await {
            Ok(participants) => {
                for participant in participants.into_iter().filter(|id| *id != user_id) {
                    self.notify(&messages_topic(participant), payload.clone())
                        .await;
                }
            }
            Err(err) => {
                warn!(chat_id, error = ?err, "chats: failed to load participants for notify");
            }
        }

        Ok(message)
    }

    pub async fn mark_read(&self, chat_id: i64, user_id: Uuid) -> ApiResult<usize> {
        self.require_participant(chat_id, user_id).await?;

        let marked = self.chat_repo.mark_read(chat_id, user_id).await?;
        if marked > 0 {
            self.notify(
                &chat_topic(chat_id),
                json!({
                    "type": "messages_read",
                    "chat_id": chat_id,
                    "user_id": user_id,
                }),
            )
            .await;
        }
        Ok(marked)
    }

    async fn require_participant(&self, chat_id: i64, user_id: Uuid) -> ApiResult<ChatEntity> {
        let chat = self
            .chat_repo
            .find_by_id(chat_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("chat".to_string()))?;

        if !self.chat_repo.is_participant(chat_id, user_id).await? {
            return Err(ApiError::Forbidden(
                "you are not a participant of this chat".to_string(),
            ));
        }
        Ok(chat)
    }

    async fn notify(&self, channel: &str, payload: serde_json::Value) {
        if let Err(err) = self.notifier.publish(channel, payload).await {
            warn!(channel, error = ?err, "chats: realtime publish failed");
        }
    }
}

#[cfg(test)]
mod tests;

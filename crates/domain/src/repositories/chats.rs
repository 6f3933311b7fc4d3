use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::entities::chats::{ChatEntity, InsertMessageEntity, MessageEntity};
use crate::value_objects::chats::ChatWithUnread;

#[async_trait]
#[automock]
pub trait ChatRepository {
    /// Finds the offer chat the user participates in, if any.
    async fn find_offer_chat(&self, offer_id: i64, user_id: Uuid) -> Result<Option<ChatEntity>>;

    /// Creates the private two-participant chat tagged to the offer and posts
    /// the first message, in one transaction. A concurrent duplicate insert
    /// resolves to the already-existing chat.
    async fn create_offer_chat(
        &self,
        offer_id: i64,
        created_user_id: Uuid,
        participants: Vec<Uuid>,
        first_message: String,
    ) -> Result<(ChatEntity, MessageEntity)>;

    async fn find_by_id(&self, chat_id: i64) -> Result<Option<ChatEntity>>;

    async fn is_participant(&self, chat_id: i64, user_id: Uuid) -> Result<bool>;

    async fn participants(&self, chat_id: i64) -> Result<Vec<Uuid>>;

    /// Chats the user participates in, newest activity first, each annotated
    /// with the count of foreign messages the user has not read.
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<ChatWithUnread>>;

    async fn list_messages(&self, chat_id: i64) -> Result<Vec<MessageEntity>>;

    /// Inserts the message and bumps the chat's changed timestamp in one
    /// transaction.
    async fn insert_message(
        &self,
        insert_message_entity: InsertMessageEntity,
    ) -> Result<MessageEntity>;

    /// Marks every foreign message of the chat as read by the user. Returns
    /// how many receipts were written.
    async fn mark_read(&self, chat_id: i64, user_id: Uuid) -> Result<usize>;
}

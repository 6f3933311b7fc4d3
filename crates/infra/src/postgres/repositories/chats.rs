use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::{dsl::count_star, insert_into, prelude::*, update};
use uuid::Uuid;

use domain::{
    entities::chats::{ChatEntity, InsertChatEntity, InsertMessageEntity, MessageEntity},
    repositories::chats::ChatRepository,
    schema::{chat_participants, chats, message_reads, messages},
    value_objects::chats::{ChatWithUnread, OFFER_CHAT_OBJECT_TYPE},
};

use crate::postgres::postgres_connection::PgPoolSquad;

pub struct ChatPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl ChatPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

fn is_unique_violation(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<DieselError>(),
        Some(DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            _
        ))
    )
}

#[async_trait]
impl ChatRepository for ChatPostgres {
    async fn find_offer_chat(&self, offer_id: i64, user_id: Uuid) -> Result<Option<ChatEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let chat = chats::table
            .inner_join(chat_participants::table)
            .filter(chats::object_type.eq(OFFER_CHAT_OBJECT_TYPE))
            .filter(chats::object_id.eq(offer_id))
            .filter(chats::deleted.eq(false))
            .filter(chat_participants::user_id.eq(user_id))
            .select(ChatEntity::as_select())
            .first::<ChatEntity>(&mut conn)
            .optional()?;

        Ok(chat)
    }

    async fn create_offer_chat(
        &self,
        offer_id: i64,
        created_user_id: Uuid,
        participants: Vec<Uuid>,
        first_message: String,
    ) -> Result<(ChatEntity, MessageEntity)> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let insert_chat_entity = InsertChatEntity {
            name: String::new(),
            object_id: offer_id,
            object_type: OFFER_CHAT_OBJECT_TYPE.to_string(),
            created_user_id: Some(created_user_id),
            private: true,
        };

        let result = conn.transaction::<(ChatEntity, MessageEntity), anyhow::Error, _>(|conn| {
            let chat = insert_into(chats::table)
                .values(&insert_chat_entity)
                .returning(ChatEntity::as_returning())
                .get_result::<ChatEntity>(conn)?;

            let participant_rows: Vec<_> = participants
                .iter()
                .map(|user_id| {
                    (
                        chat_participants::chat_id.eq(chat.id),
                        chat_participants::user_id.eq(*user_id),
                    )
                })
                .collect();
            insert_into(chat_participants::table)
                .values(&participant_rows)
                .execute(conn)?;

            let message = insert_into(messages::table)
                .values(&InsertMessageEntity {
                    chat_id: chat.id,
                    user_id: Some(created_user_id),
                    text: first_message.clone(),
                })
                .returning(MessageEntity::as_returning())
                .get_result::<MessageEntity>(conn)?;

            Ok((chat, message))
        });

        match result {
            Ok(created) => Ok(created),
            // A concurrent call won the unique index on
            // (object_type, object_id, created_user_id); hand back its chat.
            Err(err) if is_unique_violation(&err) => {
                let chat = chats::table
                    .filter(chats::object_type.eq(OFFER_CHAT_OBJECT_TYPE))
                    .filter(chats::object_id.eq(offer_id))
                    .filter(chats::created_user_id.eq(created_user_id))
                    .select(ChatEntity::as_select())
                    .first::<ChatEntity>(&mut conn)?;

                let message = messages::table
                    .filter(messages::chat_id.eq(chat.id))
                    .order(messages::created_at.asc())
                    .select(MessageEntity::as_select())
                    .first::<MessageEntity>(&mut conn)
                    .optional()?
                    .ok_or_else(|| anyhow!("chat {} has no messages", chat.id))?;

                Ok((chat, message))
            }
            Err(err) => Err(err),
        }
    }

    async fn find_by_id(&self, chat_id: i64) -> Result<Option<ChatEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let chat = chats::table
            .filter(chats::id.eq(chat_id))
            .filter(chats::deleted.eq(false))
            .select(ChatEntity::as_select())
            .first::<ChatEntity>(&mut conn)
            .optional()?;

        Ok(chat)
    }

    async fn is_participant(&self, chat_id: i64, user_id: Uuid) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = chat_participants::table
            .filter(chat_participants::chat_id.eq(chat_id))
            .filter(chat_participants::user_id.eq(user_id))
            .select(chat_participants::chat_id)
            .first::<i64>(&mut conn)
            .optional()?;

        Ok(row.is_some())
    }

    async fn participants(&self, chat_id: i64) -> Result<Vec<Uuid>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let ids = chat_participants::table
            .filter(chat_participants::chat_id.eq(chat_id))
            .select(chat_participants::user_id)
            .load::<Uuid>(&mut conn)?;

        Ok(ids)
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<ChatWithUnread>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let user_chats = chats::table
            .inner_join(chat_participants::table)
            .filter(chat_participants::user_id.eq(user_id))
            .filter(chats::deleted.eq(false))
            .order(chats::changed_at.desc())
            .select(ChatEntity::as_select())
            .load::<ChatEntity>(&mut conn)?;

        if user_chats.is_empty() {
            return Ok(Vec::new());
        }

        let chat_ids: Vec<i64> = user_chats.iter().map(|chat| chat.id).collect();

        // Foreign messages without a read receipt for this user, per chat.
        let unread_counts: Vec<(i64, i64)> = messages::table
            .left_join(
                message_reads::table.on(message_reads::message_id
                    .eq(messages::id)
                    .and(message_reads::user_id.eq(user_id))),
            )
            .filter(messages::chat_id.eq_any(&chat_ids))
            .filter(messages::deleted.eq(false))
            .filter(messages::user_id.is_distinct_from(user_id))
            .filter(message_reads::message_id.nullable().is_null())
            .group_by(messages::chat_id)
            .select((messages::chat_id, count_star()))
            .load::<(i64, i64)>(&mut conn)?;

        let unread_by_chat: HashMap<i64, i64> = unread_counts.into_iter().collect();

        Ok(user_chats
            .into_iter()
            .map(|chat| {
                let unread_count = unread_by_chat.get(&chat.id).copied().unwrap_or(0);
                ChatWithUnread { chat, unread_count }
            })
            .collect())
    }

    async fn list_messages(&self, chat_id: i64) -> Result<Vec<MessageEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let chat_messages = messages::table
            .filter(messages::chat_id.eq(chat_id))
            .filter(messages::deleted.eq(false))
            .order(messages::created_at.desc())
            .select(MessageEntity::as_select())
            .load::<MessageEntity>(&mut conn)?;

        Ok(chat_messages)
    }

    async fn insert_message(
        &self,
        insert_message_entity: InsertMessageEntity,
    ) -> Result<MessageEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        conn.transaction::<MessageEntity, anyhow::Error, _>(|conn| {
            let message = insert_into(messages::table)
                .values(&insert_message_entity)
                .returning(MessageEntity::as_returning())
                .get_result::<MessageEntity>(conn)?;

            update(chats::table)
                .filter(chats::id.eq(message.chat_id))
                .set(chats::changed_at.eq(diesel::dsl::now))
                .execute(conn)?;

            Ok(message)
        })
    }

    async fn mark_read(&self, chat_id: i64, user_id: Uuid) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        conn.transaction::<usize, anyhow::Error, _>(|conn| {
            let unread_ids: Vec<i64> = messages::table
                .left_join(
                    message_reads::table.on(message_reads::message_id
                        .eq(messages::id)
                        .and(message_reads::user_id.eq(user_id))),
                )
                .filter(messages::chat_id.eq(chat_id))
                .filter(messages::deleted.eq(false))
                .filter(messages::user_id.is_distinct_from(user_id))
                .filter(message_reads::message_id.nullable().is_null())
                .select(messages::id)
                .load::<i64>(conn)?;

            if unread_ids.is_empty() {
                return Ok(0);
            }

            let receipt_rows: Vec<_> = unread_ids
                .iter()
                .map(|message_id| {
                    (
                        message_reads::message_id.eq(*message_id),
                        message_reads::user_id.eq(user_id),
                    )
                })
                .collect();

            let written = insert_into(message_reads::table)
                .values(&receipt_rows)
                .on_conflict((message_reads::message_id, message_reads::user_id))
                .do_nothing()
                .execute(conn)?;

            Ok(written)
        })
    }
}

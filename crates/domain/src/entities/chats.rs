use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::schema::{chats, messages};

#[derive(Debug, Clone, Serialize, Identifiable, Selectable, Queryable)]
#[diesel(table_name = chats)]
pub struct ChatEntity {
    pub id: i64,
    pub name: String,
    pub object_id: i64,
    pub object_type: String,
    pub created_user_id: Option<Uuid>,
    pub private: bool,
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    pub changed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = chats)]
pub struct InsertChatEntity {
    pub name: String,
    pub object_id: i64,
    pub object_type: String,
    pub created_user_id: Option<Uuid>,
    pub private: bool,
}

#[derive(Debug, Clone, Serialize, Identifiable, Selectable, Queryable)]
#[diesel(table_name = messages)]
pub struct MessageEntity {
    pub id: i64,
    pub chat_id: i64,
    pub user_id: Option<Uuid>,
    pub text: String,
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    pub changed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = messages)]
pub struct InsertMessageEntity {
    pub chat_id: i64,
    pub user_id: Option<Uuid>,
    pub text: String,
}

use serde::{Deserialize, Serialize};

use crate::entities::chats::ChatEntity;

/// Chats created by the offer lifecycle are tagged with this object type.
pub const OFFER_CHAT_OBJECT_TYPE: &str = "repair_offer";

/// Greeting posted when a suggest/respond call supplies no message text.
pub const DEFAULT_GREETING: &str = "\u{1F44B}";

#[derive(Debug, Clone, Serialize)]
pub struct ChatWithUnread {
    #[serde(flatten)]
    pub chat: ChatEntity,
    pub unread_count: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageModel {
    pub text: String,
}

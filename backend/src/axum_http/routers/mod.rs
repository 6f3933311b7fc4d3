pub mod chats;
pub mod offers;
pub mod subscriptions;

pub mod chats;
pub mod entitlements;
pub mod error;
pub mod notify;
pub mod offers;
pub mod subscriptions;

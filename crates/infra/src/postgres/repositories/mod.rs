pub mod chats;
pub mod offers;
pub mod plans;
pub mod subscriptions;
pub mod users;

pub mod chats;
pub mod grades;
pub mod offers;
pub mod plans;
pub mod subscriptions;
pub mod users;

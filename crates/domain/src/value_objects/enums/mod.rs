pub mod duration_types;
pub mod user_roles;

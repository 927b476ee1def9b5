pub mod admin;
pub mod auth;
pub mod books;
pub mod chat;
pub mod connections;
pub mod favorites;
pub mod follows;
pub mod messages;
pub mod system;
pub mod users;

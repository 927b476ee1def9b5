mod handler;
mod model;

pub use handler::{admin_login, delete_user, list_users};

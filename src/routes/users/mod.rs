mod handler;
pub(crate) mod model;

pub use handler::{get_user, search_users, update_profile};

mod handler;
mod model;

pub use handler::{add_favorite, remove_favorite, user_favorites};

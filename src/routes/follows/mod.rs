mod handler;
mod model;

pub use handler::{follow_user, followers, following, unfollow_user};

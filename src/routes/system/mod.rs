mod handler;

pub use handler::{init_db, welcome};

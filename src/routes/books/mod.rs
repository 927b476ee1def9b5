mod handler;
pub(crate) mod model;

pub use handler::{
    create_book, delete_book, list_books, moderate_book, pending_books, submit_book, update_book,
};

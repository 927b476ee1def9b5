mod handler;
mod model;

pub use handler::{
    delete_conversation, delete_message, edit_message, get_thread, send_message,
};

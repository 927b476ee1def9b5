mod handler;
mod model;

pub use handler::{connection_status, list_connections, request_connection, respond_connection};

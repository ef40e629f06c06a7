pub mod resolve_recipients;
pub mod send_batch;
pub mod send_message;

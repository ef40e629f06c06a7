pub mod health;
pub mod messages;
pub mod recipients;
pub mod root;

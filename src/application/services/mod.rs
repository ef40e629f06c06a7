pub mod credentials;
pub mod encoder;
pub mod platform;
pub mod progress;
pub mod rate_limiter;

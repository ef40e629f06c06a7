use thiserror::Error;

/// Problems with the message content itself. Never retried: the same input
/// will fail the same way on every attempt.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("message body is empty")]
    Empty,
    #[error("structured content is not valid JSON: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error("structured content is a JSON-encoded string (double encoded)")]
    DoubleEncoded,
    #[error("structured content must be a JSON object or array")]
    NotStructured,
    #[error("text messages require a string body")]
    TextBodyRequired,
    #[error("encoded content is {size} bytes, limit is {limit}")]
    TooLarge { size: usize, limit: usize },
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error(transparent)]
    Payload(#[from] PayloadError),
    #[error("platform rejected request with code {code}: {msg}")]
    Delivery { code: i64, msg: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("delivery cancelled")]
    Cancelled,
}

impl DispatchError {
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DispatchError::Auth(_) | DispatchError::Delivery { .. } | DispatchError::Transport(_)
        )
    }
}

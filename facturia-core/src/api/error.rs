/// Errors produced while talking to the remote invoice backend.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Connection failure, timeout or other transport problem
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx HTTP status
    #[error("backend returned {status}: {message}")]
    Status { status: u16, message: String },

    /// 2xx response whose envelope reports `success: false`
    #[error("backend rejected request: {0}")]
    Rejected(String),

    /// Body did not match the expected shape
    #[error("malformed response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Text suitable for an operator notification.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Transport(e) if e.is_timeout() => "The server took too long to respond".to_string(),
            ApiError::Transport(_) => "Could not reach the server".to_string(),
            ApiError::Status { message, .. } | ApiError::Rejected(message) => message.clone(),
            ApiError::Decode(_) => "Unexpected response from the server".to_string(),
        }
    }
}

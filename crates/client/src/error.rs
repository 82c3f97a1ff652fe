/// Errors from the task backend API layer.
///
/// Neither variant is retried internally; re-submission is an explicit
/// operator action.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The backend returned a non-2xx status code. `message` is the
    /// server-provided message when the body carried one, else the
    /// operation's generic fallback.
    #[error("Server returned HTTP {status}: {message}")]
    Server { status: u16, message: String },

    /// No response reached us (network, DNS, TLS, timeout, or an
    /// unreadable success body).
    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),
}

impl ApiError {
    /// The dismissible message shown to the operator.
    pub fn operator_message(&self) -> String {
        match self {
            ApiError::Server { message, .. } => message.clone(),
            ApiError::Network(_) => "Failed to connect to the server".to_string(),
        }
    }
}

use std::sync::Arc;

/// Failure of a dictionary backend call.
///
/// Cloneable so one in-flight result can be handed to every waiter.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DictionaryError {
    #[error("Network error: {0}")]
    Network(Arc<reqwest::Error>),

    #[error("HTTP {status} from {path}")]
    Status { status: u16, path: String },

    #[error("Malformed response from {path}: {message}")]
    Decode { path: String, message: String },

    #[error("Base URL cannot carry a path: {0}")]
    InvalidBaseUrl(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

impl From<reqwest::Error> for DictionaryError {
    fn from(e: reqwest::Error) -> Self {
        DictionaryError::Network(Arc::new(e))
    }
}

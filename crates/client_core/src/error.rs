use shared::error::ServiceException;
use thiserror::Error;

/// Message shown when the service fails without saying why.
pub const GENERIC_PROCESSING_FAILURE: &str = "processing failed";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid server url '{url}': {source}")]
    InvalidServerUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("invalid response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid media type '{media_type}' for {file_name}")]
    InvalidMediaType {
        file_name: String,
        media_type: String,
    },
    #[error(transparent)]
    Service(#[from] ServiceException),
}

impl ClientError {
    /// Text suitable for a user-facing notification: the service's own message
    /// when it sent one, otherwise the error description.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Service(exception) => exception.message.clone(),
            other => other.to_string(),
        }
    }
}

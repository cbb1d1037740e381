use thiserror::Error;

/// Errors that can occur when talking to an upstream data source.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("url error: {0}")]
    Url(#[from] url::ParseError),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server error (status {status}): {message}")]
    ServerError { status: u16, message: String },
    #[error("json-rpc error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("parse error: {0}")]
    Parse(String),
}

impl FeedError {
    pub(crate) fn parse_error(msg: impl Into<String>) -> Self {
        FeedError::Parse(msg.into())
    }

    pub(crate) fn server_error(status: u16, message: impl Into<String>) -> Self {
        FeedError::ServerError {
            status,
            message: message.into(),
        }
    }

    /// Whether the source could not be reached or answered with an error,
    /// as opposed to answering with data we could not interpret.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            FeedError::Http(_) | FeedError::ServerError { .. } | FeedError::Rpc { .. }
        )
    }
}

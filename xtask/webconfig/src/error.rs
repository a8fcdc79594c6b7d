use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WebConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Failed to parse response from {endpoint}: {message}")]
    Parse { endpoint: String, message: String },

    #[error("Server error: {0}")]
    Server(String),

    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Unexpected response for {0}")]
    UnexpectedResponse(String),

    #[error("Cannot write export to {path}: {message}")]
    Export { path: PathBuf, message: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl WebConfigError {
    /// Transport-class failures: the request never produced a usable reply.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            WebConfigError::Http(_) | WebConfigError::Connection(_) | WebConfigError::Parse { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, WebConfigError>;

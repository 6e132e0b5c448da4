//! Error handling for the Talk2Kap client

use std::fmt;
use thiserror::Error;

/// Unified error type for the Talk2Kap client
#[derive(Error, Debug)]
pub enum Error {
    /// Network or HTTP related errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Authentication-state errors (no signed-in user)
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Classification service rejections (non-2xx responses)
    #[error("Classifier error: {0}")]
    Classifier(String),

    /// Record store errors (write rejected, stream failed)
    #[error("Store error: {0}")]
    Store(String),

    /// Image payload encoding/decoding errors
    #[error("Media error: {0}")]
    Media(String),

    /// Local validation failures, all violations collected
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// A submission is already in flight
    #[error("A submission is already in progress")]
    Busy,

    /// The request timed out
    #[error("Operation timed out")]
    Timeout,
}

impl Error {
    /// Create a new configuration error
    pub fn config<T: fmt::Display>(msg: T) -> Self {
        Error::Config(msg.to_string())
    }

    /// Create a new authentication error
    pub fn auth<T: fmt::Display>(msg: T) -> Self {
        Error::Auth(msg.to_string())
    }

    /// Create a new classifier error
    pub fn classifier<T: fmt::Display>(msg: T) -> Self {
        Error::Classifier(msg.to_string())
    }

    /// Create a new store error
    pub fn store<T: fmt::Display>(msg: T) -> Self {
        Error::Store(msg.to_string())
    }

    /// Create a new media error
    pub fn media<T: fmt::Display>(msg: T) -> Self {
        Error::Media(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

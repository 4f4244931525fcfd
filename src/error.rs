//! Error types for the scan library.
//!
//! This module defines all error types that can occur while decoding images,
//! analysing them, and moving them in and out of the pipelines.

/// Result type alias for scan library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during image analysis.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Image buffer is malformed: zero area, wrong length, undecodable bytes
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Image could not be encoded or written
    #[error("Image error: {0}")]
    Image(String),

    /// Document container is malformed or missing expected parts
    #[error("Document error: {0}")]
    Document(String),

    /// Reference corpus scan ran past its deadline
    #[error("Deadline exceeded after comparing {compared} of {total} reference images")]
    DeadlineExceeded {
        /// Number of references compared before the deadline hit
        compared: usize,
        /// Size of the reference corpus
        total: usize,
    },

    /// Configuration file could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Unsupported feature
    #[error("Unsupported feature: {0}")]
    Unsupported(String),
}

impl Error {
    /// Build an [`Error::InvalidInput`] from any displayable message.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }
}

use thiserror::Error;

/// Failures while reading fragments from a content store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    /// The request never produced a response (DNS, refused connection, IO).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The store location itself is unusable.
    #[error("Invalid content source: {0}")]
    InvalidSource(String),

    /// Every candidate path failed.
    #[error("{reason} (after {attempts} attempts)")]
    Exhausted { attempts: usize, reason: String },
}

/// Type alias for content store results
pub type ContentResult<T> = Result<T, ContentError>;

impl From<std::io::Error> for ContentError {
    fn from(err: std::io::Error) -> Self {
        ContentError::Transport(err.to_string())
    }
}

impl From<reqwest::Error> for ContentError {
    fn from(err: reqwest::Error) -> Self {
        ContentError::Transport(err.to_string())
    }
}

//! Error types for step streams.
//!
//! Streams stay generic over their error type; [`StreamError`] is a ready-made
//! one for collaborators that want a concrete type to put in `Result`.

use std::convert::Infallible;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamError {
    /// I/O failure inside an effectful source or callback
    #[error("IO error: {0}")]
    Io(String),
    /// For collaborators whose effect gives up waiting; never produced by
    /// the combinators themselves
    #[error("Operation timed out")]
    Timeout,
    /// For collaborators whose effect is aborted before producing a step
    #[error("Operation cancelled")]
    Cancelled,
    #[error("Stream error: {0}")]
    Custom(String),
}

impl StreamError {
    pub fn custom(msg: impl Into<String>) -> Self {
        StreamError::Custom(msg.into())
    }
}

impl From<std::io::Error> for StreamError {
    fn from(err: std::io::Error) -> Self {
        StreamError::Io(err.to_string())
    }
}

/// Lets `?` lift a pure stream's result into a fallible context.
impl From<Infallible> for StreamError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

pub type StreamResult<T> = Result<T, StreamError>;

//! Error types for Flowsketch operations.
//!
//! This module provides the main error type [`FlowsketchError`] which wraps
//! the error conditions that can occur while processing a diagram. Layout
//! never appears here as a failure of the adapter: engine errors are masked
//! by the fallback layout.

use std::io;

use thiserror::Error;

use flowsketch_parser::error::ParseError;

/// The main error type for Flowsketch operations.
///
/// The `Parse` variant keeps the source text next to the structured
/// [`ParseError`] so that callers can render its diagnostics with spans.
#[derive(Debug, Error)]
pub enum FlowsketchError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialize(String),
}

impl FlowsketchError {
    /// Create a new `Parse` error with the associated source code.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}

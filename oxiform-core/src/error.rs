//! Error types for OxiForm operations.
//!
//! Every transform reports precondition violations through [`OxiFormError`]
//! instead of panicking. An `Err` result always means that the destination
//! buffer was left untouched and neither view cursor moved, so the caller
//! can fix the buffers and retry.

use std::io;
use thiserror::Error;

/// The main error type for OxiForm operations.
#[derive(Debug, Error)]
pub enum OxiFormError {
    /// I/O error from an underlying reader/writer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A buffer view whose window does not fit inside its storage.
    #[error("Invalid buffer view: index {index} + length {length} exceeds capacity {capacity}")]
    InvalidView {
        /// Start offset of the view.
        index: usize,
        /// Logical length of the view.
        length: usize,
        /// Capacity of the underlying storage.
        capacity: usize,
    },

    /// Destination too small for the bytes a transform would produce.
    #[error("Buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall {
        /// Number of bytes needed.
        needed: usize,
        /// Number of bytes available.
        available: usize,
    },

    /// Invalid transform configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the configuration error.
        message: String,
    },

    /// Unknown transform or predictor name.
    #[error("Unknown transform: {name}")]
    UnknownTransform {
        /// The name that could not be resolved.
        name: String,
    },
}

/// Result type alias for OxiForm operations.
pub type Result<T> = std::result::Result<T, OxiFormError>;

impl OxiFormError {
    /// Create an invalid view error.
    pub fn invalid_view(index: usize, length: usize, capacity: usize) -> Self {
        Self::InvalidView {
            index,
            length,
            capacity,
        }
    }

    /// Create a buffer too small error.
    pub fn buffer_too_small(needed: usize, available: usize) -> Self {
        Self::BufferTooSmall { needed, available }
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an unknown transform error.
    pub fn unknown_transform(name: impl Into<String>) -> Self {
        Self::UnknownTransform { name: name.into() }
    }

    /// Whether the error is a buffer precondition violation.
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::InvalidView { .. } | Self::BufferTooSmall { .. })
    }
}

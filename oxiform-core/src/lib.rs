//! # OxiForm Core
//!
//! Core components for the OxiForm transform toolkit.
//!
//! This crate provides the building blocks shared by every reversible
//! transform:
//!
//! - [`slice`]: Bounded buffer views with cursor semantics
//! - [`traits`]: The [`ByteTransform`] contract and the [`Predictor`] capability
//! - [`sequence`]: Chaining several transforms into one
//! - [`error`]: Error types
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ L3: Driver                                              │
//! │     CLI, chunked file processing                       │
//! ├─────────────────────────────────────────────────────────┤
//! │ L2: Transforms                                          │
//! │     AIC rank transform, predictor transform            │
//! ├─────────────────────────────────────────────────────────┤
//! │ L1: Contract (this crate)                               │
//! │     ByteSlice views, ByteTransform, Predictor          │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use oxiform_core::{ByteSlice, ByteSliceMut, ByteTransform, TransformSequence};
//!
//! let input = b"hello";
//! let mut output = [0u8; 8];
//!
//! let mut seq = TransformSequence::new();
//! let mut src = ByteSlice::from_slice(input);
//! let mut dst = ByteSliceMut::from_slice(&mut output);
//! seq.forward(&mut src, &mut dst).unwrap();
//!
//! assert_eq!(dst.written(), b"hello");
//! assert!(src.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod sequence;
pub mod slice;
pub mod traits;

// Re-exports for convenience
pub use error::{OxiFormError, Result};
pub use sequence::TransformSequence;
pub use slice::{ByteSlice, ByteSliceMut};
pub use traits::{
    ByteTransform, PROBA_BITS, PROBA_MAX, PROBA_THRESHOLD, Predictor, predicted_bit,
    split_buffers,
};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{OxiFormError, Result};
    pub use crate::sequence::TransformSequence;
    pub use crate::slice::{ByteSlice, ByteSliceMut};
    pub use crate::traits::{ByteTransform, PROBA_MAX, Predictor};
}

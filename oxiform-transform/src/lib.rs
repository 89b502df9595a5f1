//! Reversible byte transforms for OxiForm.
//!
//! This crate provides the transforms that sit in front of an entropy coder:
//!
//! 1. [`Aic`] - adaptive rank transform with a half move-to-front policy.
//!    Turns locally repeated symbols into small ranks.
//! 2. [`PredictorTransform`] - bit-level predictive whitening. XORs each bit
//!    with the prediction of a pluggable [`Predictor`], so that a good model
//!    leaves mostly zero bits behind.
//!
//! Both implement [`ByteTransform`] and can be chained with
//! [`TransformSequence`] or built from a [`TransformConfig`].
//!
//! ## Example
//!
//! ```rust
//! use oxiform_transform::{Aic, ByteTransform, Order0Predictor, PredictorTransform};
//!
//! let data = b"abracadabra abracadabra";
//!
//! let ranks = Aic::new().forward_all(data).unwrap();
//! assert_eq!(Aic::new().inverse_all(&ranks).unwrap(), data);
//!
//! let whitened = PredictorTransform::new(Order0Predictor::new())
//!     .forward_all(data)
//!     .unwrap();
//! let restored = PredictorTransform::new(Order0Predictor::new())
//!     .inverse_all(&whitened)
//!     .unwrap();
//! assert_eq!(restored, data);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Adaptive rank transform.
pub mod aic;
pub mod config;
#[cfg(feature = "parallel")]
pub mod parallel;
pub mod predictor;
pub mod predictors;
pub mod stats;

pub use aic::Aic;
pub use config::{DEFAULT_CHUNK_SIZE, PredictorKind, TransformConfig, TransformKind};
pub use oxiform_core::{
    ByteSlice, ByteSliceMut, ByteTransform, OxiFormError, PROBA_MAX, Predictor, Result,
    TransformSequence,
};
pub use predictor::PredictorTransform;
pub use predictors::{ConstantPredictor, Order0Predictor, Order1Predictor};
pub use stats::ZeroBitStats;

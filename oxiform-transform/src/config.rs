//! Transform selection and configuration.

use crate::aic::Aic;
use crate::predictor::PredictorTransform;
use crate::predictors::{Order0Predictor, Order1Predictor};
use oxiform_core::{ByteTransform, OxiFormError, Predictor, Result, TransformSequence};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default chunk size for streaming drivers (1 MiB).
pub const DEFAULT_CHUNK_SIZE: usize = 1 << 20;

/// Which transform to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransformKind {
    /// Adaptive rank transform.
    #[default]
    Aic,
    /// Predictive whitening.
    Predictor,
    /// Adaptive rank transform followed by predictive whitening.
    #[serde(rename = "aic+predictor")]
    AicPredictor,
}

impl TransformKind {
    /// Canonical name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Aic => "aic",
            Self::Predictor => "predictor",
            Self::AicPredictor => "aic+predictor",
        }
    }
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TransformKind {
    type Err = OxiFormError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "aic" => Ok(Self::Aic),
            "predictor" | "pt" => Ok(Self::Predictor),
            "aic+predictor" | "aic-predictor" => Ok(Self::AicPredictor),
            _ => Err(OxiFormError::unknown_transform(s)),
        }
    }
}

/// Which bit model drives the predictor transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PredictorKind {
    /// Partial-byte context.
    #[default]
    Order0,
    /// Previous byte plus partial-byte context.
    Order1,
}

impl PredictorKind {
    /// Canonical name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Order0 => "order0",
            Self::Order1 => "order1",
        }
    }

    /// Construct a fresh predictor of this kind.
    pub fn build(self) -> Box<dyn Predictor> {
        match self {
            Self::Order0 => Box::new(Order0Predictor::new()),
            Self::Order1 => Box::new(Order1Predictor::new()),
        }
    }
}

impl fmt::Display for PredictorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PredictorKind {
    type Err = OxiFormError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "order0" | "o0" => Ok(Self::Order0),
            "order1" | "o1" => Ok(Self::Order1),
            _ => Err(OxiFormError::unknown_transform(s)),
        }
    }
}

/// Configuration for building transforms and driving them over chunks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    /// Transform to run.
    pub kind: TransformKind,
    /// Model for the predictor transform.
    pub predictor: PredictorKind,
    /// Bytes per `forward`/`inverse` call.
    pub chunk_size: usize,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            kind: TransformKind::default(),
            predictor: PredictorKind::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl TransformConfig {
    /// Create a configuration for `kind` with default settings.
    pub fn new(kind: TransformKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Set the predictor model.
    pub fn with_predictor(mut self, predictor: PredictorKind) -> Self {
        self.predictor = predictor;
        self
    }

    /// Set the chunk size.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Check the configuration for values no driver can use.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(OxiFormError::invalid_config("chunk size must be non-zero"));
        }
        Ok(())
    }

    /// Build the predictor transform described by this configuration.
    pub fn build_predictor_transform(&self) -> PredictorTransform<Box<dyn Predictor>> {
        PredictorTransform::new(self.predictor.build())
    }

    /// Build a fresh transform instance without validating the
    /// configuration. Used as a factory once [`TransformConfig::validate`]
    /// has passed.
    pub fn instantiate(&self) -> Box<dyn ByteTransform> {
        match self.kind {
            TransformKind::Aic => Box::new(Aic::new()),
            TransformKind::Predictor => Box::new(self.build_predictor_transform()),
            TransformKind::AicPredictor => Box::new(TransformSequence::from_stages(vec![
                Box::new(Aic::new()) as Box<dyn ByteTransform>,
                Box::new(self.build_predictor_transform()),
            ])),
        }
    }

    /// Validate the configuration and build a fresh transform instance.
    pub fn build(&self) -> Result<Box<dyn ByteTransform>> {
        self.validate()?;

        tracing::debug!(
            transform = %self.kind,
            predictor = %self.predictor,
            chunk_size = self.chunk_size,
            "building transform"
        );
        Ok(self.instantiate())
    }
}

//! Chaining of several transforms into one.
//!
//! A [`TransformSequence`] runs its stages first-to-last on `forward` and
//! last-to-first on `inverse`. Intermediate results live in scratch buffers
//! owned by the sequence; the caller's views are only touched once the
//! whole chain has succeeded.

use crate::error::{OxiFormError, Result};
use crate::slice::{ByteSlice, ByteSliceMut};
use crate::traits::ByteTransform;

/// An ordered chain of transforms that behaves as a single transform.
#[derive(Default)]
pub struct TransformSequence {
    stages: Vec<Box<dyn ByteTransform>>,
}

impl TransformSequence {
    /// Create an empty sequence (copies input to output).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a sequence from already boxed stages.
    pub fn from_stages(stages: Vec<Box<dyn ByteTransform>>) -> Self {
        Self { stages }
    }

    /// Append a stage to the end of the chain.
    pub fn push<T: ByteTransform + 'static>(&mut self, stage: T) -> &mut Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Append a stage (builder style).
    pub fn with<T: ByteTransform + 'static>(mut self, stage: T) -> Self {
        self.push(stage);
        self
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Whether the chain has no stages.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Names of the stages in forward order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    fn emit(
        result: &[u8],
        consumed: usize,
        src: &mut ByteSlice<'_>,
        dst: &mut ByteSliceMut<'_>,
    ) -> Result<()> {
        let available = dst.len();
        let window = dst
            .window_mut()
            .ok_or_else(|| OxiFormError::buffer_too_small(result.len(), available))?;
        if window.len() < result.len() {
            return Err(OxiFormError::buffer_too_small(result.len(), window.len()));
        }
        window[..result.len()].copy_from_slice(result);
        src.consume(consumed);
        dst.consume(result.len());
        Ok(())
    }
}

impl ByteTransform for TransformSequence {
    fn forward(&mut self, src: &mut ByteSlice<'_>, dst: &mut ByteSliceMut<'_>) -> Result<()> {
        src.check()?;
        dst.check()?;

        let count = src.len();
        let needed = self.max_encoded_len(count);
        if dst.len() < needed {
            return Err(OxiFormError::buffer_too_small(needed, dst.len()));
        }

        let input = src
            .window()
            .ok_or_else(|| OxiFormError::invalid_view(src.index(), count, src.capacity()))?;
        let mut current = input.to_vec();
        for stage in &mut self.stages {
            current = stage.forward_all(&current)?;
            tracing::trace!(stage = stage.name(), len = current.len(), "sequence forward stage");
        }

        Self::emit(&current, count, src, dst)
    }

    fn inverse(&mut self, src: &mut ByteSlice<'_>, dst: &mut ByteSliceMut<'_>) -> Result<()> {
        src.check()?;
        dst.check()?;

        let count = src.len();
        let needed = self.max_decoded_len(count);
        if dst.len() < needed {
            return Err(OxiFormError::buffer_too_small(needed, dst.len()));
        }

        let input = src
            .window()
            .ok_or_else(|| OxiFormError::invalid_view(src.index(), count, src.capacity()))?;
        let mut current = input.to_vec();
        for stage in self.stages.iter_mut().rev() {
            current = stage.inverse_all(&current)?;
            tracing::trace!(stage = stage.name(), len = current.len(), "sequence inverse stage");
        }

        Self::emit(&current, count, src, dst)
    }

    fn name(&self) -> &'static str {
        "sequence"
    }

    fn max_encoded_len(&self, src_len: usize) -> usize {
        self.stages
            .iter()
            .fold(src_len, |len, stage| stage.max_encoded_len(len))
    }

    fn max_decoded_len(&self, src_len: usize) -> usize {
        self.stages
            .iter()
            .rev()
            .fold(src_len, |len, stage| stage.max_decoded_len(len))
    }
}

impl std::fmt::Debug for TransformSequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformSequence")
            .field("stages", &self.stage_names())
            .finish()
    }
}

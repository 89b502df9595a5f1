//! Chunk-parallel transforms.
//!
//! Transform instances are never shared between streams, so parallelism
//! comes from giving every chunk its own fresh instance. The output of
//! [`forward_chunks`] can only be undone by [`inverse_chunks`] with the same
//! chunk size and an equivalent factory.
//!
//! For [`crate::aic::Aic`] this matches sequential chunked processing
//! exactly, since its table is reset on every call anyway. Transforms that
//! carry state across calls, like the predictor transform, lose that state
//! at every chunk boundary.

use oxiform_core::{ByteTransform, OxiFormError, Result};
use rayon::prelude::*;

fn run_chunks<T, F, G>(data: &[u8], chunk_size: usize, make: F, apply: G) -> Result<Vec<u8>>
where
    T: ByteTransform,
    F: Fn() -> T + Sync,
    G: Fn(&mut T, &[u8]) -> Result<Vec<u8>> + Sync,
{
    if chunk_size == 0 {
        return Err(OxiFormError::invalid_config("chunk size must be non-zero"));
    }

    let chunks: Vec<Vec<u8>> = data
        .par_chunks(chunk_size)
        .map(|chunk| {
            let mut transform = make();
            apply(&mut transform, chunk)
        })
        .collect::<Result<_>>()?;

    tracing::debug!(chunks = chunks.len(), chunk_size, "parallel transform");
    Ok(chunks.concat())
}

/// Apply `forward` to every `chunk_size` piece of `data` in parallel.
pub fn forward_chunks<T, F>(data: &[u8], chunk_size: usize, make: F) -> Result<Vec<u8>>
where
    T: ByteTransform,
    F: Fn() -> T + Sync,
{
    run_chunks(data, chunk_size, make, |t, chunk| t.forward_all(chunk))
}

/// Apply `inverse` to every `chunk_size` piece of `data` in parallel.
pub fn inverse_chunks<T, F>(data: &[u8], chunk_size: usize, make: F) -> Result<Vec<u8>>
where
    T: ByteTransform,
    F: Fn() -> T + Sync,
{
    run_chunks(data, chunk_size, make, |t, chunk| t.inverse_all(chunk))
}

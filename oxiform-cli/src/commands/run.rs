//! Forward and inverse command implementation.

use crate::utils::{create_progress_bar, read_chunk};
use oxiform_core::{ByteSlice, ByteSliceMut, ByteTransform, OxiFormError};
use oxiform_transform::{TransformConfig, TransformKind};
use oxiform_transform::parallel::{forward_chunks, inverse_chunks};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Which half of a transform to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Encode.
    Forward,
    /// Decode.
    Inverse,
}

impl Direction {
    fn label(self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Inverse => "inverse",
        }
    }
}

/// Push every chunk of `reader` through one transform instance.
///
/// Returns `(bytes read, bytes written)`.
pub fn process_stream<R: Read, W: Write>(
    reader: &mut R,
    writer: &mut W,
    config: &TransformConfig,
    direction: Direction,
    mut on_chunk: impl FnMut(usize),
) -> oxiform_core::Result<(u64, u64)> {
    let mut transform = config.build()?;
    let mut input = vec![0u8; config.chunk_size];
    let mut output = Vec::new();
    let mut total_in = 0u64;
    let mut total_out = 0u64;

    loop {
        let read = read_chunk(reader, &mut input)?;
        if read == 0 {
            break;
        }

        let needed = match direction {
            Direction::Forward => transform.max_encoded_len(read),
            Direction::Inverse => transform.max_decoded_len(read),
        };
        output.resize(needed, 0);

        let mut src = ByteSlice::new(&input, 0, read);
        let mut dst = ByteSliceMut::from_slice(&mut output);
        match direction {
            Direction::Forward => transform.forward(&mut src, &mut dst)?,
            Direction::Inverse => transform.inverse(&mut src, &mut dst)?,
        }
        let produced = dst.index();

        writer.write_all(&output[..produced])?;
        total_in += read as u64;
        total_out += produced as u64;
        on_chunk(read);
    }

    writer.flush()?;
    Ok((total_in, total_out))
}

/// Reject `--parallel` for transforms whose output depends on chunk order.
///
/// Parallel mode starts every chunk from a fresh instance. AIC resets on
/// every call anyway, so its output is unchanged; a predictor would lose
/// the state it carries across chunks and produce a different stream.
pub fn check_parallel(config: &TransformConfig) -> oxiform_core::Result<()> {
    if config.kind == TransformKind::Aic {
        Ok(())
    } else {
        Err(OxiFormError::invalid_config(format!(
            "--parallel is only supported for the aic transform, not {}",
            config.kind
        )))
    }
}

pub fn cmd_run(
    input: &Path,
    output: &Path,
    config: &TransformConfig,
    direction: Direction,
    parallel: bool,
    progress: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    config.validate()?;
    if parallel {
        check_parallel(config)?;
    }

    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        transform = %config.kind,
        chunk_size = config.chunk_size,
        parallel,
        "running {}",
        direction.label()
    );

    let (total_in, total_out) = if parallel {
        let data = fs::read(input)?;
        let result = match direction {
            Direction::Forward => forward_chunks(&data, config.chunk_size, || config.instantiate())?,
            Direction::Inverse => inverse_chunks(&data, config.chunk_size, || config.instantiate())?,
        };
        fs::write(output, &result)?;
        (data.len() as u64, result.len() as u64)
    } else {
        let file = File::open(input)?;
        let len = file.metadata()?.len();
        let mut reader = BufReader::new(file);
        let mut writer = BufWriter::new(File::create(output)?);

        let pb = create_progress_bar(len, progress);
        let totals = process_stream(&mut reader, &mut writer, config, direction, |n| {
            pb.inc(n as u64)
        })?;
        pb.finish_and_clear();
        totals
    };

    println!(
        "{} {} -> {} ({} bytes -> {} bytes, {})",
        direction.label(),
        input.display(),
        output.display(),
        total_in,
        total_out,
        config.kind
    );

    Ok(())
}

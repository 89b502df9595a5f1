//! Stats command implementation.

use crate::utils::read_chunk;
use oxiform_core::{ByteSlice, ByteSliceMut, ByteTransform};
use oxiform_transform::{PredictorTransform, TransformConfig, ZeroBitStats};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// JSON report for the stats command.
#[derive(Debug, Serialize, Deserialize)]
struct StatsReport {
    file: String,
    predictor: String,
    zero_ratio_before: f64,
    zero_ratio_after: f64,
    stats: ZeroBitStats,
}

/// Run the predictor transform over `reader` and collect zero-bit statistics.
pub fn collect_stats<R: Read>(
    reader: &mut R,
    config: &TransformConfig,
) -> oxiform_core::Result<ZeroBitStats> {
    config.validate()?;

    let mut transform = PredictorTransform::with_stats(config.predictor.build());
    let mut input = vec![0u8; config.chunk_size];
    let mut output = vec![0u8; config.chunk_size];
    let mut total = ZeroBitStats::new();

    loop {
        let read = read_chunk(reader, &mut input)?;
        if read == 0 {
            break;
        }
        let mut src = ByteSlice::new(&input, 0, read);
        let mut dst = ByteSliceMut::from_slice(&mut output);
        transform.forward(&mut src, &mut dst)?;

        if let Some(chunk) = transform.take_stats() {
            tracing::debug!(
                bytes = chunk.bytes,
                zero_ratio_after = chunk.zero_ratio_after(),
                "chunk statistics"
            );
            total.merge(&chunk);
        }
    }

    Ok(total)
}

pub fn cmd_stats(
    input: &Path,
    config: &TransformConfig,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut reader = BufReader::new(File::open(input)?);
    let stats = collect_stats(&mut reader, config)?;

    if json {
        let report = StatsReport {
            file: input.display().to_string(),
            predictor: config.predictor.to_string(),
            zero_ratio_before: stats.zero_ratio_before(),
            zero_ratio_after: stats.zero_ratio_after(),
            stats,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("File: {}", input.display());
    println!("Predictor: {}", config.predictor);
    println!("Bytes: {}", stats.bytes);
    println!();
    println!("Zero bits per byte    Before       After");
    for (zeros, (before, after)) in stats.before.iter().zip(&stats.after).enumerate() {
        println!("  {}                  {:>10}  {:>10}", zeros, before, after);
    }
    println!();
    println!("Bytes with high bit set: {}", stats.high_bit_set);
    println!("Zero bits before: {:.4}", stats.zero_ratio_before());
    println!("Zero bits after:  {:.4}", stats.zero_ratio_after());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxiform_core::OxiFormError;
    use oxiform_transform::{PredictorKind, TransformKind};
    use std::io::{self, Cursor};

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("device unplugged"))
        }
    }

    #[test]
    fn test_collect_stats_counts_every_byte() {
        let data = vec![0x55u8; 2500];
        let config = TransformConfig::new(TransformKind::Predictor)
            .with_predictor(PredictorKind::Order0)
            .with_chunk_size(1000);
        let stats = collect_stats(&mut Cursor::new(&data), &config).unwrap();
        assert_eq!(stats.bytes, 2500);
        assert_eq!(stats.before[4], 2500);
        assert!(stats.zero_ratio_after() > 0.9);
    }

    #[test]
    fn test_collect_stats_empty_input() {
        let config = TransformConfig::default();
        let stats = collect_stats(&mut Cursor::new(Vec::new()), &config).unwrap();
        assert_eq!(stats, ZeroBitStats::default());
    }

    #[test]
    fn test_chunked_stats_match_single_pass() {
        let data: Vec<u8> = (0..3000u32).map(|i| (i * 31 % 97) as u8).collect();
        let config = TransformConfig::default().with_predictor(PredictorKind::Order1);
        let whole = collect_stats(&mut Cursor::new(&data), &config).unwrap();
        let chunked =
            collect_stats(&mut Cursor::new(&data), &config.clone().with_chunk_size(128)).unwrap();
        assert_eq!(chunked, whole);
        assert_eq!(chunked.bytes, 3000);
    }

    #[test]
    fn test_read_failure_is_io_error() {
        let result = collect_stats(&mut FailingReader, &TransformConfig::default());
        assert!(matches!(result, Err(OxiFormError::Io(_))));
    }

    #[test]
    fn test_report_serializes() {
        let report = StatsReport {
            file: "input.bin".to_string(),
            predictor: "order0".to_string(),
            zero_ratio_before: 0.5,
            zero_ratio_after: 0.75,
            stats: ZeroBitStats::default(),
        };
        let text = serde_json::to_string(&report).unwrap();
        assert!(text.contains("\"zero_ratio_after\":0.75"));
    }
}

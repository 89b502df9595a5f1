//! Bit-level predictive whitening.
//!
//! Every input bit, most significant first, is XORed with the bit the
//! predictor expects. Correct predictions turn into zero bits, so a good
//! model leaves a stream dominated by zeros for the entropy coder.
//!
//! The predictor is queried before each bit and updated with the actual bit
//! right after, so each estimate only depends on bits already seen. The
//! decoder replays exactly the same queries and updates from the bits it
//! recovers, which keeps both sides in lockstep without side information.
//!
//! Unlike [`crate::aic::Aic`], the predictor state carries over from one
//! call to the next: a stream split into chunks must be decoded chunk by
//! chunk, in order, by a transform whose predictor started in the same
//! state.

use crate::stats::ZeroBitStats;
use oxiform_core::{
    ByteSlice, ByteSliceMut, ByteTransform, Predictor, Result, predicted_bit, split_buffers,
};

/// Predictive whitening transform driven by a [`Predictor`].
#[derive(Debug, Clone)]
pub struct PredictorTransform<P> {
    predictor: P,
    stats: Option<ZeroBitStats>,
}

impl<P: Predictor> PredictorTransform<P> {
    /// Create a transform that owns `predictor`.
    pub fn new(predictor: P) -> Self {
        Self {
            predictor,
            stats: None,
        }
    }

    /// Create a transform that also records [`ZeroBitStats`] on `forward`.
    pub fn with_stats(predictor: P) -> Self {
        Self {
            predictor,
            stats: Some(ZeroBitStats::new()),
        }
    }

    /// The current predictor.
    pub fn predictor(&self) -> &P {
        &self.predictor
    }

    /// Statistics gathered so far, if collection is enabled.
    pub fn stats(&self) -> Option<&ZeroBitStats> {
        self.stats.as_ref()
    }

    /// Take the gathered statistics, leaving an empty set in place.
    pub fn take_stats(&mut self) -> Option<ZeroBitStats> {
        self.stats.as_mut().map(std::mem::take)
    }

    #[inline]
    fn encode_byte(&mut self, byte: u8) -> u8 {
        let mut out = 0u8;

        for shift in (0..8).rev() {
            let bit = (byte >> shift) & 1 == 1;
            let expected = predicted_bit(self.predictor.get());
            out |= u8::from(expected ^ bit) << shift;
            self.predictor.update(bit);
        }

        out
    }

    #[inline]
    fn decode_byte(&mut self, byte: u8) -> u8 {
        let mut out = 0u8;

        for shift in (0..8).rev() {
            let expected = predicted_bit(self.predictor.get());
            let bit = ((byte >> shift) & 1 == 1) ^ expected;
            out |= u8::from(bit) << shift;
            self.predictor.update(bit);
        }

        out
    }
}

impl<P: Predictor> ByteTransform for PredictorTransform<P> {
    fn forward(&mut self, src: &mut ByteSlice<'_>, dst: &mut ByteSliceMut<'_>) -> Result<()> {
        let count = src.len();
        let (input, output) = split_buffers(src, dst, count)?;

        for (out, &byte) in output.iter_mut().zip(input) {
            *out = self.encode_byte(byte);
        }

        if let Some(stats) = self.stats.as_mut() {
            for (&before, &after) in input.iter().zip(output.iter()) {
                stats.record(before, after);
            }
            tracing::debug!(
                bytes = stats.bytes,
                zeros_before = stats.zero_ratio_before(),
                zeros_after = stats.zero_ratio_after(),
                "predictor transform statistics"
            );
        }

        src.consume(count);
        dst.consume(count);
        tracing::trace!(count, "predictor forward");
        Ok(())
    }

    fn inverse(&mut self, src: &mut ByteSlice<'_>, dst: &mut ByteSliceMut<'_>) -> Result<()> {
        let count = src.len();
        let (input, output) = split_buffers(src, dst, count)?;

        for (out, &byte) in output.iter_mut().zip(input) {
            *out = self.decode_byte(byte);
        }

        src.consume(count);
        dst.consume(count);
        tracing::trace!(count, "predictor inverse");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "predictor"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predictors::{ConstantPredictor, Order0Predictor};

    #[test]
    fn test_perfect_one_prediction() {
        let mut t = PredictorTransform::new(ConstantPredictor::ONE);
        assert_eq!(t.forward_all(&[0xFF]).unwrap(), vec![0x00]);
    }

    #[test]
    fn test_perfect_zero_prediction() {
        let mut t = PredictorTransform::new(ConstantPredictor::ZERO);
        assert_eq!(t.forward_all(&[0x00]).unwrap(), vec![0x00]);
    }

    #[test]
    fn test_wrong_prediction_inverts() {
        let mut t = PredictorTransform::new(ConstantPredictor::ONE);
        assert_eq!(t.forward_all(&[0x00, 0x0F]).unwrap(), vec![0xFF, 0xF0]);

        let mut t = PredictorTransform::new(ConstantPredictor::ZERO);
        assert_eq!(t.forward_all(&[0x5A]).unwrap(), vec![0x5A]);
    }

    #[test]
    fn test_threshold_is_midpoint() {
        let mut low = PredictorTransform::new(ConstantPredictor::new(1023));
        assert_eq!(low.forward_all(&[0x00]).unwrap(), vec![0x00]);

        let mut high = PredictorTransform::new(ConstantPredictor::new(1024));
        assert_eq!(high.forward_all(&[0xFF]).unwrap(), vec![0x00]);
    }

    #[test]
    fn test_roundtrip_order0() {
        let data = b"Predictive whitening turns structure into zeros. ".repeat(20);
        let encoded = PredictorTransform::new(Order0Predictor::new())
            .forward_all(&data)
            .unwrap();
        let decoded = PredictorTransform::new(Order0Predictor::new())
            .inverse_all(&encoded)
            .unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn test_whitening_increases_zeros() {
        let data = vec![0xAAu8; 4096];
        let mut t = PredictorTransform::with_stats(Order0Predictor::new());
        t.forward_all(&data).unwrap();

        let stats = t.stats().unwrap();
        assert_eq!(stats.bytes, 4096);
        assert!(stats.zero_ratio_after() > 0.95);
        assert!((stats.zero_ratio_before() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_stats_disabled_by_default() {
        let mut t = PredictorTransform::new(Order0Predictor::new());
        t.forward_all(b"abc").unwrap();
        assert!(t.stats().is_none());
        assert!(t.take_stats().is_none());
    }

    #[test]
    fn test_take_stats_resets() {
        let mut t = PredictorTransform::with_stats(Order0Predictor::new());
        t.forward_all(b"abc").unwrap();
        assert_eq!(t.take_stats().map(|s| s.bytes), Some(3));
        assert_eq!(t.stats().map(|s| s.bytes), Some(0));
    }

    #[test]
    fn test_stats_do_not_change_output() {
        let data = b"same output with or without statistics";
        let plain = PredictorTransform::new(Order0Predictor::new())
            .forward_all(data)
            .unwrap();
        let observed = PredictorTransform::with_stats(Order0Predictor::new())
            .forward_all(data)
            .unwrap();
        assert_eq!(plain, observed);
    }
}

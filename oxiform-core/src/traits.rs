//! Core traits for reversible transforms and bit predictors.
//!
//! [`ByteTransform`] is implemented by every reversible transform in the
//! toolkit. [`Predictor`] is the capability a bit-level model must provide
//! to drive predictive transforms.

use crate::error::{OxiFormError, Result};
use crate::slice::{ByteSlice, ByteSliceMut};

/// Number of bits in a fixed-point probability.
pub const PROBA_BITS: u32 = 11;

/// Largest probability a predictor may report (certainty of a 1 bit).
pub const PROBA_MAX: u16 = (1 << PROBA_BITS) - 1;

/// Probabilities strictly above this value predict a 1 bit.
pub const PROBA_THRESHOLD: u16 = PROBA_MAX / 2;

/// An adaptive estimator of the probability that the next bit is 1.
///
/// Implementations must be causal and deterministic: the value returned by
/// [`Predictor::get`] may only depend on the ordered sequence of bits passed
/// to [`Predictor::update`] since construction (or reset). An encoder and a
/// decoder that start from the same state and see the same bits then
/// produce identical estimates.
pub trait Predictor {
    /// Current estimate in `0..=PROBA_MAX`. Must not change state.
    fn get(&self) -> u16;

    /// Feed the actual value of the bit that was just predicted.
    fn update(&mut self, bit: bool);
}

impl<P: Predictor + ?Sized> Predictor for &mut P {
    fn get(&self) -> u16 {
        (**self).get()
    }

    fn update(&mut self, bit: bool) {
        (**self).update(bit)
    }
}

impl<P: Predictor + ?Sized> Predictor for Box<P> {
    fn get(&self) -> u16 {
        (**self).get()
    }

    fn update(&mut self, bit: bool) {
        (**self).update(bit)
    }
}

/// Map a fixed-point probability to the bit it predicts.
#[inline]
pub fn predicted_bit(pr: u16) -> bool {
    pr > PROBA_THRESHOLD
}

/// A stateful, reversible transform over bounded buffer views.
///
/// `forward` and `inverse` read every byte of `src` and write the result at
/// the start of `dst`. On success both views are advanced past the bytes
/// consumed and produced. On error nothing is written and neither view
/// moves.
///
/// A transform instance must not be shared between two logical streams.
/// Each `inverse` call must be paired with the `forward` call that produced
/// its input, in the same order.
pub trait ByteTransform {
    /// Apply the transform.
    fn forward(&mut self, src: &mut ByteSlice<'_>, dst: &mut ByteSliceMut<'_>) -> Result<()>;

    /// Undo the transform.
    fn inverse(&mut self, src: &mut ByteSlice<'_>, dst: &mut ByteSliceMut<'_>) -> Result<()>;

    /// Short identifier used in diagnostics.
    fn name(&self) -> &'static str;

    /// Upper bound on the bytes `forward` produces for `src_len` input bytes.
    fn max_encoded_len(&self, src_len: usize) -> usize {
        src_len
    }

    /// Upper bound on the bytes `inverse` produces for `src_len` input bytes.
    fn max_decoded_len(&self, src_len: usize) -> usize {
        src_len
    }

    /// Apply the transform to a whole buffer (convenience method).
    fn forward_all(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        let mut output = vec![0u8; self.max_encoded_len(input.len())];
        let mut src = ByteSlice::from_slice(input);
        let mut dst = ByteSliceMut::from_slice(&mut output);
        self.forward(&mut src, &mut dst)?;
        let produced = dst.index();
        output.truncate(produced);
        Ok(output)
    }

    /// Undo the transform on a whole buffer (convenience method).
    fn inverse_all(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        let mut output = vec![0u8; self.max_decoded_len(input.len())];
        let mut src = ByteSlice::from_slice(input);
        let mut dst = ByteSliceMut::from_slice(&mut output);
        self.inverse(&mut src, &mut dst)?;
        let produced = dst.index();
        output.truncate(produced);
        Ok(output)
    }
}

impl<T: ByteTransform + ?Sized> ByteTransform for Box<T> {
    fn forward(&mut self, src: &mut ByteSlice<'_>, dst: &mut ByteSliceMut<'_>) -> Result<()> {
        (**self).forward(src, dst)
    }

    fn inverse(&mut self, src: &mut ByteSlice<'_>, dst: &mut ByteSliceMut<'_>) -> Result<()> {
        (**self).inverse(src, dst)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn max_encoded_len(&self, src_len: usize) -> usize {
        (**self).max_encoded_len(src_len)
    }

    fn max_decoded_len(&self, src_len: usize) -> usize {
        (**self).max_decoded_len(src_len)
    }
}

/// Validate both views for a call that produces `count` bytes and return
/// the source window together with the first `count` destination bytes.
///
/// This is the shared precondition check of every length-preserving
/// transform. It never writes to `dst`.
pub fn split_buffers<'s, 'd>(
    src: &ByteSlice<'s>,
    dst: &'d mut ByteSliceMut<'_>,
    count: usize,
) -> Result<(&'s [u8], &'d mut [u8])> {
    src.check()?;
    dst.check()?;

    let available = dst.len();
    if available < count {
        return Err(OxiFormError::buffer_too_small(count, available));
    }

    let input = src
        .window()
        .ok_or_else(|| OxiFormError::invalid_view(src.index(), src.len(), src.capacity()))?;
    let output = dst
        .window_mut()
        .ok_or_else(|| OxiFormError::buffer_too_small(count, available))?;

    Ok((input, &mut output[..count]))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(u16);

    impl Predictor for Fixed {
        fn get(&self) -> u16 {
            self.0
        }

        fn update(&mut self, _bit: bool) {}
    }

    /// Adds one to every byte.
    struct Increment;

    impl ByteTransform for Increment {
        fn forward(&mut self, src: &mut ByteSlice<'_>, dst: &mut ByteSliceMut<'_>) -> Result<()> {
            let count = src.len();
            let (input, output) = split_buffers(src, dst, count)?;
            for (o, &i) in output.iter_mut().zip(input) {
                *o = i.wrapping_add(1);
            }
            src.consume(count);
            dst.consume(count);
            Ok(())
        }

        fn inverse(&mut self, src: &mut ByteSlice<'_>, dst: &mut ByteSliceMut<'_>) -> Result<()> {
            let count = src.len();
            let (input, output) = split_buffers(src, dst, count)?;
            for (o, &i) in output.iter_mut().zip(input) {
                *o = i.wrapping_sub(1);
            }
            src.consume(count);
            dst.consume(count);
            Ok(())
        }

        fn name(&self) -> &'static str {
            "increment"
        }
    }

    #[test]
    fn test_predicted_bit_threshold() {
        assert!(!predicted_bit(0));
        assert!(!predicted_bit(1023));
        assert!(predicted_bit(1024));
        assert!(predicted_bit(PROBA_MAX));
        assert_eq!(PROBA_MAX, 2047);
    }

    #[test]
    fn test_predictor_forwarding_impls() {
        fn drive<P: Predictor>(mut predictor: P) -> u16 {
            predictor.update(true);
            predictor.get()
        }

        let mut fixed = Fixed(512);
        assert_eq!(drive(&mut fixed), 512);
        let boxed: Box<dyn Predictor> = Box::new(Fixed(2000));
        assert_eq!(boxed.get(), 2000);
    }

    #[test]
    fn test_split_buffers_too_small() {
        let input = [1u8, 2, 3];
        let mut output = [0u8; 2];
        let src = ByteSlice::from_slice(&input);
        let mut dst = ByteSliceMut::from_slice(&mut output);
        let err = split_buffers(&src, &mut dst, 3).unwrap_err();
        assert!(matches!(
            err,
            OxiFormError::BufferTooSmall {
                needed: 3,
                available: 2
            }
        ));
    }

    #[test]
    fn test_all_helpers_roundtrip() {
        let mut t = Increment;
        let encoded = t.forward_all(&[0, 1, 255]).unwrap();
        assert_eq!(encoded, vec![1, 2, 0]);
        assert_eq!(t.inverse_all(&encoded).unwrap(), vec![0, 1, 255]);
    }

    #[test]
    fn test_cursor_semantics() {
        let input = [10u8, 20, 30, 40];
        let mut output = [0u8; 8];
        let mut dst = ByteSliceMut::from_slice(&mut output);
        let mut t = Increment;

        let mut first = ByteSlice::new(&input, 0, 2);
        t.forward(&mut first, &mut dst).unwrap();
        assert_eq!(first.index(), 2);
        assert!(first.is_empty());

        let mut second = ByteSlice::new(&input, 2, 2);
        t.forward(&mut second, &mut dst).unwrap();
        assert_eq!(dst.index(), 4);
        assert_eq!(dst.len(), 4);
        assert_eq!(dst.written(), &[11, 21, 31, 41]);
    }

    #[test]
    fn test_boxed_transform() {
        let mut t: Box<dyn ByteTransform> = Box::new(Increment);
        assert_eq!(t.name(), "increment");
        assert_eq!(t.forward_all(b"a").unwrap(), b"b".to_vec());
    }
}

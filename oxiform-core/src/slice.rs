//! Bounded buffer views with cursor semantics.
//!
//! A view describes a window `[index, index + length)` inside caller-owned
//! storage. Views are cheap to construct and never validate eagerly; the
//! transforms call [`ByteSlice::check`] / [`ByteSliceMut::check`] before
//! touching memory.
//!
//! After a successful transform call both views are advanced with
//! `consume`: the start offset moves forward and the length shrinks by the
//! same amount. A destination view therefore always describes its free
//! tail, and successive calls append to the same output buffer.
//!
//! Source and destination storage can never alias: a [`ByteSlice`] holds a
//! shared borrow and a [`ByteSliceMut`] an exclusive one, so the following
//! is rejected at compile time.
//!
//! ```compile_fail
//! use oxiform_core::{ByteSlice, ByteSliceMut, ByteTransform};
//!
//! fn run(transform: &mut dyn ByteTransform) {
//!     let mut buffer = vec![0u8; 16];
//!     let mut src = ByteSlice::from_slice(&buffer);
//!     let mut dst = ByteSliceMut::from_slice(&mut buffer);
//!     let _ = transform.forward(&mut src, &mut dst);
//! }
//! ```

use crate::error::{OxiFormError, Result};

fn window_fits(index: usize, length: usize, capacity: usize) -> bool {
    index
        .checked_add(length)
        .is_some_and(|end| end <= capacity)
}

/// A read-only view into a byte array.
#[derive(Debug, Clone, Copy)]
pub struct ByteSlice<'a> {
    array: &'a [u8],
    index: usize,
    length: usize,
}

impl<'a> ByteSlice<'a> {
    /// Create a view of `length` bytes starting at `index`.
    ///
    /// The view is not validated here; see [`ByteSlice::is_valid`].
    pub fn new(array: &'a [u8], index: usize, length: usize) -> Self {
        Self {
            array,
            index,
            length,
        }
    }

    /// Create a view covering the whole array.
    pub fn from_slice(array: &'a [u8]) -> Self {
        Self::new(array, 0, array.len())
    }

    /// Start offset of the view.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Logical length of the view.
    pub fn len(&self) -> usize {
        self.length
    }

    /// Whether the view has no bytes left.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Capacity of the underlying storage.
    pub fn capacity(&self) -> usize {
        self.array.len()
    }

    /// Whether the window lies inside the underlying storage.
    pub fn is_valid(&self) -> bool {
        window_fits(self.index, self.length, self.array.len())
    }

    /// Like [`ByteSlice::is_valid`], but returns a descriptive error.
    pub fn check(&self) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(OxiFormError::invalid_view(
                self.index,
                self.length,
                self.array.len(),
            ))
        }
    }

    /// The bytes inside the window, or `None` if the view is invalid.
    pub fn window(&self) -> Option<&'a [u8]> {
        let array: &'a [u8] = self.array;
        array.get(self.index..self.index.checked_add(self.length)?)
    }

    /// Advance the cursor past `n` consumed bytes.
    pub fn consume(&mut self, n: usize) {
        debug_assert!(n <= self.length, "consumed past the end of the view");
        let n = n.min(self.length);
        self.index += n;
        self.length -= n;
    }
}

impl<'a> From<&'a [u8]> for ByteSlice<'a> {
    fn from(array: &'a [u8]) -> Self {
        Self::from_slice(array)
    }
}

/// A writable view into a byte array.
#[derive(Debug)]
pub struct ByteSliceMut<'a> {
    array: &'a mut [u8],
    index: usize,
    length: usize,
}

impl<'a> ByteSliceMut<'a> {
    /// Create a view of `length` bytes starting at `index`.
    ///
    /// The view is not validated here; see [`ByteSliceMut::is_valid`].
    pub fn new(array: &'a mut [u8], index: usize, length: usize) -> Self {
        Self {
            array,
            index,
            length,
        }
    }

    /// Create a view covering the whole array.
    pub fn from_slice(array: &'a mut [u8]) -> Self {
        let length = array.len();
        Self::new(array, 0, length)
    }

    /// Start offset of the view.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Logical length of the view.
    pub fn len(&self) -> usize {
        self.length
    }

    /// Whether the view has no room left.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Capacity of the underlying storage.
    pub fn capacity(&self) -> usize {
        self.array.len()
    }

    /// Whether the window lies inside the underlying storage.
    pub fn is_valid(&self) -> bool {
        window_fits(self.index, self.length, self.array.len())
    }

    /// Like [`ByteSliceMut::is_valid`], but returns a descriptive error.
    pub fn check(&self) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(OxiFormError::invalid_view(
                self.index,
                self.length,
                self.array.len(),
            ))
        }
    }

    /// The bytes inside the window, or `None` if the view is invalid.
    pub fn window(&self) -> Option<&[u8]> {
        self.array
            .get(self.index..self.index.checked_add(self.length)?)
    }

    /// Mutable access to the window, or `None` if the view is invalid.
    pub fn window_mut(&mut self) -> Option<&mut [u8]> {
        let end = self.index.checked_add(self.length)?;
        self.array.get_mut(self.index..end)
    }

    /// Everything written before the cursor.
    pub fn written(&self) -> &[u8] {
        &self.array[..self.index.min(self.array.len())]
    }

    /// Advance the cursor past `n` produced bytes.
    pub fn consume(&mut self, n: usize) {
        debug_assert!(n <= self.length, "produced past the end of the view");
        let n = n.min(self.length);
        self.index += n;
        self.length -= n;
    }
}

impl<'a> From<&'a mut [u8]> for ByteSliceMut<'a> {
    fn from(array: &'a mut [u8]) -> Self {
        Self::from_slice(array)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_view_is_valid() {
        let data = [1u8, 2, 3, 4];
        let view = ByteSlice::from_slice(&data);
        assert!(view.is_valid());
        assert_eq!(view.len(), 4);
        assert_eq!(view.window(), Some(&data[..]));
    }

    #[test]
    fn test_sub_view() {
        let data = [1u8, 2, 3, 4, 5];
        let view = ByteSlice::new(&data, 1, 3);
        assert_eq!(view.window(), Some(&[2u8, 3, 4][..]));
        assert_eq!(view.capacity(), 5);
    }

    #[test]
    fn test_invalid_views() {
        let data = [0u8; 8];
        assert!(!ByteSlice::new(&data, 4, 5).is_valid());
        assert!(!ByteSlice::new(&data, 9, 0).is_valid());
        assert!(!ByteSlice::new(&data, usize::MAX, 2).is_valid());
        assert!(ByteSlice::new(&data, 8, 0).is_valid());
        assert!(ByteSlice::new(&data, 4, 5).window().is_none());

        let err = ByteSlice::new(&data, 4, 5).check().unwrap_err();
        assert!(matches!(
            err,
            OxiFormError::InvalidView {
                index: 4,
                length: 5,
                capacity: 8
            }
        ));
    }

    #[test]
    fn test_empty_storage() {
        let view = ByteSlice::from_slice(&[]);
        assert!(view.is_valid());
        assert!(view.is_empty());
    }

    #[test]
    fn test_consume_advances_cursor() {
        let data = [0u8; 10];
        let mut view = ByteSlice::new(&data, 2, 6);
        view.consume(4);
        assert_eq!(view.index(), 6);
        assert_eq!(view.len(), 2);
        assert!(view.is_valid());
    }

    #[test]
    fn test_mut_view_written_and_window() {
        let mut data = [0u8; 6];
        let mut view = ByteSliceMut::from_slice(&mut data);
        if let Some(window) = view.window_mut() {
            window[..2].copy_from_slice(&[7, 8]);
        }
        view.consume(2);
        assert_eq!(view.written(), &[7, 8]);
        assert_eq!(view.len(), 4);
        assert_eq!(view.window().map(<[u8]>::len), Some(4));
    }

    #[test]
    fn test_mut_view_invalid() {
        let mut data = [0u8; 4];
        let mut view = ByteSliceMut::new(&mut data, 3, 2);
        assert!(!view.is_valid());
        assert!(view.window_mut().is_none());
        assert!(view.check().is_err());
    }
}

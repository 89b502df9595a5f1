//! Adaptive rank transform (half move-to-front).
//!
//! Each byte is replaced by its current rank in a self-adjusting symbol
//! list. Unlike the classic move-to-front used by BZip2, a symbol found at
//! rank `idx` only advances to rank `idx / 2`: the symbols between the two
//! positions slide back by one and everything else keeps its place.
//!
//! The table is reset to the identity permutation at the start of every
//! `forward` and `inverse` call, so each call is an independent stream.

use oxiform_core::{ByteSlice, ByteSliceMut, ByteTransform, Result, split_buffers};

/// Size of the byte alphabet.
const ALPHABET: usize = 256;

/// Adaptive rank transform.
#[derive(Debug, Clone)]
pub struct Aic {
    /// Rank -> symbol.
    rank_to_symbol: [u8; ALPHABET],
    /// Symbol -> rank, inverse of `rank_to_symbol`. Only maintained on encode.
    symbol_to_rank: [u8; ALPHABET],
}

impl Aic {
    /// Create a transform with identity tables.
    pub fn new() -> Self {
        let mut aic = Self {
            rank_to_symbol: [0; ALPHABET],
            symbol_to_rank: [0; ALPHABET],
        };
        aic.reset();
        aic
    }

    /// Restore both tables to the identity permutation.
    pub fn reset(&mut self) {
        for (k, (r2s, s2r)) in self
            .rank_to_symbol
            .iter_mut()
            .zip(self.symbol_to_rank.iter_mut())
            .enumerate()
        {
            *r2s = k as u8;
            *s2r = k as u8;
        }
    }

    /// Current rank of `symbol` in the encoder table.
    pub fn rank_of(&self, symbol: u8) -> u8 {
        self.symbol_to_rank[symbol as usize]
    }

    /// Symbol currently at `rank`.
    pub fn symbol_at(&self, rank: u8) -> u8 {
        self.rank_to_symbol[rank as usize]
    }

    /// The rank -> symbol table.
    pub fn ranks(&self) -> &[u8; ALPHABET] {
        &self.rank_to_symbol
    }

    /// Encode one byte and update both tables.
    #[inline]
    fn encode_symbol(&mut self, c: u8) -> u8 {
        let idx = self.symbol_to_rank[c as usize];

        if idx > 0 {
            let lb = (idx >> 1) as usize;
            let idx = idx as usize;

            for r in (lb + 1..=idx).rev() {
                let moved = self.rank_to_symbol[r - 1];
                self.rank_to_symbol[r] = moved;
                self.symbol_to_rank[moved as usize] = r as u8;
            }

            self.rank_to_symbol[lb] = c;
            self.symbol_to_rank[c as usize] = lb as u8;
        }

        idx
    }

    /// Decode one rank, replaying the encoder's table update.
    #[inline]
    fn decode_symbol(&mut self, idx: u8) -> u8 {
        let c = self.rank_to_symbol[idx as usize];

        if idx > 0 {
            let lb = (idx >> 1) as usize;
            self.rank_to_symbol.copy_within(lb..idx as usize, lb + 1);
            self.rank_to_symbol[lb] = c;
        }

        c
    }
}

impl Default for Aic {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteTransform for Aic {
    fn forward(&mut self, src: &mut ByteSlice<'_>, dst: &mut ByteSliceMut<'_>) -> Result<()> {
        let count = src.len();
        let (input, output) = split_buffers(src, dst, count)?;

        self.reset();

        for (out, &c) in output.iter_mut().zip(input) {
            *out = self.encode_symbol(c);
        }

        src.consume(count);
        dst.consume(count);
        tracing::trace!(count, "aic forward");
        Ok(())
    }

    fn inverse(&mut self, src: &mut ByteSlice<'_>, dst: &mut ByteSliceMut<'_>) -> Result<()> {
        let count = src.len();
        let (input, output) = split_buffers(src, dst, count)?;

        // Decoding never consults symbol_to_rank; only the rank table is reset.
        for (k, r2s) in self.rank_to_symbol.iter_mut().enumerate() {
            *r2s = k as u8;
        }

        for (out, &idx) in output.iter_mut().zip(input) {
            *out = self.decode_symbol(idx);
        }

        src.consume(count);
        dst.consume(count);
        tracing::trace!(count, "aic inverse");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "aic"
    }
}

/// Apply the AIC transform to a whole buffer.
pub fn transform(data: &[u8]) -> Vec<u8> {
    let mut aic = Aic::new();
    data.iter().map(|&c| aic.encode_symbol(c)).collect()
}

/// Undo the AIC transform on a whole buffer.
pub fn inverse_transform(data: &[u8]) -> Vec<u8> {
    let mut aic = Aic::new();
    data.iter().map(|&idx| aic.decode_symbol(idx)).collect()
}

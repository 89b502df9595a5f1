//! Reference bit predictors.
//!
//! These models implement the [`Predictor`] capability with simple adaptive
//! bit probabilities in the style of the LZMA literal coder: one 11-bit
//! probability per context, nudged towards the observed bit by a fixed
//! shift after every update.
//!
//! The bit context is the partial byte seen so far, starting at 1 and
//! growing as `ctx * 2 + bit` until eight bits have been observed.

use oxiform_core::{PROBA_BITS, PROBA_MAX, Predictor};

/// Initial probability (0.5).
pub const PROB_INIT: u16 = 1 << (PROBA_BITS - 1);

/// Adaptation speed: probabilities move by `1 / 2^MOVE_BITS` of the error.
pub const MOVE_BITS: u32 = 5;

/// Scale the probabilities are kept in.
const PROB_SCALE: u16 = 1 << PROBA_BITS;

#[inline]
fn adapt(prob: &mut u16, bit: bool) {
    if bit {
        *prob += (PROB_SCALE - *prob) >> MOVE_BITS;
    } else {
        *prob -= *prob >> MOVE_BITS;
    }
}

/// A predictor that never learns. Handy for tests and as a baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstantPredictor(u16);

impl ConstantPredictor {
    /// Always predicts 1 with certainty.
    pub const ONE: Self = Self(PROBA_MAX);
    /// Always predicts 0 with certainty.
    pub const ZERO: Self = Self(0);

    /// Create a predictor returning `p` (clamped to `0..=PROBA_MAX`).
    pub fn new(p: u16) -> Self {
        Self(p.min(PROBA_MAX))
    }
}

impl Predictor for ConstantPredictor {
    fn get(&self) -> u16 {
        self.0
    }

    fn update(&mut self, _bit: bool) {}
}

/// Order-0 bitwise model: context is the partial current byte.
#[derive(Debug, Clone)]
pub struct Order0Predictor {
    probs: [u16; 256],
    ctx: usize,
}

impl Order0Predictor {
    /// Create a model with every probability at 0.5.
    pub fn new() -> Self {
        Self {
            probs: [PROB_INIT; 256],
            ctx: 1,
        }
    }

    /// Forget everything learned so far.
    pub fn reset(&mut self) {
        self.probs.fill(PROB_INIT);
        self.ctx = 1;
    }
}

impl Default for Order0Predictor {
    fn default() -> Self {
        Self::new()
    }
}

impl Predictor for Order0Predictor {
    fn get(&self) -> u16 {
        self.probs[self.ctx].min(PROBA_MAX)
    }

    fn update(&mut self, bit: bool) {
        adapt(&mut self.probs[self.ctx], bit);
        self.ctx = (self.ctx << 1) | bit as usize;
        if self.ctx >= 256 {
            self.ctx = 1;
        }
    }
}

/// Order-1 bitwise model: context is the previous byte plus the partial
/// current byte.
#[derive(Debug, Clone)]
pub struct Order1Predictor {
    probs: Vec<u16>,
    prev: usize,
    ctx: usize,
}

impl Order1Predictor {
    /// Create a model with every probability at 0.5.
    pub fn new() -> Self {
        Self {
            probs: vec![PROB_INIT; 256 * 256],
            prev: 0,
            ctx: 1,
        }
    }

    /// Forget everything learned so far.
    pub fn reset(&mut self) {
        self.probs.fill(PROB_INIT);
        self.prev = 0;
        self.ctx = 1;
    }

    #[inline]
    fn slot(&self) -> usize {
        (self.prev << 8) | self.ctx
    }
}

impl Default for Order1Predictor {
    fn default() -> Self {
        Self::new()
    }
}

impl Predictor for Order1Predictor {
    fn get(&self) -> u16 {
        self.probs[self.slot()].min(PROBA_MAX)
    }

    fn update(&mut self, bit: bool) {
        let slot = self.slot();
        adapt(&mut self.probs[slot], bit);
        self.ctx = (self.ctx << 1) | bit as usize;
        if self.ctx >= 256 {
            self.prev = self.ctx & 0xFF;
            self.ctx = 1;
        }
    }
}

//! The rank/select capability every shape backend provides.
//!
//! [`SuccinctTree`](crate::louds::SuccinctTree) navigates exclusively through
//! this trait, so the linear-scan [`BitSequence`](crate::implicit::BitSequence)
//! and the indexed [`BitVector`](crate::bitvec::BitVector) are interchangeable:
//! one trades query time for zero index overhead, the other spends a few
//! percent of extra space for constant-time rank.
//!
//! # Conventions
//!
//! - `rank(i, b)` counts `b` over the *closed* range $[0, i]$.
//! - `select(n, b)` takes a 1-indexed occurrence count.
//!
//! Both conventions match the LOUDS navigation formulas directly, so the tree
//! code never has to shift by one when switching between the two primitives.

use std::fmt;

use crate::error::Result;

/// A single bit value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bit {
    /// The `0` bit.
    Zero,
    /// The `1` bit.
    One,
}

impl Bit {
    /// Return true for [`Bit::One`].
    #[inline]
    pub fn is_one(self) -> bool {
        self == Bit::One
    }

    /// The opposite bit.
    #[inline]
    pub fn flip(self) -> Self {
        match self {
            Bit::Zero => Bit::One,
            Bit::One => Bit::Zero,
        }
    }
}

impl From<bool> for Bit {
    fn from(set: bool) -> Self {
        if set {
            Bit::One
        } else {
            Bit::Zero
        }
    }
}

impl From<Bit> for bool {
    fn from(bit: Bit) -> Self {
        bit.is_one()
    }
}

impl fmt::Display for Bit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bit::Zero => f.write_str("0"),
            Bit::One => f.write_str("1"),
        }
    }
}

/// Read-only rank/select access over a frozen bit sequence.
pub trait RankSelect {
    /// Number of bits stored.
    fn len(&self) -> usize;

    /// Return true if no bits are stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The bit at position `i`, or `None` past the end.
    fn get(&self, i: usize) -> Option<Bit>;

    /// Count occurrences of `bit` in positions `[0, i]`.
    ///
    /// Fails with [`Error::IndexOutOfBounds`](crate::Error::IndexOutOfBounds)
    /// when `i >= len()`.
    fn rank(&self, i: usize, bit: Bit) -> Result<usize>;

    /// Position of the `n`-th occurrence of `bit`, counting from `n = 1`.
    ///
    /// Returns `Ok(None)` when fewer than `n` occurrences exist and
    /// [`Error::InvalidSelection`](crate::Error::InvalidSelection) for `n = 0`.
    fn select(&self, n: usize, bit: Bit) -> Result<Option<usize>>;

    /// Payload size in bits, excluding any auxiliary index.
    fn size_in_bits(&self) -> usize {
        self.len()
    }
}

/// Position of the `k`-th (0-indexed) set bit of `word`.
///
/// The caller guarantees `k < word.count_ones()`.
#[inline]
pub(crate) fn select_in_word(mut word: u64, k: usize) -> usize {
    debug_assert!(k < word.count_ones() as usize);
    for _ in 0..k {
        word &= word - 1;
    }
    word.trailing_zeros() as usize
}

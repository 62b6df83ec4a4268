//! Implicit bit sequence: packed bits, no index at all.
//!
//! An "implicit" structure for a class $C_n$ uses $\log |C_n| + O(1)$ bits.
//! [`BitSequence`] is exactly that for bit strings: $n$ bits packed into
//! $\lceil n / 64 \rceil$ words and nothing else. Rank and select are answered
//! by scanning from position 0, so both are $O(n)$.
//!
//! It is also the only growable sequence in the crate. LOUDS construction
//! appends to a `BitSequence`; an indexed [`BitVector`](crate::bitvec::BitVector)
//! can be built from the finished sequence afterwards.
//!
//! # Historical Context
//!
//! - Munro (1986): "An implicit data structure for the dictionary problem."
//! - Jacobson (1989): Succinct structures (which use $o(OPT)$ extra bits)
//!   evolved from these zero-overhead implicit structures.

use std::fmt;

use crate::error::{Error, Result};
use crate::rank_select::{select_in_word, Bit, RankSelect};

/// An append-only bit sequence with linear-time rank/select.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct BitSequence {
    data: Vec<u64>,
    len: usize,
}

impl BitSequence {
    /// Create an empty sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty sequence with room for `bits` bits.
    pub fn with_capacity(bits: usize) -> Self {
        Self {
            data: Vec::with_capacity(bits.div_ceil(64)),
            len: 0,
        }
    }

    /// Append one bit. Amortized $O(1)$.
    pub fn push(&mut self, bit: Bit) {
        let offset = self.len % 64;
        if offset == 0 {
            self.data.push(0);
        }
        if bit.is_one() {
            let last = self.data.len() - 1;
            self.data[last] |= 1u64 << offset;
        }
        self.len += 1;
    }

    /// Append `count` copies of `bit`.
    pub fn push_run(&mut self, bit: Bit, count: usize) {
        for _ in 0..count {
            self.push(bit);
        }
    }

    /// Return the total number of bits.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Return true if the sequence has length 0.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The packed words, least significant bit first. Bits past `len` are zero.
    pub fn words(&self) -> &[u64] {
        &self.data
    }

    /// Return the bit at index `i`. O(1).
    pub fn get(&self, i: usize) -> Option<Bit> {
        if i >= self.len {
            return None;
        }
        Some(Bit::from((self.data[i / 64] >> (i % 64)) & 1 == 1))
    }

    /// Iterate over the bits in order.
    pub fn iter(&self) -> impl Iterator<Item = Bit> + '_ {
        (0..self.len).map(move |i| Bit::from((self.data[i / 64] >> (i % 64)) & 1 == 1))
    }

    /// Approximate heap memory usage in bytes.
    pub fn heap_bytes(&self) -> usize {
        self.data.capacity() * 8
    }

    /// Word `w` viewed so that occurrences of `bit` are the set bits.
    ///
    /// Padding past `len` is cleared so it never counts as a zero.
    fn occurrences(&self, w: usize, bit: Bit) -> u64 {
        let word = match bit {
            Bit::One => self.data[w],
            Bit::Zero => !self.data[w],
        };
        let valid = (self.len - w * 64).min(64);
        if valid == 64 {
            word
        } else {
            word & ((1u64 << valid) - 1)
        }
    }
}

impl RankSelect for BitSequence {
    fn len(&self) -> usize {
        self.len
    }

    fn get(&self, i: usize) -> Option<Bit> {
        BitSequence::get(self, i)
    }

    /// Linear-time rank: O(i).
    fn rank(&self, i: usize, bit: Bit) -> Result<usize> {
        if i >= self.len {
            return Err(Error::IndexOutOfBounds(i));
        }
        let end = i + 1;
        let full_words = end / 64;
        let mut count = 0;
        for w in 0..full_words {
            count += self.occurrences(w, bit).count_ones() as usize;
        }
        let bit_offset = end % 64;
        if bit_offset > 0 {
            let mask = (1u64 << bit_offset) - 1;
            count += (self.occurrences(full_words, bit) & mask).count_ones() as usize;
        }
        Ok(count)
    }

    /// Linear-time select: O(n).
    fn select(&self, n: usize, bit: Bit) -> Result<Option<usize>> {
        if n == 0 {
            return Err(Error::InvalidSelection(0));
        }
        let mut k = n - 1;
        for w in 0..self.data.len() {
            let word = self.occurrences(w, bit);
            let ones = word.count_ones() as usize;
            if k < ones {
                return Ok(Some(w * 64 + select_in_word(word, k)));
            }
            k -= ones;
        }
        Ok(None)
    }
}

impl Extend<Bit> for BitSequence {
    fn extend<I: IntoIterator<Item = Bit>>(&mut self, iter: I) {
        for bit in iter {
            self.push(bit);
        }
    }
}

impl FromIterator<Bit> for BitSequence {
    fn from_iter<I: IntoIterator<Item = Bit>>(iter: I) -> Self {
        let mut seq = Self::new();
        seq.extend(iter);
        seq
    }
}

impl fmt::Display for BitSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.iter() {
            write!(f, "{bit}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for BitSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitSequence")
            .field("len", &self.len)
            .field("bits", &format_args!("{self}"))
            .finish()
    }
}

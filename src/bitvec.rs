//! Cache-friendly succinct bit vector with rank/select support.
//!
//! Implements the Rank9 indexing scheme with an interleaved (blocked) layout
//! for superior cache locality. This is the constant-time backend for
//! [`SuccinctTree`](crate::louds::SuccinctTree); swap it in with
//! [`SuccinctTree::into_backend`](crate::louds::SuccinctTree::into_backend).
//!
//! # Layout
//!
//! Each 512-bit block is stored as 10 x 64-bit words:
//! - Word 0: Absolute rank (number of 1s before this block)
//! - Word 1: Relative ranks (7 x 9-bit cumulative counts within the block)
//! - Word 2-9: Raw data (512 bits)
//!
//! A sentinel block holding only the total rank follows the last data block,
//! so rank at `len` never needs a special case.
//!
//! Select keeps one block pointer per 512 occurrences of each bit value and
//! binary-searches the absolute ranks between two samples.

use std::fmt;

use crate::error::{Error, Result};
use crate::implicit::BitSequence;
use crate::rank_select::{select_in_word, Bit, RankSelect};

const BLOCK_BITS: usize = 512;
const WORDS_PER_BLOCK: usize = BLOCK_BITS / 64;
const HEADER_WORDS: usize = 2;
const BLOCK_WORDS: usize = HEADER_WORDS + WORDS_PER_BLOCK;
/// Occurrences between two consecutive select samples.
const SELECT_SAMPLE_RATE: usize = 512;

/// A frozen bit vector with $O(1)$ rank and sampled select.
#[derive(Clone)]
pub struct BitVector {
    /// Interleaved data: [abs_rank, rel_ranks, data0, ..., data7, ...]
    storage: Vec<u64>,
    /// Block containing (or preceding) every 512th one-bit.
    select1_samples: Vec<u32>,
    /// Block containing (or preceding) every 512th zero-bit.
    select0_samples: Vec<u32>,
    len: usize,
}

impl fmt::Debug for BitVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitVector")
            .field("len", &self.len)
            .field("ones", &self.rank1(self.len))
            .finish()
    }
}

impl BitVector {
    /// Create a new BitVector from packed words (least significant bit first).
    ///
    /// Bits at or beyond `len` are ignored.
    pub fn new(bits: &[u64], len: usize) -> Self {
        let num_blocks = len.div_ceil(BLOCK_BITS);
        let mut storage = vec![0u64; (num_blocks + 1) * BLOCK_WORDS];

        let mut total = 0u64;
        for block in 0..num_blocks {
            let base = block * BLOCK_WORDS;
            storage[base] = total;

            let mut relative = 0u64;
            let mut in_block = 0u64;
            for j in 0..WORDS_PER_BLOCK {
                let word = masked_word(bits, len, block * WORDS_PER_BLOCK + j);
                storage[base + HEADER_WORDS + j] = word;
                if j > 0 {
                    relative |= in_block << (9 * (j - 1));
                }
                in_block += u64::from(word.count_ones());
            }
            storage[base + 1] = relative;
            total += in_block;
        }
        storage[num_blocks * BLOCK_WORDS] = total;

        let mut bv = Self {
            storage,
            select1_samples: Vec::new(),
            select0_samples: Vec::new(),
            len,
        };
        bv.select1_samples = bv.sample(Bit::One);
        bv.select0_samples = bv.sample(Bit::Zero);
        bv
    }

    /// Return the total number of bits in the vector.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Return true if the bit-vector has length 0.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Approximate heap memory usage in bytes, index included.
    pub fn heap_bytes(&self) -> usize {
        self.storage.capacity() * 8
            + self.select1_samples.capacity() * 4
            + self.select0_samples.capacity() * 4
    }

    /// Return true if the bit at index `i` is set.
    pub fn get(&self, i: usize) -> bool {
        if i >= self.len {
            return false;
        }
        let word = self.storage[self.word_index(i)];
        (word >> (i % 64)) & 1 == 1
    }

    /// Return the number of set bits in the range [0, i).
    pub fn rank1(&self, i: usize) -> usize {
        let i = i.min(self.len);
        let block = i / BLOCK_BITS;
        let sub = (i % BLOCK_BITS) / 64;
        let mask = (1u64 << (i % 64)) - 1;
        let word = self.storage[self.word_index(i)];
        self.block_prefix(block, Bit::One)
            + self.sub_prefix(block, sub, Bit::One)
            + (word & mask).count_ones() as usize
    }

    /// Return the number of unset bits in the range [0, i).
    pub fn rank0(&self, i: usize) -> usize {
        let i = i.min(self.len);
        i - self.rank1(i)
    }

    /// Return the position of the $k$-th set bit (0-indexed).
    pub fn select1(&self, k: usize) -> Option<usize> {
        self.select_nth(k, Bit::One)
    }

    /// Return the position of the $k$-th unset bit (0-indexed).
    pub fn select0(&self, k: usize) -> Option<usize> {
        self.select_nth(k, Bit::Zero)
    }

    fn select_nth(&self, k: usize, bit: Bit) -> Option<usize> {
        let total = match bit {
            Bit::One => self.rank1(self.len),
            Bit::Zero => self.rank0(self.len),
        };
        if k >= total {
            return None;
        }

        let samples = match bit {
            Bit::One => &self.select1_samples,
            Bit::Zero => &self.select0_samples,
        };
        let target = k + 1;
        let sample = k / SELECT_SAMPLE_RATE;
        let mut low = samples[sample] as usize;
        let mut high = samples
            .get(sample + 1)
            .map_or(self.num_blocks_with_sentinel(), |&b| b as usize + 1);

        // First block whose prefix already reaches `target`; the answer is
        // in the block before it.
        while low < high {
            let mid = low + (high - low) / 2;
            if self.block_prefix(mid, bit) < target {
                low = mid + 1;
            } else {
                high = mid;
            }
        }
        let block = low - 1;
        let mut remaining = target - self.block_prefix(block, bit);

        let sub = (1..WORDS_PER_BLOCK)
            .take_while(|&j| self.sub_prefix(block, j, bit) < remaining)
            .last()
            .unwrap_or(0);
        remaining -= self.sub_prefix(block, sub, bit);

        let raw = self.storage[block * BLOCK_WORDS + HEADER_WORDS + sub];
        let word = match bit {
            Bit::One => raw,
            Bit::Zero => !raw,
        };
        Some(block * BLOCK_BITS + sub * 64 + select_in_word(word, remaining - 1))
    }

    /// Occurrences of `bit` before `block`.
    fn block_prefix(&self, block: usize, bit: Bit) -> usize {
        let ones = self.storage[block * BLOCK_WORDS] as usize;
        match bit {
            Bit::One => ones,
            Bit::Zero => block * BLOCK_BITS - ones,
        }
    }

    /// Occurrences of `bit` in the first `sub` words of `block`.
    fn sub_prefix(&self, block: usize, sub: usize, bit: Bit) -> usize {
        if sub == 0 {
            return 0;
        }
        let relative = self.storage[block * BLOCK_WORDS + 1];
        let ones = ((relative >> (9 * (sub - 1))) & 0x1FF) as usize;
        match bit {
            Bit::One => ones,
            Bit::Zero => sub * 64 - ones,
        }
    }

    fn word_index(&self, i: usize) -> usize {
        (i / BLOCK_BITS) * BLOCK_WORDS + HEADER_WORDS + (i % BLOCK_BITS) / 64
    }

    fn num_blocks_with_sentinel(&self) -> usize {
        self.storage.len() / BLOCK_WORDS
    }

    fn sample(&self, bit: Bit) -> Vec<u32> {
        let mut samples = Vec::new();
        let mut threshold = 0;
        for block in 0..self.num_blocks_with_sentinel() {
            while self.block_prefix(block, bit) >= threshold {
                samples.push(block as u32);
                threshold += SELECT_SAMPLE_RATE;
            }
        }
        samples
    }
}

fn masked_word(bits: &[u64], len: usize, index: usize) -> u64 {
    let word = bits.get(index).copied().unwrap_or(0);
    let start = index * 64;
    if start >= len {
        0
    } else if len - start >= 64 {
        word
    } else {
        word & ((1u64 << (len - start)) - 1)
    }
}

impl From<&BitSequence> for BitVector {
    fn from(seq: &BitSequence) -> Self {
        Self::new(seq.words(), seq.len())
    }
}

impl From<BitSequence> for BitVector {
    fn from(seq: BitSequence) -> Self {
        Self::from(&seq)
    }
}

impl RankSelect for BitVector {
    fn len(&self) -> usize {
        self.len
    }

    fn get(&self, i: usize) -> Option<Bit> {
        (i < self.len).then(|| Bit::from(BitVector::get(self, i)))
    }

    fn rank(&self, i: usize, bit: Bit) -> Result<usize> {
        if i >= self.len {
            return Err(Error::IndexOutOfBounds(i));
        }
        Ok(match bit {
            Bit::One => self.rank1(i + 1),
            Bit::Zero => self.rank0(i + 1),
        })
    }

    fn select(&self, n: usize, bit: Bit) -> Result<Option<usize>> {
        if n == 0 {
            return Err(Error::InvalidSelection(0));
        }
        Ok(self.select_nth(n - 1, bit))
    }
}

//! Error types for succinct trees and their bit sequences.

use thiserror::Error;

/// Error variants for bit-sequence and tree operations.
#[derive(Debug, Error)]
pub enum Error {
    /// An index was provided that is out of the structure's bounds.
    #[error("index out of bounds: {0}")]
    IndexOutOfBounds(usize),

    /// A selection query was performed for an occurrence count that is not valid.
    ///
    /// Occurrences are counted from 1, so `select(0, _)` always fails.
    #[error("invalid selection: occurrence {0} is not addressable")]
    InvalidSelection(usize),

    /// The shape sequence disagrees with the tree it was built from.
    ///
    /// This always points at a construction bug or a hand-assembled input,
    /// never at an ordinary missing node.
    #[error("malformed sequence at position {position}: {reason}")]
    MalformedSequence {
        /// Bit position (or dense node index) where the inconsistency surfaced.
        position: usize,
        /// What was expected there.
        reason: &'static str,
    },

    /// A tree with zero nodes was requested or supplied.
    #[error("empty input: a tree needs at least one node")]
    EmptyInput,

    /// A node handle that does not belong to the tree.
    #[error("unknown node handle: {0}")]
    UnknownNode(usize),

    /// An I/O error occurred while writing a report.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for succinct tree operations.
pub type Result<T> = std::result::Result<T, Error>;

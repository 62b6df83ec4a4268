//! # Succinct Trees
//!
//! *A whole tree in two bits per node.*
//!
//! ## Intuition First
//!
//! Picture a family tree drawn on paper, read aloud one generation at a time:
//! "the first person has two children, the next has one, the next has none...".
//! Write each count in tally marks followed by a full stop and you have the
//! tree's entire shape as a row of strokes and dots. Nobody needs to write down
//! who points to whom; counting strokes and dots is enough to find any parent
//! or child again.
//!
//! ## The Problem
//!
//! A pointer-linked tree pays at least one machine word per edge in each
//! direction ($O(n \log n)$ bits). There are only about $4^n$ ordinal trees
//! with $n$ nodes, so $2n$ bits are enough to tell them apart.
//!
//! ## Historical Context
//!
//! ```text
//! 1989  Jacobson    LOUDS and the rank/select paradigm (PhD thesis)
//! 1996  Munro-Raman Constant-time rank and select in o(n) extra space
//! 2005  Delpratt    Engineering LOUDS for practical navigation
//! 2008  Vigna       Broadword rank9/select9
//! ```
//!
//! ## Mathematical Formulation
//!
//! For a tree with $N$ nodes in breadth-first order, the LOUDS shape is
//! `10` followed by $1^{d_i}0$ for every node $i$, where $d_i$ is its degree.
//! Its length is $2 + \sum_i (d_i + 1) = 2 + N + (N - 1) = 2N + 1$.
//!
//! With `rank(i, b)` counting `b` in $[0, i]$ and `select(n, b)` locating the
//! $n$-th `b`:
//! - first child of $i$: `select(i + 1, 0) - i`
//! - parent of $i$: `rank(select(i + 1, 1) - 1, 0) - 1`
//!
//! ## Complexity Analysis
//!
//! - **Space**: $2N + 1$ bits for the shape, plus the value tables.
//! - **Time**: whatever the rank/select backend costs. $O(n)$ with
//!   [`BitSequence`], $O(1)$ rank and $O(\log n)$ select with [`BitVector`].
//!
//! ## What Could Go Wrong
//!
//! 1. **Off-by-one**: the formulas mix 0-indexed positions with 1-indexed
//!    occurrence counts. The index-level methods on [`SuccinctTree`] are
//!    exposed and tested on their own for that reason.
//! 2. **Duplicate values**: nodes are addressed by value. [`ReferenceTree`]
//!    resolves duplicates to the first pre-order match, [`SuccinctTree`] to
//!    the last breadth-first one; the two may disagree.
//!
//! ## Implementation Notes
//!
//! This crate provides:
//! - **[`BitSequence`]**: growable bits with linear-scan rank/select.
//! - **[`BitVector`]**: Rank9-indexed bits built from a finished sequence.
//! - **[`SuccinctTree`]**: LOUDS encoding, generic over [`RankSelect`].
//! - **[`ReferenceTree`]**: arena tree with parent handles, the baseline.
//! - **[`Navigate`]**: the query surface both trees share.
//!
//! ```
//! use louds::{ReferenceTree, SuccinctTree};
//!
//! let mut tree = ReferenceTree::new("R");
//! let root = tree.root();
//! let a = tree.add_child(root, "A").unwrap();
//! tree.add_child(root, "B").unwrap();
//! tree.add_child(a, "C").unwrap();
//!
//! let louds = SuccinctTree::from_tree(&tree).unwrap();
//! assert_eq!(louds.shape().to_string(), "101101000");
//! assert_eq!(louds.last_child("R"), Some("B"));
//! assert_eq!(louds.parent("C"), Some("A"));
//! ```
//!
//! ## References
//!
//! - Jacobson, G. (1989). "Space-efficient Static Trees and Graphs."
//! - Delpratt, O., Rahman, N., & Raman, R. (2006). "Engineering the LOUDS Succinct Tree Representation."
//! - Vigna, S. (2008). "Broadword Implementation of Rank/Select Queries."

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bitvec;
pub mod error;
pub mod implicit;
pub mod louds;
pub mod navigate;
pub mod rank_select;
pub mod tree;

pub use bitvec::BitVector;
pub use error::{Error, Result};
pub use implicit::BitSequence;
pub use louds::{Label, SuccinctTree};
pub use navigate::{duplicated_values, mismatches, summarize, write_report, Mismatch, Navigate, NodeSummary};
pub use rank_select::{Bit, RankSelect};
pub use tree::{NodeId, ReferenceTree};

//! LOUDS: Level-Order Unary Degree Sequence trees.
//!
//! A tree with $N$ nodes is written as one bit sequence of $2N + 1$ bits.
//! Nodes are visited breadth-first; each contributes its child count in unary
//! (one `1` per child) followed by a terminating `0`. A synthetic super-root
//! block `10` comes first, so the real root is "child number one" and the
//! same formulas work for every node.
//!
//! ```text
//!        R             shape: 10 110 10 0 0
//!       / \                   ^^ ^^^ ^^ ^ ^
//!      A   B                  |  R   A  B C
//!      |                      super-root
//!      C
//! ```
//!
//! Nodes are addressed by their *dense index*, the 0-based BFS position. The
//! $k$-th `1` (counting from 1) is the edge into node $k - 1$, and the
//! $(i + 1)$-th `0` closes the block of node $i$. Everything below follows
//! from those two facts:
//!
//! - first child of $i$ = `select0(i + 1) - i`
//! - last child of $i$ = `rank1(select0(i + 2) - 2)`, if the bit just before the
//!   closing zero is a `1`
//! - parent of $i$ = `rank0(select1(i + 1) - 1) - 1`
//!
//! No parent or child pointers are stored. Values and per-node child counts
//! are kept next to the shape in plain maps; they are reported separately by
//! [`SuccinctTree::aux_index_bits`].

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::implicit::BitSequence;
use crate::rank_select::{Bit, RankSelect};
use crate::tree::ReferenceTree;

/// Bytes charged per label entry for its integer key.
const LABEL_KEY_BYTES: usize = 4;

/// Value and child count stored for one dense index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    /// The node's value.
    pub value: String,
    /// Number of children; equals the node's `1` bits in the shape.
    pub children: usize,
}

/// A succinct n-ary tree navigated purely through rank/select.
///
/// `B` is the rank/select backend. The default [`BitSequence`] scans linearly;
/// [`BitVector`](crate::bitvec::BitVector) answers rank in constant time.
#[derive(Clone)]
pub struct SuccinctTree<B = BitSequence> {
    shape: B,
    labels: Vec<Label>,
    index: HashMap<String, usize>,
}

impl SuccinctTree<BitSequence> {
    /// Encode `tree` with a single breadth-first pass.
    pub fn from_tree(tree: &ReferenceTree) -> Result<Self> {
        Self::from_level_order(
            tree.level_order()
                .map(|id| (tree.value(id), tree.children(id).len())),
        )
    }

    /// Encode a tree given as `(value, child count)` pairs in level order.
    ///
    /// The stream must describe exactly one connected tree: every node after
    /// the root has to be announced by an earlier node's child count, and the
    /// counts must add up to `N - 1`. Anything else is rejected without
    /// returning a partial tree.
    pub fn from_level_order<I, S>(nodes: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, usize)>,
        S: Into<String>,
    {
        let nodes = nodes.into_iter();
        let mut labels = Vec::with_capacity(nodes.size_hint().0);
        let mut index = HashMap::with_capacity(nodes.size_hint().0);
        let mut announced = 1usize;
        let mut aliased = 0usize;

        for (position, (value, children)) in nodes.enumerate() {
            if position >= announced {
                return Err(Error::MalformedSequence {
                    position,
                    reason: "node is not a child of any earlier node",
                });
            }
            announced = announced
                .checked_add(children)
                .ok_or(Error::MalformedSequence {
                    position,
                    reason: "child count overflows the node counter",
                })?;

            let value = value.into();
            if index.insert(value.clone(), position).is_some() {
                aliased += 1;
            }
            labels.push(Label { value, children });
        }

        if labels.is_empty() {
            return Err(Error::EmptyInput);
        }
        if announced != labels.len() {
            return Err(Error::MalformedSequence {
                position: labels.len(),
                reason: "child counts announce more nodes than were supplied",
            });
        }

        // Counts are validated, so the shape is exactly 2N + 1 bits.
        let mut shape = BitSequence::with_capacity(2 * labels.len() + 1);
        // Super-root: one child (the real root), then its terminator.
        shape.push(Bit::One);
        shape.push(Bit::Zero);
        for label in &labels {
            shape.push_run(Bit::One, label.children);
            shape.push(Bit::Zero);
        }

        debug!(
            nodes = labels.len(),
            shape_bits = shape.len(),
            aliased,
            "built LOUDS tree"
        );
        Ok(Self {
            shape,
            labels,
            index,
        })
    }

    /// Encode `tree` and index the shape with backend `C`.
    pub fn from_tree_with<C>(tree: &ReferenceTree) -> Result<SuccinctTree<C>>
    where
        C: RankSelect + From<BitSequence>,
    {
        Ok(Self::from_tree(tree)?.into_backend())
    }
}

impl<B: RankSelect> SuccinctTree<B> {
    /// Rebuild the shape with another rank/select backend. Labels are kept.
    pub fn into_backend<C>(self) -> SuccinctTree<C>
    where
        C: RankSelect + From<B>,
    {
        SuccinctTree {
            shape: C::from(self.shape),
            labels: self.labels,
            index: self.index,
        }
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Always false once built; construction rejects empty trees.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// The shape bit sequence.
    pub fn shape(&self) -> &B {
        &self.shape
    }

    /// Dense index of `value`. With duplicate values the BFS-last one wins.
    pub fn index_of(&self, value: &str) -> Option<usize> {
        self.index.get(value).copied()
    }

    /// Value stored at a dense index.
    pub fn value_at(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(|label| label.value.as_str())
    }

    /// Label stored at a dense index.
    pub fn label(&self, index: usize) -> Option<&Label> {
        self.labels.get(index)
    }

    /// Values in dense-index order.
    pub fn values(&self) -> impl Iterator<Item = &str> + '_ {
        self.labels.iter().map(|label| label.value.as_str())
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.labels.len() {
            return Err(Error::IndexOutOfBounds(index));
        }
        Ok(())
    }

    fn select(&self, n: usize, bit: Bit) -> Result<usize> {
        self.shape
            .select(n, bit)?
            .ok_or(Error::MalformedSequence {
                position: self.shape.len(),
                reason: "shape has fewer occurrences than nodes",
            })
    }

    /// Dense index the first child of `parent` has, or would have.
    ///
    /// For a leaf this points at the next node's first child (possibly one
    /// past the last node); check the child count before resolving it.
    pub fn first_child_index(&self, parent: usize) -> Result<usize> {
        self.check_index(parent)?;
        Ok(self.select(parent + 1, Bit::Zero)? - parent)
    }

    /// Dense index of the last child of `parent`, `None` for a leaf.
    pub fn last_child_index(&self, parent: usize) -> Result<Option<usize>> {
        self.check_index(parent)?;
        let candidate = self.select(parent + 2, Bit::Zero)? - 1;
        match self.shape.get(candidate) {
            Some(Bit::Zero) => Ok(None),
            Some(Bit::One) => {
                let before = candidate.checked_sub(1).ok_or(Error::MalformedSequence {
                    position: candidate,
                    reason: "child edge overlaps the super-root",
                })?;
                Ok(Some(self.shape.rank(before, Bit::One)?))
            }
            None => Err(Error::MalformedSequence {
                position: candidate,
                reason: "block terminator beyond the shape",
            }),
        }
    }

    /// Number of children of `parent`, derived from the shape alone.
    pub fn children_count_index(&self, parent: usize) -> Result<usize> {
        let count = match self.last_child_index(parent)? {
            Some(last) => (last + 1).saturating_sub(self.first_child_index(parent)?),
            None => 0,
        };
        if Some(count) != self.label(parent).map(|label| label.children) {
            return Err(Error::MalformedSequence {
                position: parent,
                reason: "shape and label disagree on child count",
            });
        }
        Ok(count)
    }

    /// Dense index of the parent of `child`, `None` for the root.
    pub fn parent_index(&self, child: usize) -> Result<Option<usize>> {
        self.check_index(child)?;
        let edge = self.select(child + 1, Bit::One)?;
        // Position 0 is the super-root's edge into the root.
        let Some(before) = edge.checked_sub(1) else {
            return Ok(None);
        };
        let closed = self.shape.rank(before, Bit::Zero)?;
        Ok(closed.checked_sub(1))
    }

    /// Value of the first child of the node holding `value`.
    pub fn first_child(&self, value: &str) -> Option<&str> {
        let parent = self.index_of(value)?;
        if self.labels[parent].children < 1 {
            return None;
        }
        let child = self.recover(self.first_child_index(parent))?;
        self.value_at(child)
    }

    /// Value of the last child of the node holding `value`.
    pub fn last_child(&self, value: &str) -> Option<&str> {
        let parent = self.index_of(value)?;
        let child = self.recover(self.last_child_index(parent))??;
        self.value_at(child)
    }

    /// Number of children of the node holding `value`; 0 when absent.
    pub fn children_count(&self, value: &str) -> usize {
        self.index_of(value)
            .and_then(|parent| self.recover(self.children_count_index(parent)))
            .unwrap_or(0)
    }

    /// Value of the parent of the node holding `value`.
    pub fn parent(&self, value: &str) -> Option<&str> {
        let child = self.index_of(value)?;
        let parent = self.recover(self.parent_index(child))??;
        self.value_at(parent)
    }

    /// Report a structural failure and fold it into an absent result.
    fn recover<T>(&self, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(error = %err, shape_bits = self.shape.len(), "LOUDS navigation failed");
                None
            }
        }
    }

    /// Footprint of the shape sequence in bits.
    pub fn size_in_bits(&self) -> usize {
        self.shape.size_in_bits()
    }

    /// Footprint of the value/child-count side tables in bits.
    ///
    /// Each entry is charged a 4-byte integer key plus its value bytes.
    pub fn aux_index_bits(&self) -> usize {
        self.labels
            .iter()
            .map(|label| (LABEL_KEY_BYTES + label.value.len()) * 8)
            .sum()
    }

    /// Shape plus side tables.
    pub fn total_bits(&self) -> usize {
        self.size_in_bits() + self.aux_index_bits()
    }
}

impl<B: RankSelect> fmt::Debug for SuccinctTree<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuccinctTree")
            .field("nodes", &self.labels.len())
            .field("shape_bits", &self.shape.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitvec::BitVector;

    /// R -> (A -> C), B
    fn sample() -> ReferenceTree {
        let mut tree = ReferenceTree::new("R");
        let root = tree.root();
        let a = tree.add_child(root, "A").unwrap();
        tree.add_child(root, "B").unwrap();
        tree.add_child(a, "C").unwrap();
        tree
    }

    #[test]
    fn test_shape_of_small_tree() {
        let louds = SuccinctTree::from_tree(&sample()).unwrap();
        assert_eq!(louds.shape().to_string(), "101101000");
        assert_eq!(louds.size_in_bits(), 2 * 4 + 1);
        assert_eq!(louds.values().collect::<Vec<_>>(), ["R", "A", "B", "C"]);
        assert_eq!(
            louds.label(1),
            Some(&Label {
                value: "A".to_string(),
                children: 1
            })
        );
        assert_eq!(louds.label(4), None);
    }

    #[test]
    fn test_index_formulas() {
        let louds = SuccinctTree::from_tree(&sample()).unwrap();
        assert_eq!(louds.first_child_index(0).unwrap(), 1);
        assert_eq!(louds.last_child_index(0).unwrap(), Some(2));
        assert_eq!(louds.first_child_index(1).unwrap(), 3);
        assert_eq!(louds.last_child_index(1).unwrap(), Some(3));
        assert_eq!(louds.last_child_index(2).unwrap(), None);
        assert_eq!(louds.last_child_index(3).unwrap(), None);

        assert_eq!(louds.children_count_index(0).unwrap(), 2);
        assert_eq!(louds.children_count_index(1).unwrap(), 1);
        assert_eq!(louds.children_count_index(2).unwrap(), 0);

        assert_eq!(louds.parent_index(0).unwrap(), None);
        assert_eq!(louds.parent_index(1).unwrap(), Some(0));
        assert_eq!(louds.parent_index(2).unwrap(), Some(0));
        assert_eq!(louds.parent_index(3).unwrap(), Some(1));

        assert!(matches!(
            louds.parent_index(4),
            Err(Error::IndexOutOfBounds(4))
        ));
        assert!(louds.first_child_index(4).is_err());
    }

    #[test]
    fn test_navigation_by_value() {
        let louds = SuccinctTree::from_tree(&sample()).unwrap();
        assert_eq!(louds.first_child("R"), Some("A"));
        assert_eq!(louds.last_child("R"), Some("B"));
        assert_eq!(louds.children_count("R"), 2);
        assert_eq!(louds.parent("C"), Some("A"));
        assert_eq!(louds.parent("R"), None);
        assert_eq!(louds.first_child("B"), None);
        assert_eq!(louds.last_child("B"), None);
        assert_eq!(louds.children_count("C"), 0);
    }

    #[test]
    fn test_unknown_value_is_absent() {
        let louds = SuccinctTree::from_tree(&sample()).unwrap();
        assert_eq!(louds.first_child("nope"), None);
        assert_eq!(louds.last_child("nope"), None);
        assert_eq!(louds.children_count("nope"), 0);
        assert_eq!(louds.parent("nope"), None);
        assert_eq!(louds.index_of("nope"), None);
    }

    #[test]
    fn test_single_node() {
        let louds = SuccinctTree::from_tree(&ReferenceTree::new("only")).unwrap();
        assert_eq!(louds.shape().to_string(), "100");
        assert_eq!(louds.parent("only"), None);
        assert_eq!(louds.first_child("only"), None);
        assert_eq!(louds.last_child("only"), None);
        assert_eq!(louds.children_count("only"), 0);
    }

    #[test]
    fn test_wide_and_deep() {
        let mut tree = ReferenceTree::new("root");
        let root = tree.root();
        for i in 0..100 {
            tree.add_child(root, format!("w{i}")).unwrap();
        }
        let mut tip = root;
        for i in 0..100 {
            tip = tree.add_child(tip, format!("d{i}")).unwrap();
        }
        let louds = SuccinctTree::from_tree(&tree).unwrap();
        assert_eq!(louds.children_count("root"), 101);
        assert_eq!(louds.first_child("root"), Some("w0"));
        assert_eq!(louds.last_child("root"), Some("d0"));
        assert_eq!(louds.parent("d99"), Some("d98"));
        assert_eq!(louds.parent("w50"), Some("root"));
        assert_eq!(louds.first_child("d98"), Some("d99"));
    }

    #[test]
    fn test_rank9_backend_agrees() {
        let tree = sample();
        let naive = SuccinctTree::from_tree(&tree).unwrap();
        let indexed: SuccinctTree<BitVector> = SuccinctTree::from_tree_with(&tree).unwrap();
        for value in ["R", "A", "B", "C"] {
            assert_eq!(indexed.first_child(value), naive.first_child(value));
            assert_eq!(indexed.last_child(value), naive.last_child(value));
            assert_eq!(indexed.children_count(value), naive.children_count(value));
            assert_eq!(indexed.parent(value), naive.parent(value));
        }
        assert_eq!(indexed.size_in_bits(), naive.size_in_bits());
    }

    #[test]
    fn test_aux_index_bits() {
        let louds = SuccinctTree::from_tree(&sample()).unwrap();
        assert_eq!(louds.aux_index_bits(), 4 * (4 + 1) * 8);
        assert_eq!(louds.total_bits(), 9 + 160);
    }

    #[test]
    fn test_duplicate_values_alias_to_last() {
        let mut tree = ReferenceTree::new("R");
        let root = tree.root();
        tree.add_child(root, "dup").unwrap();
        let x = tree.add_child(root, "X").unwrap();
        tree.add_child(x, "dup").unwrap();
        let louds = SuccinctTree::from_tree(&tree).unwrap();
        assert_eq!(louds.index_of("dup"), Some(3));
        assert_eq!(louds.parent("dup"), Some("X"));
        assert_eq!(louds.len(), 4);
    }

    #[test]
    fn test_from_level_order_rejects_bad_input() {
        let empty: Vec<(&str, usize)> = Vec::new();
        assert!(matches!(
            SuccinctTree::from_level_order(empty),
            Err(Error::EmptyInput)
        ));

        // Root claims two children, only one follows.
        assert!(matches!(
            SuccinctTree::from_level_order([("R", 2), ("A", 0)]),
            Err(Error::MalformedSequence { .. })
        ));

        // Second root-level node with nobody announcing it.
        assert!(matches!(
            SuccinctTree::from_level_order([("R", 0), ("A", 0)]),
            Err(Error::MalformedSequence { position: 1, .. })
        ));

        // Counts are checked before any shape bits are written.
        assert!(matches!(
            SuccinctTree::from_level_order([("R", 1usize << 40)]),
            Err(Error::MalformedSequence { position: 1, .. })
        ));
        assert!(matches!(
            SuccinctTree::from_level_order([("R", usize::MAX)]),
            Err(Error::MalformedSequence { position: 0, .. })
        ));

        let ok = SuccinctTree::from_level_order([("R", 2), ("A", 1), ("B", 0), ("C", 0)]).unwrap();
        assert_eq!(ok.shape().to_string(), "101101000");
    }

    /// Shape backend that flips one bit of an otherwise valid sequence.
    struct Flipped<const AT: usize>(BitSequence);

    impl<const AT: usize> From<BitSequence> for Flipped<AT> {
        fn from(seq: BitSequence) -> Self {
            Self(
                seq.iter()
                    .enumerate()
                    .map(|(i, bit)| if i == AT { bit.flip() } else { bit })
                    .collect(),
            )
        }
    }

    impl<const AT: usize> RankSelect for Flipped<AT> {
        fn len(&self) -> usize {
            self.0.len()
        }

        fn get(&self, i: usize) -> Option<Bit> {
            self.0.get(i)
        }

        fn rank(&self, i: usize, bit: Bit) -> Result<usize> {
            self.0.rank(i, bit)
        }

        fn select(&self, n: usize, bit: Bit) -> Result<Option<usize>> {
            self.0.select(n, bit)
        }
    }

    #[test]
    fn test_corrupted_shape_is_malformed_not_missing() {
        // 101101000 becomes 111101000: the super-root terminator is gone.
        let louds = SuccinctTree::from_tree(&sample())
            .unwrap()
            .into_backend::<Flipped<1>>();

        assert!(matches!(
            louds.children_count_index(0),
            Err(Error::MalformedSequence { position: 0, .. })
        ));

        // The value API folds the failure into an absent answer.
        assert_eq!(louds.children_count("R"), 0);
        assert_eq!(louds.first_child("R"), None);
        assert_eq!(louds.parent("A"), None);
        assert_eq!(louds.children_count("missing"), 0);
    }

    #[test]
    fn test_truncated_shape_is_malformed() {
        let louds = SuccinctTree::from_level_order([("R", 1), ("A", 0)]).unwrap();
        // Keep only the super-root edge: no zero closes the root's block.
        let shape: BitSequence = louds.shape().iter().take(1).collect();
        let broken = SuccinctTree {
            shape,
            labels: louds.labels.clone(),
            index: louds.index.clone(),
        };
        assert!(matches!(
            broken.first_child_index(0),
            Err(Error::MalformedSequence { .. })
        ));
        assert!(matches!(
            broken.last_child_index(0),
            Err(Error::MalformedSequence { .. })
        ));
        assert_eq!(broken.first_child("R"), None);
        assert_eq!(broken.last_child("R"), None);
        assert_eq!(broken.parent("A"), None);
        assert_eq!(louds.first_child("R"), Some("A"));
    }
}

//! Pointer-linked n-ary tree used as the baseline and as LOUDS input.
//!
//! Nodes live in an arena owned by [`ReferenceTree`]; children are held as
//! ordered [`NodeId`] lists and the parent link is a plain handle, so the
//! upward reference never owns anything.
//!
//! Every value-based query starts with a depth-first search, which makes each
//! call $O(n)$. That is deliberate: it is the cost model the succinct
//! representation is compared against.

use std::collections::VecDeque;

use rand::Rng;
use tracing::debug;

use crate::error::{Error, Result};

/// Letters node labels are drawn from.
pub const ALPHABET: &[u8] = b"AaBbCcDdEeFfGgHhIiJjKkLlMmNnOoPpQqRrSsTtUuVvWwXxYyZz";
/// Shortest generated label.
pub const MIN_LABEL_LEN: usize = 7;
/// Longest generated label.
pub const MAX_LABEL_LEN: usize = 13;
/// Width of one modelled pointer, in bytes.
const POINTER_BYTES: usize = 8;

/// Handle to a node inside a [`ReferenceTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in the arena (insertion order, not BFS order).
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
struct Node {
    value: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A rooted n-ary tree with explicit parent and child links.
#[derive(Debug, Clone)]
pub struct ReferenceTree {
    nodes: Vec<Node>,
}

impl ReferenceTree {
    /// Create a tree holding only a root.
    pub fn new(root_value: impl Into<String>) -> Self {
        Self {
            nodes: vec![Node {
                value: root_value.into(),
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// Append a child after the existing children of `parent`.
    pub fn add_child(&mut self, parent: NodeId, value: impl Into<String>) -> Result<NodeId> {
        if parent.index() >= self.nodes.len() {
            return Err(Error::UnknownNode(parent.index()));
        }
        Ok(self.push_child(parent, value.into()))
    }

    fn push_child(&mut self, parent: NodeId, value: String) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            value,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// The root handle.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes. Always at least 1.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree owns at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Value of `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this tree.
    pub fn value(&self, id: NodeId) -> &str {
        &self.nodes[id.0].value
    }

    /// Ordered children of `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this tree.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Parent of `id`, `None` for the root.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this tree.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Nodes in depth-first pre-order.
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder {
            tree: self,
            stack: vec![self.root()],
        }
    }

    /// Nodes in breadth-first (level) order.
    pub fn level_order(&self) -> LevelOrder<'_> {
        LevelOrder {
            tree: self,
            queue: VecDeque::from([self.root()]),
        }
    }

    /// All values in depth-first pre-order.
    pub fn values(&self) -> impl Iterator<Item = &str> + '_ {
        self.preorder().map(move |id| self.value(id))
    }

    /// Depth-first search for `value`; the first pre-order match wins.
    pub fn find(&self, value: &str) -> Option<NodeId> {
        self.preorder().find(|&id| self.value(id) == value)
    }

    /// Value of the first child of the node holding `value`.
    pub fn first_child(&self, value: &str) -> Option<&str> {
        let id = self.find(value)?;
        let child = *self.children(id).first()?;
        Some(self.value(child))
    }

    /// Value of the last child of the node holding `value`.
    pub fn last_child(&self, value: &str) -> Option<&str> {
        let id = self.find(value)?;
        let child = *self.children(id).last()?;
        Some(self.value(child))
    }

    /// Number of children of the node holding `value`; 0 when absent.
    pub fn children_count(&self, value: &str) -> usize {
        self.find(value).map_or(0, |id| self.children(id).len())
    }

    /// Value of the parent of the node holding `value`.
    pub fn parent(&self, value: &str) -> Option<&str> {
        let id = self.find(value)?;
        let parent = self.parent_of(id)?;
        Some(self.value(parent))
    }

    /// Modelled pointer-based footprint in bits.
    ///
    /// Each node costs its value bytes, one parent pointer and one pointer per
    /// child.
    pub fn size_in_bits(&self) -> usize {
        self.nodes
            .iter()
            .map(|node| (node.value.len() + POINTER_BYTES + node.children.len() * POINTER_BYTES) * 8)
            .sum()
    }

    /// Build a random tree with exactly `target` nodes.
    ///
    /// New nodes are attached by random descent: each attachment flips a coin
    /// to decide whether to continue into a random child of the node it just
    /// grew, and every descent restarts from a random child of the root.
    /// Labels are random letters of length 7 to 13 and are not guaranteed to
    /// be unique.
    pub fn generate<R: Rng + ?Sized>(target: usize, rng: &mut R) -> Result<Self> {
        if target == 0 {
            return Err(Error::EmptyInput);
        }
        let mut tree = Self::new(random_label(rng));
        if target == 1 {
            return Ok(tree);
        }

        let root = tree.root();
        tree.push_child(root, random_label(rng));
        while tree.len() < target {
            let mut node = tree.random_child(root, rng);
            loop {
                tree.push_child(node, random_label(rng));
                if tree.len() >= target || !rng.gen_bool(0.5) {
                    break;
                }
                node = tree.random_child(node, rng);
            }
        }

        debug!(
            nodes = tree.len(),
            root_children = tree.children(root).len(),
            "generated reference tree"
        );
        Ok(tree)
    }

    fn random_child<R: Rng + ?Sized>(&self, id: NodeId, rng: &mut R) -> NodeId {
        let children = self.children(id);
        children[rng.gen_range(0..children.len())]
    }
}

/// Random label over [`ALPHABET`] with length in `7..=13`.
pub fn random_label<R: Rng + ?Sized>(rng: &mut R) -> String {
    let len = rng.gen_range(MIN_LABEL_LEN..=MAX_LABEL_LEN);
    (0..len)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Depth-first pre-order iterator over node handles.
pub struct Preorder<'a> {
    tree: &'a ReferenceTree,
    stack: Vec<NodeId>,
}

impl Iterator for Preorder<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}

/// Breadth-first iterator over node handles; children keep their order.
pub struct LevelOrder<'a> {
    tree: &'a ReferenceTree,
    queue: VecDeque<NodeId>,
}

impl Iterator for LevelOrder<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.queue.pop_front()?;
        self.queue.extend(self.tree.children(id).iter().copied());
        Some(id)
    }
}

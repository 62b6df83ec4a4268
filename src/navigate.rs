//! Value-based navigation shared by both tree representations.
//!
//! [`Navigate`] is the narrow surface benchmarks, printers and comparison
//! harnesses need. Both [`ReferenceTree`] and [`SuccinctTree`] implement it,
//! so any consumer can be pointed at either one.

use std::collections::{HashMap, HashSet};
use std::io::Write;

use crate::error::Result;
use crate::louds::SuccinctTree;
use crate::rank_select::RankSelect;
use crate::tree::ReferenceTree;

/// Parent/child queries addressed by node value.
///
/// Every query answers "absent" (`None` or `0`) for unknown values, roots
/// and leaves alike.
pub trait Navigate {
    /// Value of the first child.
    fn first_child(&self, value: &str) -> Option<&str>;
    /// Value of the last child.
    fn last_child(&self, value: &str) -> Option<&str>;
    /// Number of children.
    fn children_count(&self, value: &str) -> usize;
    /// Value of the parent.
    fn parent(&self, value: &str) -> Option<&str>;
}

impl Navigate for ReferenceTree {
    fn first_child(&self, value: &str) -> Option<&str> {
        ReferenceTree::first_child(self, value)
    }

    fn last_child(&self, value: &str) -> Option<&str> {
        ReferenceTree::last_child(self, value)
    }

    fn children_count(&self, value: &str) -> usize {
        ReferenceTree::children_count(self, value)
    }

    fn parent(&self, value: &str) -> Option<&str> {
        ReferenceTree::parent(self, value)
    }
}

impl<B: RankSelect> Navigate for SuccinctTree<B> {
    fn first_child(&self, value: &str) -> Option<&str> {
        SuccinctTree::first_child(self, value)
    }

    fn last_child(&self, value: &str) -> Option<&str> {
        SuccinctTree::last_child(self, value)
    }

    fn children_count(&self, value: &str) -> usize {
        SuccinctTree::children_count(self, value)
    }

    fn parent(&self, value: &str) -> Option<&str> {
        SuccinctTree::parent(self, value)
    }
}

/// Everything [`Navigate`] knows about one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSummary<'a> {
    /// The queried value.
    pub value: &'a str,
    /// Parent value, if any.
    pub parent: Option<&'a str>,
    /// First child value, if any.
    pub first_child: Option<&'a str>,
    /// Last child value, if any.
    pub last_child: Option<&'a str>,
    /// Child count.
    pub children_count: usize,
}

/// Run all four queries for `value`.
pub fn summarize<'a, N>(nav: &'a N, value: &'a str) -> NodeSummary<'a>
where
    N: Navigate + ?Sized,
{
    NodeSummary {
        value,
        parent: nav.parent(value),
        first_child: nav.first_child(value),
        last_child: nav.last_child(value),
        children_count: nav.children_count(value),
    }
}

/// A value on which two navigators disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch<'a> {
    /// What the left navigator answered.
    pub left: NodeSummary<'a>,
    /// What the right navigator answered.
    pub right: NodeSummary<'a>,
}

/// Every value in `values` for which `left` and `right` give different answers.
pub fn mismatches<'a, L, R, I>(left: &'a L, right: &'a R, values: I) -> Vec<Mismatch<'a>>
where
    L: Navigate + ?Sized,
    R: Navigate + ?Sized,
    I: IntoIterator<Item = &'a str>,
{
    values
        .into_iter()
        .filter_map(|value| {
            let left = summarize(left, value);
            let right = summarize(right, value);
            (left != right).then_some(Mismatch { left, right })
        })
        .collect()
}

/// Values that occur more than once in `values`.
///
/// Value-keyed queries on such a value may land on different nodes in the two
/// representations, so comparisons leave them out.
pub fn duplicated_values<'a, I>(values: I) -> HashSet<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen: HashMap<&str, usize> = HashMap::new();
    for value in values {
        *seen.entry(value).or_default() += 1;
    }
    seen.into_iter()
        .filter_map(|(value, count)| (count > 1).then_some(value))
        .collect()
}

/// Print one block per value: parent, first child, last child, child count.
///
/// Absent answers print as `""`.
pub fn write_report<'a, W, N, I>(out: &mut W, nav: &'a N, values: I) -> Result<()>
where
    W: Write + ?Sized,
    N: Navigate + ?Sized,
    I: IntoIterator<Item = &'a str>,
{
    writeln!(out)?;
    for (i, value) in values.into_iter().enumerate() {
        let node = summarize(nav, value);
        writeln!(out, "{i}) {:?}", node.value)?;
        writeln!(out, "    |")?;
        writeln!(out, "    -- parent: {:?}", node.parent.unwrap_or_default())?;
        writeln!(
            out,
            "       first child: {:?}",
            node.first_child.unwrap_or_default()
        )?;
        writeln!(
            out,
            "       last child: {:?}",
            node.last_child.unwrap_or_default()
        )?;
        writeln!(out, "       children count: {}", node.children_count)?;
        writeln!(out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ReferenceTree {
        let mut tree = ReferenceTree::new("R");
        let root = tree.root();
        let a = tree.add_child(root, "A").unwrap();
        tree.add_child(root, "B").unwrap();
        tree.add_child(a, "C").unwrap();
        tree
    }

    #[test]
    fn test_summaries_agree() {
        let tree = sample();
        let louds = SuccinctTree::from_tree(&tree).unwrap();
        assert!(mismatches(&tree, &louds, tree.values()).is_empty());

        let root = summarize(&louds, "R");
        assert_eq!(root.parent, None);
        assert_eq!(root.first_child, Some("A"));
        assert_eq!(root.last_child, Some("B"));
        assert_eq!(root.children_count, 2);
    }

    #[test]
    fn test_mismatch_is_reported() {
        let tree = sample();
        let mut other = ReferenceTree::new("R");
        let root = other.root();
        other.add_child(root, "B").unwrap();
        other.add_child(root, "A").unwrap();

        let found = mismatches(&tree, &other, ["R", "A", "B"]);
        let values: Vec<&str> = found.iter().map(|m| m.left.value).collect();
        assert_eq!(values, ["R", "A"]);
        assert_eq!(found[0].right.first_child, Some("B"));
    }

    #[test]
    fn test_duplicates_are_set_aside() {
        // R -> (dup -> Y), dup: the two trees resolve "dup" to different nodes.
        let mut tree = ReferenceTree::new("R");
        let root = tree.root();
        let first = tree.add_child(root, "dup").unwrap();
        tree.add_child(root, "dup").unwrap();
        tree.add_child(first, "Y").unwrap();
        let louds = SuccinctTree::from_tree(&tree).unwrap();

        let dups = duplicated_values(tree.values());
        assert_eq!(dups, HashSet::from(["dup"]));
        assert!(!mismatches(&tree, &louds, tree.values()).is_empty());

        let unique = tree.values().filter(|value| !dups.contains(value));
        assert!(mismatches(&tree, &louds, unique).is_empty());
        assert!(duplicated_values(sample().values()).is_empty());
    }

    #[test]
    fn test_dyn_navigators() {
        let tree = sample();
        let louds = SuccinctTree::from_tree(&tree).unwrap();
        let navs: [&dyn Navigate; 2] = [&tree, &louds];
        for nav in navs {
            assert_eq!(nav.parent("C"), Some("A"));
        }
    }

    #[test]
    fn test_report_layout() {
        let tree = sample();
        let louds = SuccinctTree::from_tree(&tree).unwrap();
        let mut out = Vec::new();
        write_report(&mut out, &louds, louds.values()).unwrap();
        let text = String::from_utf8(out).unwrap();
        let expected = "\n0) \"R\"\n    |\n    -- parent: \"\"\n       first child: \"A\"\n       last child: \"B\"\n       children count: 2\n\n";
        assert!(text.starts_with(expected), "{text}");
        assert!(text.contains("3) \"C\"\n    |\n    -- parent: \"A\"\n"));
    }
}

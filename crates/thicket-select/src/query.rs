//! Query driver: parse, then collect matches in document order.

use std::collections::HashSet;
use std::ops::Index;

use thicket_dom::{DomTree, NodeId};

use crate::ast::SelectorList;
use crate::error::SelectorError;
use crate::matching::Matcher;
use crate::parser::parse;

/// An ordered, duplicate-free set of elements from one tree, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Elements {
    nodes: Vec<NodeId>,
}

impl Elements {
    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether nothing matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The element at `index`, in document order.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<NodeId> {
        self.nodes.get(index).copied()
    }

    /// The first element in document order.
    #[must_use]
    pub fn first(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    /// The last element in document order.
    #[must_use]
    pub fn last(&self) -> Option<NodeId> {
        self.nodes.last().copied()
    }

    /// Iterate in document order.
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().copied()
    }

    /// Whether `node` is in the set.
    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }

    /// The elements as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[NodeId] {
        &self.nodes
    }

    /// The elements as a vector.
    #[must_use]
    pub fn into_vec(self) -> Vec<NodeId> {
        self.nodes
    }

    /// Run `text` scoped at each element and return the union in document order.
    ///
    /// # Errors
    ///
    /// Returns the parser's error if `text` is not a valid selector.
    pub fn select(&self, tree: &DomTree, text: &str) -> Result<Self, SelectorError> {
        let list = parse(text)?;
        Ok(self.select_with(tree, &list))
    }

    /// Run a parsed selector scoped at each element and return the union in document order.
    #[must_use]
    pub fn select_with(&self, tree: &DomTree, list: &SelectorList) -> Self {
        let found: HashSet<NodeId> = self
            .nodes
            .iter()
            .flat_map(|&scope| Matcher::new(tree, scope).select_all(list))
            .collect();
        // One pre-order pass restores document order across scopes
        let nodes = tree
            .descendants(tree.root())
            .filter(|node| found.contains(node))
            .collect();
        Self { nodes }
    }
}

impl Index<usize> for Elements {
    type Output = NodeId;

    fn index(&self, index: usize) -> &Self::Output {
        &self.nodes[index]
    }
}

impl IntoIterator for Elements {
    type Item = NodeId;
    type IntoIter = std::vec::IntoIter<NodeId>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}

impl<'a> IntoIterator for &'a Elements {
    type Item = NodeId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, NodeId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter().copied()
    }
}

impl SelectorList {
    /// Whether `element` matches, with the document as scope root.
    #[must_use]
    pub fn matches(&self, tree: &DomTree, element: NodeId) -> bool {
        Matcher::new(tree, tree.root()).matches(self, element)
    }

    /// Whether `element` matches, with `scope` as scope root. Elements outside the
    /// scope never match.
    #[must_use]
    pub fn matches_in_scope(&self, tree: &DomTree, scope: NodeId, element: NodeId) -> bool {
        Matcher::new(tree, scope).matches(self, element)
    }
}

/// Find every element strictly below `scope` matching `text`, in document order.
///
/// # Errors
///
/// Returns the parser's error if `text` is not a valid selector; no partial result is
/// produced.
pub fn select(tree: &DomTree, scope: NodeId, text: &str) -> Result<Elements, SelectorError> {
    let list = parse(text)?;
    Ok(select_with(tree, scope, &list))
}

/// Find every element strictly below `scope` matching a parsed selector.
#[must_use]
pub fn select_with(tree: &DomTree, scope: NodeId, list: &SelectorList) -> Elements {
    Elements {
        nodes: Matcher::new(tree, scope).select_all(list),
    }
}

/// Whether `element` matches `text`, with the document as scope root.
///
/// # Errors
///
/// Returns the parser's error if `text` is not a valid selector.
pub fn matches(tree: &DomTree, element: NodeId, text: &str) -> Result<bool, SelectorError> {
    Ok(parse(text)?.matches(tree, element))
}

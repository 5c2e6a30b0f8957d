//! Markup tree for the thicket selector engine.
//!
//! This crate provides an arena-based element tree modeled on the
//! [DOM Living Standard](https://dom.spec.whatwg.org/), a registry of tag
//! capabilities, and a builder that turns a JSON node description into a tree.
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all relationships,
//! providing O(1) access and traversal without borrow checker issues. The selector
//! engine only ever reads from it.

mod builder;
mod error;
/// Tag capabilities and the shared tag registry.
pub mod tag;

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

pub use builder::NodeSpec;
pub use error::{BuildError, TagError};
pub use tag::Tag;

/// Map of attribute names to values for an element.
pub type AttributesMap = HashMap<String, String>;

/// A type-safe index into the tree.
///
/// `NodeId` provides O(1) access to any node in the tree without borrowing issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root document node is always at index 0.
    pub const ROOT: Self = Self(0);
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// A node stores indices for parent/child/sibling relationships,
/// enabling O(1) traversal in any direction.
#[derive(Debug, Clone)]
pub struct Node {
    /// "Each node has an associated node type"
    pub node_type: NodeType,

    /// The parent node, `None` for the document and for detached nodes.
    pub parent: Option<NodeId>,

    /// Children in document order.
    pub children: Vec<NodeId>,

    /// The node immediately following this one in its parent's children.
    pub next_sibling: Option<NodeId>,

    /// The node immediately preceding this one in its parent's children.
    pub prev_sibling: Option<NodeId>,
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Each node has an associated node type"
#[derive(Debug, Clone)]
pub enum NodeType {
    /// The document node at the root of every tree.
    Document,
    /// An element with a tag name and attributes.
    Element(ElementData),
    /// A run of character data.
    Text(String),
    /// A comment; never matched and never part of text content.
    Comment(String),
}

/// Element-specific data.
///
/// Only the tag name as written and the attributes are stored; namespaces are part
/// of the name (`svg:rect`).
#[derive(Debug, Clone)]
pub struct ElementData {
    /// The element's tag name as written.
    pub tag_name: String,
    /// The element's attributes.
    pub attrs: AttributesMap,
}

impl ElementData {
    /// Create element data for a tag with no attributes.
    #[must_use]
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            attrs: AttributesMap::new(),
        }
    }

    /// Look up an attribute value by name, ignoring ASCII case.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .get(name)
            .or_else(|| {
                self.attrs
                    .iter()
                    .find(|(key, _)| key.eq_ignore_ascii_case(name))
                    .map(|(_, value)| value)
            })
            .map(String::as_str)
    }

    /// Whether the element carries the attribute, ignoring ASCII case of the name.
    #[must_use]
    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Returns the element's id attribute value if present.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    /// Returns the set of class names from the class attribute.
    ///
    /// "The class attribute, if specified, must have a value that is a set of
    /// space-separated tokens representing the various classes that the element belongs to."
    #[must_use]
    pub fn classes(&self) -> HashSet<&str> {
        self.attr("class")
            .map(|list| list.split_ascii_whitespace().collect())
            .unwrap_or_default()
    }

    /// Whether one of the element's classes equals `name`, ignoring ASCII case.
    #[must_use]
    pub fn has_class(&self, name: &str) -> bool {
        self.attr("class").is_some_and(|list| {
            list.split_ascii_whitespace()
                .any(|class| class.eq_ignore_ascii_case(name))
        })
    }

    /// The element's tag capabilities, resolved through the tag registry.
    ///
    /// Elements with a blank tag name resolve to `None`.
    #[must_use]
    pub fn tag(&self) -> Option<Cow<'static, Tag>> {
        Tag::value_of(&self.tag_name).ok()
    }
}

/// Arena-based tree with O(1) node access and traversal.
///
/// All nodes are stored in a contiguous vector, using indices for all relationships.
/// The Document node is always at index 0 ([`NodeId::ROOT`]).
#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a new tree with just the Document node.
    #[must_use]
    pub fn new() -> Self {
        let document = Node {
            node_type: NodeType::Document,
            parent: None,
            children: Vec::new(),
            next_sibling: None,
            prev_sibling: None,
        };
        Self {
            nodes: vec![document],
        }
    }

    /// Get the root document node ID.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get the number of nodes in the tree, the Document included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty (it always holds at least the Document).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a new node and return its ID.
    /// The node is not yet attached to the tree.
    pub fn alloc(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            node_type,
            parent: None,
            children: Vec::new(),
            next_sibling: None,
            prev_sibling: None,
        });
        id
    }

    /// [§ 4.2.2 Append](https://dom.spec.whatwg.org/#concept-node-append)
    ///
    /// Appends `child` as the last child of `parent`, updating all relationships.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let prev_last_child = self.nodes[parent.0].children.last().copied();

        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);

        if let Some(prev_id) = prev_last_child {
            self.nodes[prev_id.0].next_sibling = Some(child);
            self.nodes[child.0].prev_sibling = Some(prev_id);
        }
    }

    /// Allocate an element and append it to `parent`.
    pub fn append_element<K, V>(
        &mut self,
        parent: NodeId,
        tag_name: &str,
        attrs: impl IntoIterator<Item = (K, V)>,
    ) -> NodeId
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut data = ElementData::new(tag_name);
        data.attrs = attrs
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        let id = self.alloc(NodeType::Element(data));
        self.append_child(parent, id);
        id
    }

    /// Allocate a text node and append it to `parent`.
    pub fn append_text(&mut self, parent: NodeId, text: impl Into<String>) -> NodeId {
        let id = self.alloc(NodeType::Text(text.into()));
        self.append_child(parent, id);
        id
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Iterate over the element children of a node, skipping text and comments.
    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(|&child| self.as_element(child).is_some())
    }

    /// Get the next sibling of a node.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.next_sibling)
    }

    /// Get the previous sibling of a node.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.prev_sibling)
    }

    /// Check if `descendant` is a strict descendant of `ancestor`.
    #[must_use]
    pub fn is_descendant_of(&self, descendant: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(descendant).any(|id| id == ancestor)
    }

    /// Iterate over all ancestors of a node, from parent to root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Iterate over preceding siblings (from immediately before to first child).
    #[must_use]
    pub fn preceding_siblings(&self, id: NodeId) -> PrecedingSiblingIterator<'_> {
        PrecedingSiblingIterator {
            tree: self,
            current: self.prev_sibling(id),
        }
    }

    /// Iterate over preceding element siblings, nearest first.
    pub fn preceding_element_siblings(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.preceding_siblings(id)
            .filter(|&sibling| self.as_element(sibling).is_some())
    }

    /// Iterate over every node below `id` in document (pre-)order, excluding `id`.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> DescendantIterator<'_> {
        DescendantIterator {
            tree: self,
            stack: self.children(id).iter().rev().copied().collect(),
        }
    }

    /// Get element data if this node is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Get text content if this node is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// "The document element of a document is the element whose parent is that
    /// document, if it exists; otherwise null."
    #[must_use]
    pub fn document_element(&self) -> Option<NodeId> {
        self.element_children(NodeId::ROOT).next()
    }

    /// The first `body` or `frameset` child of the document element.
    #[must_use]
    pub fn body(&self) -> Option<NodeId> {
        let html = self.document_element()?;

        self.element_children(html).find(|&id| {
            self.as_element(id).is_some_and(|e| {
                e.tag_name.eq_ignore_ascii_case("body") || e.tag_name.eq_ignore_ascii_case("frameset")
            })
        })
    }

    /// The element's own text: its direct text children, whitespace-normalised.
    ///
    /// For `<p>Hello <b>there</b> now</p>` this is `"Hello now"`.
    #[must_use]
    pub fn own_text(&self, id: NodeId) -> String {
        let mut accum = String::new();
        let preserve = self.preserves_whitespace(id);
        for &child in self.children(id) {
            match self.get(child).map(|n| &n.node_type) {
                Some(NodeType::Text(text)) => append_text(&mut accum, text, preserve),
                Some(NodeType::Element(data)) if data.tag_name.eq_ignore_ascii_case("br") => {
                    append_space(&mut accum);
                }
                _ => {}
            }
        }
        accum.trim().to_owned()
    }

    /// The combined text of the node and all its descendants, whitespace-normalised.
    ///
    /// Block elements and `<br>` separate their text from the text around them.
    #[must_use]
    pub fn text(&self, id: NodeId) -> String {
        let mut accum = String::new();
        for node in self.descendants(id) {
            match self.get(node).map(|n| &n.node_type) {
                Some(NodeType::Text(text)) => {
                    // Text following a block element starts a new run
                    if self.prev_sibling(node).is_some_and(|prev| self.is_block(prev)) {
                        append_space(&mut accum);
                    }
                    let preserve = self.parent(node).is_some_and(|p| self.preserves_whitespace(p));
                    append_text(&mut accum, text, preserve);
                }
                Some(NodeType::Element(data)) => {
                    if data.tag_name.eq_ignore_ascii_case("br") || self.is_block(node) {
                        append_space(&mut accum);
                    }
                }
                _ => {}
            }
        }
        accum.trim().to_owned()
    }

    fn is_block(&self, id: NodeId) -> bool {
        self.as_element(id)
            .and_then(ElementData::tag)
            .is_some_and(|tag| tag.is_block())
    }

    /// Whether text directly inside `id` keeps its whitespace: the element or its parent
    /// is a whitespace-preserving tag such as `pre`.
    fn preserves_whitespace(&self, id: NodeId) -> bool {
        std::iter::once(id)
            .chain(self.parent(id))
            .filter_map(|node| self.as_element(node))
            .any(|data| data.tag().is_some_and(|tag| tag.preserve_whitespace()))
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Append a space unless the text is empty or already ends with whitespace.
fn append_space(accum: &mut String) {
    if !accum.is_empty() && !accum.ends_with(char::is_whitespace) {
        accum.push(' ');
    }
}

/// Append text, collapsing whitespace runs into single spaces unless `preserve` is set.
fn append_text(accum: &mut String, text: &str, preserve: bool) {
    if preserve {
        accum.push_str(text);
        return;
    }
    for c in text.chars() {
        if c.is_whitespace() {
            append_space(accum);
        } else {
            accum.push(c);
        }
    }
}

/// Iterator over ancestors of a node.
pub struct AncestorIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

/// Iterator over preceding siblings of a node.
pub struct PrecedingSiblingIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for PrecedingSiblingIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.prev_sibling(id);
        Some(id)
    }
}

/// Pre-order iterator over the nodes below a starting node.
pub struct DescendantIterator<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
}

impl Iterator for DescendantIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}

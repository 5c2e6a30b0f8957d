//! Building trees from JSON node descriptions.
//!
//! A description is a node or a list of nodes:
//!
//! ```text
//! [
//!   {"tag": "div", "attrs": {"id": "1"}, "children": [
//!     {"tag": "p", "children": ["Hello"]}
//!   ]},
//!   {"comment": "not matched"}
//! ]
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thicket_common::warning::warn_once;

use crate::{BuildError, DomTree, ElementData, NodeId, NodeType, Tag};

/// One node of a tree description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeSpec {
    /// A text node, written as a bare string.
    Text(String),

    /// A comment node.
    Comment {
        /// The comment's content.
        comment: String,
    },

    /// An element with optional attributes and children.
    Element {
        /// Tag name as written, e.g. `div` or `svg:rect`.
        tag: String,
        /// Attributes in name order.
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        attrs: BTreeMap<String, String>,
        /// Child nodes in document order.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        children: Vec<Self>,
    },
}

/// The top level of a description: a single node or a list of them.
#[derive(Deserialize)]
#[serde(untagged)]
enum DocumentSpec {
    Many(Vec<NodeSpec>),
    One(NodeSpec),
}

impl DomTree {
    /// Build a tree from a JSON description; top-level nodes become children of the document.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Json`] for JSON that does not describe nodes and
    /// [`BuildError::Tag`] for an element with a blank tag name.
    pub fn from_json(json: &str) -> Result<Self, BuildError> {
        let specs = match serde_json::from_str(json)? {
            DocumentSpec::Many(specs) => specs,
            DocumentSpec::One(spec) => vec![spec],
        };
        Self::from_specs(&specs)
    }

    /// Build a tree from already-deserialised node descriptions.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Tag`] for an element with a blank tag name.
    pub fn from_specs(specs: &[NodeSpec]) -> Result<Self, BuildError> {
        let mut tree = Self::new();
        for spec in specs {
            let _ = tree.append_spec(NodeId::ROOT, spec)?;
        }
        Ok(tree)
    }

    /// Append a described subtree under `parent` and return the new node.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Tag`] for an element with a blank tag name.
    pub fn append_spec(&mut self, parent: NodeId, spec: &NodeSpec) -> Result<NodeId, BuildError> {
        let id = match spec {
            NodeSpec::Text(text) => self.alloc(NodeType::Text(text.clone())),
            NodeSpec::Comment { comment } => self.alloc(NodeType::Comment(comment.clone())),
            NodeSpec::Element {
                tag,
                attrs,
                children,
            } => {
                let resolved = Tag::value_of(tag)?;
                if !resolved.is_known() {
                    let _ = warn_once(
                        "DOM",
                        &format!("unknown tag <{resolved}>, treated as generic inline"),
                    );
                }
                let mut data = ElementData::new(tag.trim());
                data.attrs = attrs
                    .iter()
                    .map(|(name, value)| (name.clone(), value.clone()))
                    .collect();
                let id = self.alloc(NodeType::Element(data));
                for child in children {
                    let _ = self.append_spec(id, child)?;
                }
                id
            }
        };
        self.append_child(parent, id);
        Ok(id)
    }
}

//! Selector parsing, matching and querying over thicket markup trees.
//!
//! # Scope
//!
//! This crate implements:
//! - **Selector parser** ([Selectors Level 4](https://www.w3.org/TR/selectors-4/) syntax, plus
//!   the query extensions `:contains`, `:containsOwn`, `:matches`, `:matchesOwn`, `:lt`, `:gt`,
//!   `:eq`, `[attr~=regex]`, `[attr!=value]` and `[^prefix]`)
//!   - Selector lists, combinators, compound selectors
//!   - Quoted and unquoted attribute values with ` i`/` s` case flags
//!   - A leading combinator (`> p`) relative to the scope root
//!   - Canonical serialisation that parses back to an equal tree
//!
//! - **Evaluator**
//!   - Right-to-left matching with backtracking through combinators
//!   - Ordinal pseudo-classes over the per-parent candidate pool
//!   - `:has` relative to the candidate, `:not` relative to the query scope
//!
//! - **Query driver**
//!   - [`select`], [`select_with`] and [`matches`]
//!   - [`Elements`], ordered and duplicate free, re-scopable with [`Elements::select`]
//!
//! Regular expressions are compiled through a [`PatternEngine`]; [`RegexEngine`] wraps the
//! `regex` crate and is used unless a [`Parser`] is built with another.
//!
//! # Tracing
//!
//! With the `match-trace` feature every complex-selector test is printed to stderr,
//! indented by `:has`/`:not` nesting depth.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use thicket_dom::DomTree;
//!
//! let tree = DomTree::from_json(&json!(
//!     {"tag": "div", "children": [{"tag": "p", "children": ["One"]}, {"tag": "p", "children": ["Two"]}]}
//! ).to_string()).unwrap();
//!
//! let found = thicket_select::select(&tree, tree.root(), "div > p:gt(0)").unwrap();
//! assert_eq!(found.len(), 1);
//! assert_eq!(tree.text(found[0]), "Two");
//! ```

/// Selector syntax tree and canonical serialisation.
pub mod ast;
/// Matching policy configuration.
pub mod config;
/// Selector compilation errors.
pub mod error;
/// Evaluation of parsed selectors against a tree.
pub mod matching;
/// Selector text parsing.
pub mod parser;
/// Pluggable regular-expression capability.
pub mod pattern;
/// Query entry points and result sets.
pub mod query;

pub use ast::{
    AttributeSelector, AttributeValue, Combinator, ComplexSelector, CompoundSelector, Ordinal,
    PseudoClass, PseudoName, SelectorList, SimpleSelector,
};
pub use config::{CaseSensitivity, SelectorConfig};
pub use error::SelectorError;
pub use matching::Matcher;
pub use parser::{Parser, parse};
pub use pattern::{Pattern, PatternEngine, RegexEngine, TextPattern};
pub use query::{Elements, matches, select, select_with};

//! Selector evaluation against a [`DomTree`].
//!
//! Matching walks right to left: the subject compound is tested against the
//! candidate, then each combinator moves outward (to an ancestor, the parent or an
//! earlier sibling) and tests the next compound there. Descendant and sibling
//! combinators backtrack, so `div > p span` finds the right `p` even when a closer
//! ancestor `p` sits under something other than a `div`.
//!
//! Every walk is bounded by the scope root. The scope itself may satisfy a
//! left-hand compound but nothing above or beside it is ever visited.

#[cfg(feature = "match-trace")]
use std::cell::Cell;

use thicket_dom::{DomTree, ElementData, NodeId, NodeType};

use crate::ast::{
    AttributeSelector, Combinator, ComplexSelector, PseudoClass, SelectorList, SimpleSelector,
};

#[cfg(feature = "match-trace")]
thread_local! {
    static TRACE_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Evaluates selectors against the elements of one tree, relative to a scope root.
#[derive(Debug, Clone, Copy)]
pub struct Matcher<'a> {
    tree: &'a DomTree,
    scope: NodeId,
}

impl<'a> Matcher<'a> {
    /// A matcher over `tree` whose walks stop at `scope`.
    #[must_use]
    pub const fn new(tree: &'a DomTree, scope: NodeId) -> Self {
        Self { tree, scope }
    }

    /// The scope root.
    #[must_use]
    pub const fn scope(&self) -> NodeId {
        self.scope
    }

    /// Whether `node` matches any alternative of `list`.
    ///
    /// Nodes outside the scope never match.
    #[must_use]
    pub fn matches(&self, list: &SelectorList, node: NodeId) -> bool {
        (node == self.scope || self.tree.is_descendant_of(node, self.scope))
            && self.matches_list(list, node)
    }

    /// Every element strictly below the scope that matches `list`, in document order.
    #[must_use]
    pub fn select_all(&self, list: &SelectorList) -> Vec<NodeId> {
        self.tree
            .descendants(self.scope)
            .filter(|&node| self.tree.as_element(node).is_some() && self.matches_list(list, node))
            .collect()
    }

    fn matches_list(&self, list: &SelectorList, node: NodeId) -> bool {
        list.selectors
            .iter()
            .any(|selector| self.matches_complex(selector, node))
    }

    fn matches_complex(&self, selector: &ComplexSelector, node: NodeId) -> bool {
        #[cfg(feature = "match-trace")]
        let depth = TRACE_DEPTH.with(|d| {
            let depth = d.get();
            d.set(depth + 1);
            depth
        });

        let matched = self.matches_step(selector, 0, node);

        #[cfg(feature = "match-trace")]
        {
            TRACE_DEPTH.with(|d| d.set(depth));
            eprintln!(
                "[MATCH] {:indent$}{selector} @ node {} (scope {}) -> {matched}",
                "",
                node.0,
                self.scope.0,
                indent = depth * 2
            );
        }

        matched
    }

    /// Whether `node` satisfies the compound at `step` and everything to its left.
    fn matches_step(&self, selector: &ComplexSelector, step: usize, node: NodeId) -> bool {
        self.compound_matches(selector, step, node) && self.relation_matches(selector, step, node)
    }

    /// Whether the part of the chain left of the compound at `step` is satisfied,
    /// taking `node` as the element the compound applies to.
    fn relation_matches(&self, selector: &ComplexSelector, step: usize, node: NodeId) -> bool {
        let Some((combinator, _)) = selector.combinators.get(step) else {
            // Leftmost compound: nothing further to check
            return true;
        };
        if node == self.scope {
            return false;
        }
        let next = step + 1;

        match combinator {
            // [§ 16.1 Descendant combinator](https://www.w3.org/TR/selectors-4/#descendant-combinators)
            // "A selector of the form 'A B' represents an element B that is an
            // arbitrary descendant of some ancestor element A."
            Combinator::Descendant => self
                .scoped_ancestors(node)
                .any(|ancestor| self.matches_step(selector, next, ancestor)),

            // [§ 16.2 Child combinator](https://www.w3.org/TR/selectors-4/#child-combinators)
            Combinator::Child => self
                .tree
                .parent(node)
                .is_some_and(|parent| self.matches_step(selector, next, parent)),

            // [§ 16.3 Next-sibling combinator](https://www.w3.org/TR/selectors-4/#adjacent-sibling-combinators)
            // Only element siblings count.
            Combinator::NextSibling => self
                .tree
                .preceding_element_siblings(node)
                .next()
                .is_some_and(|sibling| self.matches_step(selector, next, sibling)),

            // [§ 16.4 Subsequent-sibling combinator](https://www.w3.org/TR/selectors-4/#general-sibling-combinators)
            Combinator::SubsequentSibling => self
                .tree
                .preceding_element_siblings(node)
                .any(|sibling| self.matches_step(selector, next, sibling)),
        }
    }

    /// Ancestors of `node` from its parent up to and including the scope root.
    fn scoped_ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut reached_scope = false;
        self.tree.ancestors(node).take_while(move |&ancestor| {
            let take = !reached_scope;
            reached_scope = ancestor == self.scope;
            take
        })
    }

    /// Test the compound at `step`. Ordinal pseudo-classes filter by position among
    /// the siblings that satisfy the predicates written before them and the chain to
    /// the left.
    fn compound_matches(&self, selector: &ComplexSelector, step: usize, node: NodeId) -> bool {
        let Some(compound) = selector.compound_at(step) else {
            return false;
        };
        let simples = &compound.simple_selectors;

        simples.iter().enumerate().all(|(index, simple)| {
            match simple {
                SimpleSelector::PseudoClass(pc) => pc.ordinal().map_or_else(
                    || self.simple_matches(simple, node),
                    |ordinal| {
                        ordinal.accepts(self.pool_position(selector, step, &simples[..index], node))
                    },
                ),
                _ => self.simple_matches(simple, node),
            }
        })
    }

    /// Zero-based position of `node` among its element siblings that satisfy the
    /// non-ordinal `predicates` and the chain left of `step`.
    fn pool_position(
        &self,
        selector: &ComplexSelector,
        step: usize,
        predicates: &[SimpleSelector],
        node: NodeId,
    ) -> usize {
        if node == self.scope {
            return 0;
        }
        self.tree
            .preceding_element_siblings(node)
            .filter(|&sibling| {
                predicates
                    .iter()
                    .filter(|simple| !simple.is_ordinal())
                    .all(|simple| self.simple_matches(simple, sibling))
                    && self.relation_matches(selector, step, sibling)
            })
            .count()
    }

    fn simple_matches(&self, simple: &SimpleSelector, node: NodeId) -> bool {
        // The scope root may be the document, which is not an element
        if matches!(simple, SimpleSelector::PseudoClass(PseudoClass::Scope)) {
            return node == self.scope;
        }
        let Some(element) = self.tree.as_element(node) else {
            return false;
        };

        match simple {
            SimpleSelector::Type(name) => element.tag_name.trim().eq_ignore_ascii_case(name),
            SimpleSelector::Universal => true,
            SimpleSelector::Id(id) => element.id().is_some_and(|own| own.eq_ignore_ascii_case(id)),
            SimpleSelector::Class(class) => element.has_class(class),
            SimpleSelector::Attribute(attr) => attribute_matches(attr, element),
            SimpleSelector::PseudoClass(pc) => self.pseudo_class_matches(pc, node, element),
        }
    }

    /// [§ 4 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
    fn pseudo_class_matches(&self, pc: &PseudoClass, node: NodeId, element: &ElementData) -> bool {
        let tree = self.tree;
        match pc {
            PseudoClass::Scope => node == self.scope,

            // [§ 4.4 :root](https://www.w3.org/TR/selectors-4/#the-root-pseudo)
            PseudoClass::Root => tree.document_element() == Some(node),

            // [§ 4.12 :first-child](https://www.w3.org/TR/selectors-4/#the-first-child-pseudo)
            PseudoClass::FirstChild => tree.preceding_element_siblings(node).next().is_none(),

            // [§ 4.12 :last-child](https://www.w3.org/TR/selectors-4/#the-last-child-pseudo)
            PseudoClass::LastChild => tree
                .parent(node)
                .is_some_and(|parent| tree.element_children(parent).last() == Some(node)),

            // [§ 4.12 :only-child](https://www.w3.org/TR/selectors-4/#the-only-child-pseudo)
            PseudoClass::OnlyChild => tree
                .parent(node)
                .is_some_and(|parent| tree.element_children(parent).count() == 1),

            // [§ 4.11 :first-of-type](https://www.w3.org/TR/selectors-4/#the-first-of-type-pseudo)
            PseudoClass::FirstOfType => !tree
                .preceding_element_siblings(node)
                .any(|sibling| same_type(tree, sibling, element)),

            // [§ 4.11 :last-of-type](https://www.w3.org/TR/selectors-4/#the-last-of-type-pseudo)
            PseudoClass::LastOfType => tree.parent(node).is_some_and(|parent| {
                tree.element_children(parent)
                    .filter(|&sibling| same_type(tree, sibling, element))
                    .last()
                    == Some(node)
            }),

            // [§ 4.5 :empty](https://www.w3.org/TR/selectors-4/#the-empty-pseudo)
            PseudoClass::Empty => {
                tree.children(node)
                    .iter()
                    .all(|&c| match tree.get(c).map(|n| &n.node_type) {
                        Some(NodeType::Text(t)) => t.trim().is_empty(),
                        Some(NodeType::Comment(_)) => true,
                        _ => false,
                    })
            }

            // [§ 4.5 :has()](https://www.w3.org/TR/selectors-4/#relational)
            // The argument is relative to the candidate, which becomes the scope root.
            PseudoClass::Has(inner) => {
                let relative = Self::new(tree, node);
                tree.descendants(node).any(|descendant| {
                    tree.as_element(descendant).is_some() && relative.matches_list(inner, descendant)
                })
            }

            // [§ 4.3 :not()](https://www.w3.org/TR/selectors-4/#negation)
            PseudoClass::Not(inner) => !self.matches_list(inner, node),

            PseudoClass::Contains(text) => tree.text(node).to_lowercase().contains(text.as_str()),
            PseudoClass::ContainsOwn(text) => {
                tree.own_text(node).to_lowercase().contains(text.as_str())
            }
            PseudoClass::Matches(pattern) => pattern.is_match(&tree.text(node)),
            PseudoClass::MatchesOwn(pattern) => pattern.is_match(&tree.own_text(node)),

            // Positional; decided in `compound_matches`
            PseudoClass::Lt(_) | PseudoClass::Gt(_) | PseudoClass::Eq(_) => true,
        }
    }
}

fn same_type(tree: &DomTree, node: NodeId, element: &ElementData) -> bool {
    tree.as_element(node)
        .is_some_and(|other| other.tag_name.eq_ignore_ascii_case(&element.tag_name))
}

/// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
fn attribute_matches(attr: &AttributeSelector, element: &ElementData) -> bool {
    match attr {
        AttributeSelector::Exists(name) => element.has_attr(name),
        AttributeSelector::NameStartsWith(prefix) => element
            .attrs
            .keys()
            .any(|key| key.to_ascii_lowercase().starts_with(prefix.as_str())),
        AttributeSelector::Equals(name, expected) => element
            .attr(name)
            .is_some_and(|actual| expected.prepare(actual.trim()) == expected.value),
        // A missing attribute compares as empty
        AttributeSelector::NotEquals(name, expected) => {
            expected.prepare(element.attr(name).unwrap_or_default().trim()) != expected.value
        }
        AttributeSelector::PrefixMatch(name, expected) => element
            .attr(name)
            .is_some_and(|actual| expected.prepare(actual).starts_with(expected.value.as_str())),
        AttributeSelector::SuffixMatch(name, expected) => element
            .attr(name)
            .is_some_and(|actual| expected.prepare(actual).ends_with(expected.value.as_str())),
        AttributeSelector::SubstringMatch(name, expected) => element
            .attr(name)
            .is_some_and(|actual| expected.prepare(actual).contains(expected.value.as_str())),
        AttributeSelector::Regex(name, pattern) => {
            element.attr(name).is_some_and(|actual| pattern.is_match(actual))
        }
    }
}

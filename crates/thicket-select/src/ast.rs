//! Selector syntax tree.
//!
//! The shape follows [Selectors Level 4](https://www.w3.org/TR/selectors-4/): a list of
//! complex selectors (one per comma-separated alternative), each a chain of compound
//! selectors joined by combinators. Every type prints in a canonical form that parses
//! back to an equal tree.

use std::fmt::{self, Write};

use strum_macros::{Display, EnumString};

use crate::config::CaseSensitivity;
use crate::pattern::Pattern;

/// [§ 4.1 Selector lists](https://www.w3.org/TR/selectors-4/#grouping)
///
/// A comma-separated list of alternatives. An element matches the list when it
/// matches any alternative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    /// The alternatives, in the order written.
    pub selectors: Vec<ComplexSelector>,
}

/// [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
///
/// Example: `div.container > ul.nav li`
/// This would be parsed as:
/// ```text
/// [div.container] --(Child)--> [ul.nav] --(Descendant)--> [li]
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexSelector {
    /// The rightmost compound selector, the one tested against a candidate.
    pub subject: CompoundSelector,

    /// Chain of (combinator, `compound_selector`) pairs going left from the subject.
    /// Empty if this is a simple compound selector with no combinators.
    ///
    /// For `A > B C`, this would be:
    /// - subject: C
    /// - combinators: [(Descendant, B), (Child, A)]
    pub combinators: Vec<(Combinator, CompoundSelector)>,
}

impl ComplexSelector {
    /// The compound at `step` of the matching walk: 0 is the subject, `n` is the
    /// left-hand side of the `n`th combinator.
    #[must_use]
    pub fn compound_at(&self, step: usize) -> Option<&CompoundSelector> {
        match step {
            0 => Some(&self.subject),
            _ => self.combinators.get(step - 1).map(|(_, compound)| compound),
        }
    }
}

/// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
///
/// "A compound selector is a sequence of simple selectors that are not
/// separated by a combinator, and represents a set of simultaneous
/// conditions on a single element."
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundSelector {
    /// The simple selectors, all of which must hold, in the order written.
    pub simple_selectors: Vec<SimpleSelector>,
}

/// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Whitespace: `A B` matches a B with some ancestor A.
    Descendant,
    /// `A > B` matches a B whose parent is an A.
    Child,
    /// `A + B` matches a B whose previous element sibling is an A.
    NextSibling,
    /// `A ~ B` matches a B with some earlier element sibling A.
    SubsequentSibling,
}

impl Combinator {
    /// The combinator for a punctuation character, if it is one.
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            '>' => Some(Self::Child),
            '+' => Some(Self::NextSibling),
            '~' => Some(Self::SubsequentSibling),
            _ => None,
        }
    }
}

/// A single condition on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    /// Tag name, stored lower-cased. A namespace-qualified `ns|name` is stored as
    /// `ns:name`, the way such elements are named in the tree.
    ///
    /// Examples: `div`, `p`, `svg|rect`
    Type(String),

    /// `*`, any element.
    Universal,

    /// `#id`, compared ignoring ASCII case.
    Id(String),

    /// `.class`, compared ignoring ASCII case.
    Class(String),

    /// `[attr…]` predicates.
    Attribute(AttributeSelector),

    /// `:name` and `:name(argument)` predicates.
    PseudoClass(PseudoClass),
}

impl SimpleSelector {
    /// Whether this is an ordinal filter (`:lt`, `:gt`, `:eq`).
    #[must_use]
    pub const fn is_ordinal(&self) -> bool {
        matches!(self, Self::PseudoClass(pc) if pc.ordinal().is_some())
    }
}

/// An attribute value to compare against, with its case policy.
///
/// For [`CaseSensitivity::Insensitive`] the value is stored lower-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeValue {
    /// The trimmed value.
    pub value: String,
    /// How the element's value is compared to this one.
    pub case: CaseSensitivity,
}

impl AttributeValue {
    /// Build a comparison value, trimming it and folding case if insensitive.
    #[must_use]
    pub fn new(value: &str, case: CaseSensitivity) -> Self {
        Self {
            value: fold_case(value.trim(), case),
            case,
        }
    }

    /// Bring an element's attribute value into comparable form.
    #[must_use]
    pub fn prepare(&self, actual: &str) -> String {
        fold_case(actual, self.case)
    }
}

fn fold_case(value: &str, case: CaseSensitivity) -> String {
    match case {
        CaseSensitivity::Sensitive => value.to_owned(),
        CaseSensitivity::Insensitive => value.to_lowercase(),
    }
}

/// Attribute predicates. Attribute names are stored ASCII-lower-cased and looked up
/// ignoring ASCII case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeSelector {
    /// `[attr]`: the attribute is present.
    Exists(String),

    /// `[^prefix]`: some attribute's name starts with the prefix.
    ///
    /// Example: `[^data-]` matches `<div data-id=7>`
    NameStartsWith(String),

    /// `[attr=value]`: the trimmed value equals.
    Equals(String, AttributeValue),

    /// `[attr!=value]`: the trimmed value differs; a missing attribute counts as empty.
    NotEquals(String, AttributeValue),

    /// `[attr^=value]`: the value starts with.
    PrefixMatch(String, AttributeValue),

    /// `[attr$=value]`: the value ends with.
    SuffixMatch(String, AttributeValue),

    /// `[attr*=value]`: the value contains.
    SubstringMatch(String, AttributeValue),

    /// `[attr~=pattern]`: the pattern matches somewhere in the value.
    ///
    /// Example: `img[src~=(?i)\.(png|jpe?g)]`
    Regex(String, Pattern),
}

/// Names of the supported pseudo-classes, case-insensitive in selector text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum PseudoName {
    /// `:scope`
    #[strum(serialize = "scope")]
    Scope,
    /// `:root`
    #[strum(serialize = "root")]
    Root,
    /// `:first-child`
    #[strum(serialize = "first-child")]
    FirstChild,
    /// `:last-child`
    #[strum(serialize = "last-child")]
    LastChild,
    /// `:only-child`
    #[strum(serialize = "only-child")]
    OnlyChild,
    /// `:first-of-type`
    #[strum(serialize = "first-of-type")]
    FirstOfType,
    /// `:last-of-type`
    #[strum(serialize = "last-of-type")]
    LastOfType,
    /// `:empty`
    #[strum(serialize = "empty")]
    Empty,
    /// `:has(…)`
    #[strum(serialize = "has")]
    Has,
    /// `:not(…)`
    #[strum(serialize = "not")]
    Not,
    /// `:contains(…)`
    #[strum(serialize = "contains")]
    Contains,
    /// `:containsOwn(…)`
    #[strum(serialize = "containsOwn")]
    ContainsOwn,
    /// `:matches(…)`
    #[strum(serialize = "matches")]
    Matches,
    /// `:matchesOwn(…)`
    #[strum(serialize = "matchesOwn")]
    MatchesOwn,
    /// `:lt(n)`
    #[strum(serialize = "lt")]
    Lt,
    /// `:gt(n)`
    #[strum(serialize = "gt")]
    Gt,
    /// `:eq(n)`
    #[strum(serialize = "eq")]
    Eq,
}

impl PseudoName {
    /// Whether the pseudo-class takes a parenthesised argument.
    #[must_use]
    pub const fn is_functional(self) -> bool {
        matches!(
            self,
            Self::Has
                | Self::Not
                | Self::Contains
                | Self::ContainsOwn
                | Self::Matches
                | Self::MatchesOwn
                | Self::Lt
                | Self::Gt
                | Self::Eq
        )
    }
}

/// Pseudo-classes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PseudoClass {
    /// The scope root of the query. A leading combinator (`> p`) is read as `:scope > p`.
    Scope,

    /// [§ 4.4 :root](https://www.w3.org/TR/selectors-4/#the-root-pseudo)
    /// The document element.
    Root,

    /// First among its element siblings.
    FirstChild,

    /// Last among its element siblings.
    LastChild,

    /// No element siblings.
    OnlyChild,

    /// First sibling with its tag name.
    FirstOfType,

    /// Last sibling with its tag name.
    LastOfType,

    /// No element children and no non-blank text.
    Empty,

    /// `:has(list)`: some strict descendant matches `list`, evaluated with the
    /// candidate as scope root.
    Has(SelectorList),

    /// `:not(list)`: the candidate does not match `list`.
    Not(SelectorList),

    /// `:contains(text)`: the candidate's whole text contains `text`, ignoring case.
    /// Stored lower-cased.
    Contains(String),

    /// `:containsOwn(text)`: like `Contains`, against the candidate's own text only.
    ContainsOwn(String),

    /// `:matches(pattern)`: the pattern matches somewhere in the candidate's whole text.
    Matches(Pattern),

    /// `:matchesOwn(pattern)`: the pattern matches somewhere in the candidate's own text.
    MatchesOwn(Pattern),

    /// `:lt(n)`: position in the candidate pool is less than `n`.
    Lt(usize),

    /// `:gt(n)`: position in the candidate pool is greater than `n`.
    Gt(usize),

    /// `:eq(n)`: position in the candidate pool is exactly `n`.
    Eq(usize),
}

/// An ordinal filter over a candidate pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ordinal {
    /// Position `< n`.
    Lt(usize),
    /// Position `> n`.
    Gt(usize),
    /// Position `== n`.
    Eq(usize),
}

impl Ordinal {
    /// Whether a zero-based pool position passes the filter.
    #[must_use]
    pub const fn accepts(self, position: usize) -> bool {
        match self {
            Self::Lt(n) => position < n,
            Self::Gt(n) => position > n,
            Self::Eq(n) => position == n,
        }
    }
}

impl PseudoClass {
    /// The pseudo-class name as written in canonical form.
    #[must_use]
    pub const fn name(&self) -> PseudoName {
        match self {
            Self::Scope => PseudoName::Scope,
            Self::Root => PseudoName::Root,
            Self::FirstChild => PseudoName::FirstChild,
            Self::LastChild => PseudoName::LastChild,
            Self::OnlyChild => PseudoName::OnlyChild,
            Self::FirstOfType => PseudoName::FirstOfType,
            Self::LastOfType => PseudoName::LastOfType,
            Self::Empty => PseudoName::Empty,
            Self::Has(_) => PseudoName::Has,
            Self::Not(_) => PseudoName::Not,
            Self::Contains(_) => PseudoName::Contains,
            Self::ContainsOwn(_) => PseudoName::ContainsOwn,
            Self::Matches(_) => PseudoName::Matches,
            Self::MatchesOwn(_) => PseudoName::MatchesOwn,
            Self::Lt(_) => PseudoName::Lt,
            Self::Gt(_) => PseudoName::Gt,
            Self::Eq(_) => PseudoName::Eq,
        }
    }

    /// The ordinal filter, for `:lt`, `:gt` and `:eq`.
    #[must_use]
    pub const fn ordinal(&self) -> Option<Ordinal> {
        match *self {
            Self::Lt(n) => Some(Ordinal::Lt(n)),
            Self::Gt(n) => Some(Ordinal::Gt(n)),
            Self::Eq(n) => Some(Ordinal::Eq(n)),
            _ => None,
        }
    }
}

// Canonical serialisation.

impl fmt::Display for SelectorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, selector) in self.selectors.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{selector}")?;
        }
        Ok(())
    }
}

impl fmt::Display for ComplexSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (combinator, compound) in self.combinators.iter().rev() {
            write!(f, "{compound}{combinator}")?;
        }
        write!(f, "{}", self.subject)
    }
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Descendant => " ",
            Self::Child => " > ",
            Self::NextSibling => " + ",
            Self::SubsequentSibling => " ~ ",
        })
    }
}

impl fmt::Display for CompoundSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.simple_selectors
            .iter()
            .try_for_each(|simple| write!(f, "{simple}"))
    }
}

impl fmt::Display for SimpleSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(name) => f.write_str(&name.replace(':', "|")),
            Self::Universal => f.write_char('*'),
            Self::Id(id) => write!(f, "#{id}"),
            Self::Class(class) => write!(f, ".{class}"),
            Self::Attribute(attr) => write!(f, "{attr}"),
            Self::PseudoClass(pc) => write!(f, "{pc}"),
        }
    }
}

impl fmt::Display for AttributeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (name, op, value) = match self {
            Self::Exists(name) => return write!(f, "[{name}]"),
            Self::NameStartsWith(prefix) => return write!(f, "[^{prefix}]"),
            Self::Regex(name, pattern) => {
                write!(f, "[{name}~=")?;
                write_quoted(f, pattern.source())?;
                return write!(f, " {}]", pattern.case().flag());
            }
            Self::Equals(name, value) => (name, "=", value),
            Self::NotEquals(name, value) => (name, "!=", value),
            Self::PrefixMatch(name, value) => (name, "^=", value),
            Self::SuffixMatch(name, value) => (name, "$=", value),
            Self::SubstringMatch(name, value) => (name, "*=", value),
        };
        write!(f, "[{name}{op}")?;
        write_quoted(f, &value.value)?;
        write!(f, " {}]", value.case.flag())
    }
}

impl fmt::Display for PseudoClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.name())?;
        match self {
            Self::Has(list) | Self::Not(list) => write!(f, "({list})"),
            Self::Contains(text) | Self::ContainsOwn(text) => {
                f.write_char('(')?;
                for c in text.chars() {
                    if matches!(c, '(' | ')' | '[' | ']' | '\'' | '"' | '\\') {
                        f.write_char('\\')?;
                    }
                    f.write_char(c)?;
                }
                f.write_char(')')
            }
            Self::Matches(pattern) | Self::MatchesOwn(pattern) => {
                write!(f, "({})", pattern.source())
            }
            Self::Lt(n) | Self::Gt(n) | Self::Eq(n) => write!(f, "({n})"),
            _ => Ok(()),
        }
    }
}

/// Write a double-quoted attribute value, escaping `"` and `\`.
fn write_quoted(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    f.write_char('"')?;
    for c in value.chars() {
        if matches!(c, '"' | '\\') {
            f.write_char('\\')?;
        }
        f.write_char(c)?;
    }
    f.write_char('"')
}

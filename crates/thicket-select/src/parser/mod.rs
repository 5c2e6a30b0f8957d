//! Selector text to [`SelectorList`].
//!
//! A hand-written recursive-descent parser. At each position it tries, in order:
//! the comma that ends an alternative, a combinator (whitespace collapses to the
//! descendant combinator unless `>`, `+` or `~` follows), then the simple selectors of
//! a compound: `tag`, `*`, `#id`, `.class`, `[attr…]` and `:pseudo(…)`.
//!
//! Arguments of `:has` and `:not` are parsed recursively into nested lists here, so
//! matching never re-parses text. Patterns are compiled here too.

mod reader;

use std::sync::Arc;

use crate::ast::{
    AttributeSelector, AttributeValue, Combinator, ComplexSelector, CompoundSelector,
    PseudoClass, PseudoName, SelectorList, SimpleSelector,
};
use crate::config::{CaseSensitivity, SelectorConfig};
use crate::error::SelectorError;
use crate::pattern::{Pattern, PatternEngine, RegexEngine};

use self::reader::{Reader, is_ident_char, is_tag_char, unescape};

/// Parse selector text with the default configuration and the `regex` pattern engine.
///
/// # Errors
///
/// Returns [`SelectorError::Malformed`] for syntax errors and
/// [`SelectorError::InvalidPattern`] for patterns the engine rejects.
pub fn parse(text: &str) -> Result<SelectorList, SelectorError> {
    Parser::new().parse(text)
}

/// A configured selector parser.
///
/// Parsers are cheap to clone and can be shared between threads.
#[derive(Debug, Clone)]
pub struct Parser {
    config: SelectorConfig,
    engine: Arc<dyn PatternEngine>,
}

impl Parser {
    /// A parser with the default configuration and [`RegexEngine`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SelectorConfig::default())
    }

    /// A parser with the given configuration and [`RegexEngine`].
    #[must_use]
    pub fn with_config(config: SelectorConfig) -> Self {
        Self::with_engine(config, Arc::new(RegexEngine))
    }

    /// A parser that compiles patterns with a host-supplied engine.
    #[must_use]
    pub fn with_engine(config: SelectorConfig, engine: Arc<dyn PatternEngine>) -> Self {
        Self { config, engine }
    }

    /// The configuration in effect.
    #[must_use]
    pub const fn config(&self) -> &SelectorConfig {
        &self.config
    }

    /// Parse selector text.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError::Malformed`] for syntax errors and
    /// [`SelectorError::InvalidPattern`] for patterns the engine rejects.
    pub fn parse(&self, text: &str) -> Result<SelectorList, SelectorError> {
        self.parse_at(text, 0)
    }

    fn parse_at(&self, text: &str, base: usize) -> Result<SelectorList, SelectorError> {
        QueryParser {
            parser: self,
            reader: Reader::new(text, base),
        }
        .parse_list()
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parsing state for one selector text.
struct QueryParser<'p> {
    parser: &'p Parser,
    reader: Reader,
}

impl QueryParser<'_> {
    /// [§ 4.1 Selector lists](https://www.w3.org/TR/selectors-4/#grouping)
    fn parse_list(&mut self) -> Result<SelectorList, SelectorError> {
        let mut selectors = Vec::new();
        loop {
            selectors.push(self.parse_complex()?);
            // parse_complex only stops at the end or at a top-level comma
            if self.reader.advance().is_none() {
                break;
            }
            let _ = self.reader.consume_whitespace();
            if self.reader.is_empty() {
                return Err(self.reader.error("expected a selector after `,`"));
            }
        }
        Ok(SelectorList { selectors })
    }

    /// [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
    fn parse_complex(&mut self) -> Result<ComplexSelector, SelectorError> {
        let _ = self.reader.consume_whitespace();

        let mut compounds: Vec<CompoundSelector> = Vec::new();
        let mut combinators_between: Vec<Combinator> = Vec::new();

        // A leading combinator relates the first compound to the scope root: `> p`
        // is `:scope > p`.
        if let Some(combinator) = self.reader.peek().and_then(Combinator::from_char) {
            let _ = self.reader.advance();
            let _ = self.reader.consume_whitespace();
            compounds.push(CompoundSelector {
                simple_selectors: vec![SimpleSelector::PseudoClass(PseudoClass::Scope)],
            });
            combinators_between.push(combinator);
        }

        loop {
            compounds.push(self.parse_compound()?);

            let had_whitespace = self.reader.consume_whitespace();
            let Some(c) = self.reader.peek() else {
                break;
            };
            if c == ',' {
                break;
            }
            if let Some(combinator) = Combinator::from_char(c) {
                let _ = self.reader.advance();
                let _ = self.reader.consume_whitespace();
                if matches!(self.reader.peek(), None | Some(',')) {
                    return Err(self.reader.error(format!("expected a selector after `{c}`")));
                }
                combinators_between.push(combinator);
            } else if had_whitespace {
                combinators_between.push(Combinator::Descendant);
            } else {
                return Err(self.reader.error(format!("unexpected character `{c}`")));
            }
        }

        let Some(subject) = compounds.pop() else {
            return Err(self.reader.error("expected a selector"));
        };

        // For "A > B C" we have compounds [A, B] and combinators [Child, Descendant];
        // matching walks outward from the subject, so store [(Descendant, B), (Child, A)].
        let combinators = compounds
            .into_iter()
            .zip(combinators_between)
            .rev()
            .map(|(compound, combinator)| (combinator, compound))
            .collect();

        Ok(ComplexSelector {
            subject,
            combinators,
        })
    }

    /// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
    fn parse_compound(&mut self) -> Result<CompoundSelector, SelectorError> {
        let start = self.reader.position();
        let mut simple_selectors = Vec::new();

        while let Some(c) = self.reader.peek() {
            let simple = match c {
                '*' => {
                    let _ = self.reader.advance();
                    SimpleSelector::Universal
                }
                '#' => {
                    let _ = self.reader.advance();
                    SimpleSelector::Id(self.expect_ident('#')?)
                }
                '.' => {
                    let _ = self.reader.advance();
                    SimpleSelector::Class(self.expect_ident('.')?)
                }
                '[' => self.parse_attribute()?,
                ':' => self.parse_pseudo()?,
                _ if is_tag_char(c) => {
                    if !simple_selectors.is_empty() {
                        return Err(self.reader.error("a tag name must come first in a compound"));
                    }
                    let name = self.reader.consume_while(is_tag_char);
                    SimpleSelector::Type(name.to_ascii_lowercase().replace('|', ":"))
                }
                _ => break,
            };
            simple_selectors.push(simple);
        }

        if simple_selectors.is_empty() {
            return Err(SelectorError::malformed(start, "expected a selector"));
        }
        Ok(CompoundSelector { simple_selectors })
    }

    fn expect_ident(&mut self, sigil: char) -> Result<String, SelectorError> {
        let ident = self.reader.consume_while(is_ident_char);
        if ident.is_empty() {
            return Err(self.reader.error(format!("expected a name after `{sigil}`")));
        }
        Ok(ident)
    }

    /// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    fn parse_attribute(&mut self) -> Result<SimpleSelector, SelectorError> {
        let open = self.reader.position();
        let _ = self.reader.advance();
        let content = self.reader.chomp_balanced('[', ']', true, open)?;
        let mut body = Reader::new(&content, open + 1);
        let _ = body.consume_whitespace();

        if body.peek() == Some('^') {
            let _ = body.advance();
            let prefix = body.remainder().trim().to_ascii_lowercase();
            if prefix.is_empty() {
                return Err(SelectorError::malformed(open, "expected an attribute name prefix after `^`"));
            }
            return Ok(SimpleSelector::Attribute(AttributeSelector::NameStartsWith(prefix)));
        }

        let name = body
            .consume_while(|c| !matches!(c, '=' | '!' | '^' | '$' | '*' | '~'))
            .trim()
            .to_ascii_lowercase();
        if name.is_empty() {
            return Err(SelectorError::malformed(open, "expected an attribute name"));
        }

        let Some(op) = body.advance() else {
            return Ok(SimpleSelector::Attribute(AttributeSelector::Exists(name)));
        };
        if op != '=' {
            if body.peek() != Some('=') {
                return Err(body.error(format!("expected `=` after `{op}`")));
            }
            let _ = body.advance();
        }
        let _ = body.consume_whitespace();
        let (value, flag) = Self::parse_attribute_value(&mut body)?;

        let config = self.parser.config;
        let value_for = |value: &str| {
            AttributeValue::new(value, flag.unwrap_or(config.attribute_values))
        };
        let selector = match op {
            '=' => AttributeSelector::Equals(name, value_for(&value)),
            '!' => AttributeSelector::NotEquals(name, value_for(&value)),
            '^' => AttributeSelector::PrefixMatch(name, value_for(&value)),
            '$' => AttributeSelector::SuffixMatch(name, value_for(&value)),
            '*' => AttributeSelector::SubstringMatch(name, value_for(&value)),
            _ => {
                let pattern = Pattern::compile(
                    self.parser.engine.as_ref(),
                    value.trim(),
                    flag.unwrap_or(config.patterns),
                )?;
                AttributeSelector::Regex(name, pattern)
            }
        };
        Ok(SimpleSelector::Attribute(selector))
    }

    /// A quoted value with an optional ` i`/` s` flag, or an unquoted value running to
    /// the closing bracket.
    fn parse_attribute_value(
        body: &mut Reader,
    ) -> Result<(String, Option<CaseSensitivity>), SelectorError> {
        match body.peek() {
            Some(quote @ ('"' | '\'')) => {
                let start = body.position();
                let _ = body.advance();
                let value = body
                    .consume_quoted(quote)
                    .ok_or_else(|| SelectorError::malformed(start, "unterminated quoted value"))?;
                let _ = body.consume_whitespace();
                let flag = match body.peek() {
                    None => None,
                    Some(c) => {
                        let flag = CaseSensitivity::from_flag(c)
                            .ok_or_else(|| body.error("unexpected text after attribute value"))?;
                        let _ = body.advance();
                        let _ = body.consume_whitespace();
                        Some(flag)
                    }
                };
                if !body.is_empty() {
                    return Err(body.error("unexpected text after attribute value"));
                }
                Ok((value, flag))
            }
            Some(_) => Ok((body.remainder().trim().to_owned(), None)),
            None => Err(body.error("expected an attribute value")),
        }
    }

    /// [§ 4 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
    fn parse_pseudo(&mut self) -> Result<SimpleSelector, SelectorError> {
        let start = self.reader.position();
        let _ = self.reader.advance();

        let written = self.reader.consume_while(is_ident_char);
        if written.is_empty() {
            return Err(SelectorError::malformed(start, "expected a pseudo-class name after `:`"));
        }
        let name: PseudoName = written.parse().map_err(|_| {
            SelectorError::malformed(start, format!("unknown pseudo-class `:{written}`"))
        })?;

        if self.reader.peek() != Some('(') {
            let pseudo = match name {
                PseudoName::Scope => PseudoClass::Scope,
                PseudoName::Root => PseudoClass::Root,
                PseudoName::FirstChild => PseudoClass::FirstChild,
                PseudoName::LastChild => PseudoClass::LastChild,
                PseudoName::OnlyChild => PseudoClass::OnlyChild,
                PseudoName::FirstOfType => PseudoClass::FirstOfType,
                PseudoName::LastOfType => PseudoClass::LastOfType,
                PseudoName::Empty => PseudoClass::Empty,
                _ => {
                    return Err(SelectorError::malformed(
                        start,
                        format!("`:{name}` requires an argument in parentheses"),
                    ));
                }
            };
            return Ok(SimpleSelector::PseudoClass(pseudo));
        }

        let open = self.reader.position();
        let _ = self.reader.advance();
        let structural = matches!(name, PseudoName::Has | PseudoName::Not);
        let raw = self.reader.chomp_balanced('(', ')', structural, open)?;
        let pseudo = self.parse_pseudo_argument(name, &raw, open + 1)?;
        Ok(SimpleSelector::PseudoClass(pseudo))
    }

    /// Interpret the raw text between the parentheses of `:name(…)`, which starts at
    /// character offset `base`.
    fn parse_pseudo_argument(
        &self,
        name: PseudoName,
        raw: &str,
        base: usize,
    ) -> Result<PseudoClass, SelectorError> {
        let pseudo = match name {
            PseudoName::Has => PseudoClass::Has(self.parser.parse_at(raw, base)?),
            PseudoName::Not => PseudoClass::Not(self.parser.parse_at(raw, base)?),
            PseudoName::Contains | PseudoName::ContainsOwn => {
                let text = unescape(raw).trim().to_lowercase();
                if text.is_empty() {
                    return Err(SelectorError::malformed(
                        base,
                        format!("`:{name}` requires text to search for"),
                    ));
                }
                if name == PseudoName::Contains {
                    PseudoClass::Contains(text)
                } else {
                    PseudoClass::ContainsOwn(text)
                }
            }
            PseudoName::Matches | PseudoName::MatchesOwn => {
                if raw.trim().is_empty() {
                    return Err(SelectorError::malformed(
                        base,
                        format!("`:{name}` requires a pattern"),
                    ));
                }
                let pattern =
                    Pattern::compile(self.parser.engine.as_ref(), raw, self.parser.config.patterns)?;
                if name == PseudoName::Matches {
                    PseudoClass::Matches(pattern)
                } else {
                    PseudoClass::MatchesOwn(pattern)
                }
            }
            PseudoName::Lt | PseudoName::Gt | PseudoName::Eq => {
                let index: usize = raw.trim().parse().map_err(|_| {
                    SelectorError::malformed(
                        base,
                        format!(
                            "`:{name}` requires a non-negative integer index, found `{}`",
                            raw.trim()
                        ),
                    )
                })?;
                match name {
                    PseudoName::Lt => PseudoClass::Lt(index),
                    PseudoName::Gt => PseudoClass::Gt(index),
                    _ => PseudoClass::Eq(index),
                }
            }
            _ => {
                return Err(SelectorError::malformed(
                    base - 1,
                    format!("`:{name}` takes no argument"),
                ));
            }
        };
        Ok(pseudo)
    }
}

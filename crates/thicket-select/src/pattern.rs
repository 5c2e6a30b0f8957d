//! The regular-expression capability.
//!
//! The engine never compiles patterns itself. A [`PatternEngine`] supplied by the host
//! turns pattern source into a [`TextPattern`]; [`RegexEngine`] is the default, backed
//! by the `regex` crate.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use regex::{Regex, RegexBuilder};

use crate::config::CaseSensitivity;
use crate::error::SelectorError;

/// A compiled pattern that can search text.
pub trait TextPattern: Send + Sync + fmt::Debug {
    /// Whether the pattern matches anywhere in `text` (search, not full match).
    fn is_match(&self, text: &str) -> bool;
}

/// Compiles pattern source on behalf of the selector parser.
pub trait PatternEngine: Send + Sync + fmt::Debug {
    /// Compile `source`, honouring `case` as the default case policy.
    ///
    /// # Errors
    ///
    /// Returns the engine's own error when `source` is not a valid pattern.
    fn compile(
        &self,
        source: &str,
        case: CaseSensitivity,
    ) -> Result<Box<dyn TextPattern>, Box<dyn Error + Send + Sync>>;
}

/// [`PatternEngine`] backed by [`regex::Regex`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexEngine;

impl PatternEngine for RegexEngine {
    fn compile(
        &self,
        source: &str,
        case: CaseSensitivity,
    ) -> Result<Box<dyn TextPattern>, Box<dyn Error + Send + Sync>> {
        let regex = RegexBuilder::new(source)
            .case_insensitive(case == CaseSensitivity::Insensitive)
            .build()?;
        Ok(Box::new(regex))
    }
}

impl TextPattern for Regex {
    fn is_match(&self, text: &str) -> bool {
        Self::is_match(self, text)
    }
}

/// A pattern compiled at parse time, kept with its source for display and comparison.
///
/// Two patterns are equal when their sources and case policies are equal.
#[derive(Clone)]
pub struct Pattern {
    source: String,
    case: CaseSensitivity,
    compiled: Arc<dyn TextPattern>,
}

impl Pattern {
    /// Compile `source` with `engine`.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError::InvalidPattern`] if the engine rejects the source.
    pub fn compile(
        engine: &dyn PatternEngine,
        source: &str,
        case: CaseSensitivity,
    ) -> Result<Self, SelectorError> {
        let compiled = engine
            .compile(source, case)
            .map_err(|err| SelectorError::InvalidPattern {
                pattern: source.to_owned(),
                message: err.to_string(),
            })?;
        Ok(Self {
            source: source.to_owned(),
            case,
            compiled: Arc::from(compiled),
        })
    }

    /// The pattern source as written in the selector.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The case policy the pattern was compiled with.
    #[must_use]
    pub const fn case(&self) -> CaseSensitivity {
        self.case
    }

    /// Whether the pattern matches anywhere in `text`.
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.compiled.is_match(text)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.case == other.case
    }
}

impl Eq for Pattern {}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pattern")
            .field("source", &self.source)
            .field("case", &self.case)
            .finish_non_exhaustive()
    }
}

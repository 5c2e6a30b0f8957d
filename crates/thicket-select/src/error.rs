//! Errors raised while compiling selector text.
//!
//! Evaluation itself never fails: a missing attribute or an element outside the
//! scope simply does not match.

use thiserror::Error;

/// Failure to turn selector text into a [`SelectorList`](crate::SelectorList).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    /// The text is not a well-formed selector.
    #[error("malformed selector at position {position}: {reason}")]
    Malformed {
        /// Character offset into the selector text where the problem was found.
        position: usize,
        /// Human-readable description of the problem.
        reason: String,
    },

    /// A `:matches`, `:matchesOwn` or `[attr~=…]` pattern was rejected by the pattern engine.
    #[error("invalid pattern `{pattern}`: {message}")]
    InvalidPattern {
        /// The pattern source as written.
        pattern: String,
        /// The engine's explanation.
        message: String,
    },
}

impl SelectorError {
    pub(crate) fn malformed(position: usize, reason: impl Into<String>) -> Self {
        Self::Malformed {
            position,
            reason: reason.into(),
        }
    }

    /// The character offset of a syntax error, `None` for pattern errors.
    #[must_use]
    pub const fn position(&self) -> Option<usize> {
        match self {
            Self::Malformed { position, .. } => Some(*position),
            Self::InvalidPattern { .. } => None,
        }
    }
}

//! Matching policy knobs.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Whether a comparison distinguishes upper and lower case.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum CaseSensitivity {
    /// `Foo` and `foo` differ.
    Sensitive,
    /// `Foo` and `foo` are the same.
    Insensitive,
}

impl CaseSensitivity {
    /// The attribute-selector flag letter for this policy (`s` or `i`).
    #[must_use]
    pub const fn flag(self) -> char {
        match self {
            Self::Sensitive => 's',
            Self::Insensitive => 'i',
        }
    }

    /// Parse an attribute-selector flag letter.
    #[must_use]
    pub const fn from_flag(flag: char) -> Option<Self> {
        match flag {
            's' | 'S' => Some(Self::Sensitive),
            'i' | 'I' => Some(Self::Insensitive),
            _ => None,
        }
    }
}

/// Parser configuration.
///
/// Deserialises from JSON such as `{"attribute_values": "sensitive"}`; missing fields
/// take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Policy for `=`, `!=`, `^=`, `$=` and `*=` attribute values written without an
    /// explicit ` i`/` s` flag. Defaults to insensitive, so `[title=foo]` matches `Title=Foo`.
    pub attribute_values: CaseSensitivity,

    /// Policy handed to the pattern engine for `:matches`, `:matchesOwn` and `[attr~=…]`.
    /// Defaults to sensitive; an inline `(?i)` still switches a single pattern.
    pub patterns: CaseSensitivity,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            attribute_values: CaseSensitivity::Insensitive,
            patterns: CaseSensitivity::Sensitive,
        }
    }
}

//! Tag capabilities.
//!
//! A fixed registry of well-known HTML tags, built once per process. Names that are
//! not registered get a synthesized generic tag that can go anywhere and hold anything.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use crate::TagError;

/// Tags that are block level and may hold block and inline content.
const BLOCK_TAGS: &[&str] = &[
    "html", "head", "body", "frameset", "script", "noscript", "style", "meta", "link", "title",
    "frame", "noframes", "section", "nav", "aside", "hgroup", "header", "footer", "p", "h1", "h2",
    "h3", "h4", "h5", "h6", "ul", "ol", "pre", "div", "blockquote", "hr", "address", "figure",
    "figcaption", "form", "fieldset", "ins", "del", "s", "dl", "dt", "dd", "li", "table", "caption",
    "thead", "tfoot", "tbody", "colgroup", "col", "tr", "th", "td", "video", "audio", "canvas",
    "details", "menu", "plaintext", "template", "article", "main", "svg", "math",
];

/// Tags that are inline and may only hold inline content.
const INLINE_TAGS: &[&str] = &[
    "object", "base", "font", "tt", "i", "b", "u", "big", "small", "em", "strong", "dfn", "code",
    "samp", "kbd", "var", "cite", "abbr", "time", "acronym", "mark", "ruby", "rt", "rp", "a", "img",
    "br", "wbr", "map", "q", "sub", "sup", "bdo", "iframe", "embed", "span", "input", "select",
    "textarea", "label", "button", "optgroup", "option", "legend", "datalist", "keygen", "output",
    "progress", "meter", "area", "param", "source", "track", "summary", "command", "device",
    "basefont", "bgsound", "menuitem", "data", "bdi",
];

/// Tags that can hold nothing, e.g. `img`.
const EMPTY_TAGS: &[&str] = &[
    "meta", "link", "base", "frame", "img", "br", "wbr", "embed", "hr", "input", "keygen", "col",
    "command", "device", "area", "basefont", "bgsound", "menuitem", "param", "source", "track",
];

/// Block tags that are nonetheless formatted inline.
const FORMAT_AS_INLINE_TAGS: &[&str] = &[
    "title", "a", "p", "h1", "h2", "h3", "h4", "h5", "h6", "pre", "address", "li", "th", "td",
    "script", "style", "ins", "del", "s",
];

/// `script` is absent: it holds data, which always preserves whitespace.
const PRESERVE_WHITESPACE_TAGS: &[&str] = &["pre", "plaintext", "title", "textarea"];

const FORM_LISTED_TAGS: &[&str] = &[
    "button", "fieldset", "input", "keygen", "object", "output", "select", "textarea",
];

const FORM_SUBMIT_TAGS: &[&str] = &["input", "keygen", "object", "select", "textarea"];

static REGISTRY: OnceLock<HashMap<&'static str, Tag>> = OnceLock::new();

/// Populate the tag registry.
///
/// Lookups initialise the registry on first use as well, so calling this is only needed
/// to move the one-time cost to start-up.
pub fn init_registry() {
    let _ = registry();
}

fn registry() -> &'static HashMap<&'static str, Tag> {
    REGISTRY.get_or_init(build_registry)
}

fn build_registry() -> HashMap<&'static str, Tag> {
    let mut tags = HashMap::with_capacity(BLOCK_TAGS.len() + INLINE_TAGS.len());

    for &name in BLOCK_TAGS {
        let _ = tags.insert(name, Tag::generic(name, true));
    }
    for &name in INLINE_TAGS {
        let mut tag = Tag::generic(name, false);
        tag.can_contain_block = false;
        tag.format_as_block = false;
        let _ = tags.insert(name, tag);
    }

    let mut apply = |names: &[&str], modify: fn(&mut Tag)| {
        for name in names {
            if let Some(tag) = tags.get_mut(*name) {
                modify(tag);
            }
        }
    };
    apply(EMPTY_TAGS, |tag| {
        tag.can_contain_block = false;
        tag.can_contain_inline = false;
        tag.empty = true;
    });
    apply(FORMAT_AS_INLINE_TAGS, |tag| tag.format_as_block = false);
    apply(PRESERVE_WHITESPACE_TAGS, |tag| tag.preserve_whitespace = true);
    apply(FORM_LISTED_TAGS, |tag| tag.form_listed = true);
    apply(FORM_SUBMIT_TAGS, |tag| tag.form_submittable = true);

    tags
}

/// Trim and lower-case a tag name, rejecting blank names.
fn normalize(name: &str) -> Result<String, TagError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(TagError::EmptyName);
    }
    Ok(trimmed.to_lowercase())
}

/// HTML tag capabilities.
///
/// Two tags are equal when their names and every capability flag agree.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag {
    name: String,
    block: bool,
    format_as_block: bool,
    can_contain_block: bool,
    can_contain_inline: bool,
    empty: bool,
    preserve_whitespace: bool,
    form_listed: bool,
    form_submittable: bool,
}

impl Tag {
    fn generic(name: &str, block: bool) -> Self {
        Self {
            name: name.to_owned(),
            block,
            format_as_block: true,
            can_contain_block: true,
            can_contain_inline: true,
            empty: false,
            preserve_whitespace: false,
            form_listed: false,
            form_submittable: false,
        }
    }

    /// Look up a tag by name, case-insensitively.
    ///
    /// Registered tags are borrowed from the shared registry; an unknown name yields a new
    /// generic inline tag that is not added to the registry.
    ///
    /// # Errors
    ///
    /// Returns [`TagError::EmptyName`] if the name is blank.
    pub fn value_of(name: &str) -> Result<Cow<'static, Self>, TagError> {
        let tags = registry();
        if let Some(tag) = tags.get(name) {
            return Ok(Cow::Borrowed(tag));
        }
        let normalized = normalize(name)?;
        Ok(tags.get(normalized.as_str()).map_or_else(
            || Cow::Owned(Self::generic(&normalized, false)),
            Cow::Borrowed,
        ))
    }

    /// Check whether a name refers to a registered tag, after trimming and lower-casing.
    #[must_use]
    pub fn is_known_tag(name: &str) -> bool {
        normalize(name).is_ok_and(|normalized| registry().contains_key(normalized.as_str()))
    }

    /// The tag's lower-case name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this tag is registered rather than synthesized for an unknown name.
    #[must_use]
    pub fn is_known(&self) -> bool {
        registry().contains_key(self.name.as_str())
    }

    /// Block-level tag.
    #[must_use]
    pub const fn is_block(&self) -> bool {
        self.block
    }

    /// Inline tag; the complement of [`Tag::is_block`].
    #[must_use]
    pub const fn is_inline(&self) -> bool {
        !self.block
    }

    /// Whether the tag should be formatted as a block when serialised.
    #[must_use]
    pub const fn format_as_block(&self) -> bool {
        self.format_as_block
    }

    /// Whether the tag can hold block-level children.
    #[must_use]
    pub const fn can_contain_block(&self) -> bool {
        self.can_contain_block
    }

    /// Whether the tag can hold inline children (only raw data otherwise).
    #[must_use]
    pub const fn can_contain_inline(&self) -> bool {
        self.can_contain_inline
    }

    /// Data-only tag: holds neither inline content nor is it empty.
    #[must_use]
    pub const fn is_data(&self) -> bool {
        !self.can_contain_inline && !self.empty
    }

    /// Tag that can hold nothing, e.g. `img`.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.empty
    }

    /// Whether the tag is written self-closing (`<br />`).
    ///
    /// Only empty tags are: the tree is built from node descriptions, not markup, so an
    /// unknown tag has no way to declare itself self-closing and no separate flag is kept.
    #[must_use]
    pub const fn is_self_closing(&self) -> bool {
        self.empty
    }

    /// Whether child text keeps its whitespace, e.g. `pre`.
    #[must_use]
    pub const fn preserve_whitespace(&self) -> bool {
        self.preserve_whitespace
    }

    /// A control associated with a form, e.g. `input`, `output`.
    #[must_use]
    pub const fn is_form_listed(&self) -> bool {
        self.form_listed
    }

    /// A control submitted with a form, e.g. `input`, `select`.
    #[must_use]
    pub const fn is_form_submittable(&self) -> bool {
        self.form_submittable
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

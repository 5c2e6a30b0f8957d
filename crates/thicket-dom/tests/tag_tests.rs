//! Tests for the tag registry and tag lookup.

use std::borrow::Cow;

use thicket_dom::{Tag, TagError, tag::init_registry};

#[test]
fn test_lookup_normalises_name() {
    init_registry();
    let tag = Tag::value_of("  DIV ").unwrap();
    assert_eq!(tag.name(), "div");
    assert!(tag.is_known());
    assert!(matches!(tag, Cow::Borrowed(_)));
    assert_eq!(tag.to_string(), "div");
}

#[test]
fn test_block_tag_flags() {
    let div = Tag::value_of("div").unwrap();
    assert!(div.is_block());
    assert!(!div.is_inline());
    assert!(div.format_as_block());
    assert!(div.can_contain_block());
    assert!(div.can_contain_inline());
    assert!(!div.is_empty());
    assert!(!div.is_self_closing());

    // Block, but formatted inline
    let p = Tag::value_of("p").unwrap();
    assert!(p.is_block());
    assert!(!p.format_as_block());
}

#[test]
fn test_inline_tag_flags() {
    let span = Tag::value_of("span").unwrap();
    assert!(span.is_inline());
    assert!(!span.can_contain_block());
    assert!(span.can_contain_inline());
    assert!(!span.is_data());
}

#[test]
fn test_empty_tags_are_self_closing() {
    for name in ["img", "br", "hr", "input", "meta"] {
        let tag = Tag::value_of(name).unwrap();
        assert!(tag.is_empty(), "{name} should be empty");
        assert!(tag.is_self_closing(), "{name} should be self closing");
        assert!(!tag.can_contain_inline(), "{name} should hold nothing");
        assert!(!tag.is_data(), "{name} is empty, not data");
    }
}

#[test]
fn test_only_empty_tags_are_self_closing() {
    let unknown = Tag::value_of("x-widget").unwrap();
    assert!(!unknown.is_empty());
    assert!(!unknown.is_self_closing());
    assert!(!Tag::value_of("span").unwrap().is_self_closing());
}

#[test]
fn test_whitespace_and_form_flags() {
    assert!(Tag::value_of("pre").unwrap().preserve_whitespace());
    assert!(Tag::value_of("textarea").unwrap().preserve_whitespace());
    assert!(!Tag::value_of("div").unwrap().preserve_whitespace());

    let input = Tag::value_of("input").unwrap();
    assert!(input.is_form_listed());
    assert!(input.is_form_submittable());

    let button = Tag::value_of("button").unwrap();
    assert!(button.is_form_listed());
    assert!(!button.is_form_submittable());

    assert!(!Tag::value_of("div").unwrap().is_form_listed());
}

#[test]
fn test_unknown_tag_is_synthesized() {
    let custom = Tag::value_of("X-Widget").unwrap();
    assert_eq!(custom.name(), "x-widget");
    assert!(!custom.is_known());
    assert!(matches!(custom, Cow::Owned(_)));
    assert!(custom.is_inline());
    assert!(custom.can_contain_block());
    assert!(custom.can_contain_inline());
    assert!(!custom.is_empty());

    // Equal by value, still not registered
    assert_eq!(custom, Tag::value_of("x-widget").unwrap());
    assert!(!Tag::is_known_tag("x-widget"));
}

#[test]
fn test_is_known_tag() {
    assert!(Tag::is_known_tag("div"));
    assert!(Tag::is_known_tag(" Span "));
    assert!(!Tag::is_known_tag("blink-blink"));
    assert!(!Tag::is_known_tag(""));
}

#[test]
fn test_empty_name_is_an_error() {
    assert_eq!(Tag::value_of("").unwrap_err(), TagError::EmptyName);
    assert_eq!(Tag::value_of("   ").unwrap_err(), TagError::EmptyName);
    assert_eq!(TagError::EmptyName.to_string(), "tag name must not be empty");
}

#[test]
fn test_registered_and_synthesized_tags_differ() {
    // A generic tag named like a registered one only equals it if every flag agrees
    let div = Tag::value_of("div").unwrap();
    let span = Tag::value_of("span").unwrap();
    assert_ne!(div, span);
    assert_eq!(div, Tag::value_of("DIV").unwrap());
}

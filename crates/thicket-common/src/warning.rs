//! Diagnostics with colored terminal output.
//!
//! Provides deduplication so a tree with a thousand unknown `<x-widget>` elements
//! reports the tag once. Used by the tree builder and the query CLI.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use owo_colors::OwoColorize;

/// Global set of warnings we've already printed (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about something the caller tolerated but the user should know about
/// (prints once per unique message).
///
/// Returns `true` if the message was printed, `false` if it was a repeat.
///
/// # Example
/// ```ignore
/// warn_once("DOM", "unknown tag <x-widget>, treated as generic inline");
/// ```
pub fn warn_once(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    let should_print = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if should_print {
        eprintln!("{}", format!("[thicket {component}] ⚠ {message}").yellow());
    }
    should_print
}

/// Clear all recorded warnings (call before processing a new document)
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

//! Character cursor over selector text.

use crate::error::SelectorError;

/// Check if a character can continue an identifier.
/// [§ 4.3.9 ident code point](https://www.w3.org/TR/css-syntax-3/#ident-code-point)
pub(crate) const fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-' || !c.is_ascii()
}

/// Tag names additionally allow the namespace separator, `svg|rect`.
pub(crate) const fn is_tag_char(c: char) -> bool {
    is_ident_char(c) || c == '|'
}

/// A cursor over the characters of one selector (or one nested argument).
///
/// Positions are character offsets into the outermost selector text: a reader for
/// the argument of `:has(…)` starts at the offset of the argument.
pub(crate) struct Reader {
    chars: Vec<char>,
    pos: usize,
    base: usize,
}

impl Reader {
    pub(crate) fn new(text: &str, base: usize) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
            base,
        }
    }

    /// Absolute character offset of the next character.
    pub(crate) const fn position(&self) -> usize {
        self.base + self.pos
    }

    pub(crate) fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    pub(crate) fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.pos >= self.chars.len()
    }

    /// Skip whitespace, reporting whether any was skipped.
    pub(crate) fn consume_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    pub(crate) fn consume_while(&mut self, accept: impl Fn(char) -> bool) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek().filter(|&c| accept(c)) {
            out.push(c);
            self.pos += 1;
        }
        out
    }

    /// Everything not yet consumed.
    pub(crate) fn remainder(&mut self) -> String {
        let rest = self.chars[self.pos..].iter().collect();
        self.pos = self.chars.len();
        rest
    }

    /// An error at the current position.
    pub(crate) fn error(&self, reason: impl Into<String>) -> SelectorError {
        SelectorError::malformed(self.position(), reason)
    }

    /// Consume up to the `close` that balances an already-consumed `open`, returning
    /// the text in between unaltered.
    ///
    /// Backslash escapes are skipped over. With `quotes`, brackets inside single or
    /// double quotes are not counted; quotes only delimit text inside an attribute
    /// bracket, so `:has(p:contains(it's))` keeps its apostrophe. `open_position` is
    /// reported on failure.
    pub(crate) fn chomp_balanced(
        &mut self,
        open: char,
        close: char,
        quotes: bool,
        open_position: usize,
    ) -> Result<String, SelectorError> {
        let mut depth = 1usize;
        let mut brackets = usize::from(open == '[');
        let mut out = String::new();
        while let Some(c) = self.advance() {
            match c {
                '[' => brackets += 1,
                ']' => brackets = brackets.saturating_sub(1),
                _ => {}
            }
            match c {
                '\\' => {
                    out.push(c);
                    if let Some(escaped) = self.advance() {
                        out.push(escaped);
                    }
                }
                '"' | '\'' if quotes && brackets > 0 => {
                    let quote_position = self.position() - 1;
                    out.push(c);
                    loop {
                        match self.advance() {
                            None => {
                                return Err(SelectorError::malformed(
                                    quote_position,
                                    "unterminated quoted value",
                                ));
                            }
                            Some('\\') => {
                                out.push('\\');
                                if let Some(escaped) = self.advance() {
                                    out.push(escaped);
                                }
                            }
                            Some(inner) => {
                                out.push(inner);
                                if inner == c {
                                    break;
                                }
                            }
                        }
                    }
                }
                _ if c == close => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(out);
                    }
                    out.push(c);
                }
                _ => {
                    if c == open {
                        depth += 1;
                    }
                    out.push(c);
                }
            }
        }
        Err(SelectorError::malformed(
            open_position,
            format!("unbalanced `{open}`: missing `{close}`"),
        ))
    }

    /// Consume a quoted string after its opening `quote`, returning the unescaped value,
    /// or `None` if the closing quote is missing.
    ///
    /// Only `\\` and an escaped `quote` are escapes; any other backslash is kept.
    pub(crate) fn consume_quoted(&mut self, quote: char) -> Option<String> {
        let mut out = String::new();
        loop {
            match self.advance()? {
                '\\' => match self.advance() {
                    Some(escaped) if escaped == quote || escaped == '\\' => out.push(escaped),
                    Some(other) => {
                        out.push('\\');
                        out.push(other);
                    }
                    None => out.push('\\'),
                },
                c if c == quote => return Some(out),
                c => out.push(c),
            }
        }
    }
}

/// Drop single backslashes, keeping the character they escape (`\)` becomes `)`).
pub(crate) fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }
    out
}

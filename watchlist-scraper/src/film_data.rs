//! Parser for the `var filmData = { ... }` literal embedded in film pages.
//!
//! The literal is read as text by a small scanner: keys may be identifiers
//! or quoted strings, values may be quoted strings, numbers, keywords or
//! other bare words. Nested objects and arrays are skipped. Anything the
//! scanner does not understand is skipped up to the next `,`. Nothing from
//! the page is ever executed.

use std::collections::HashMap;
use std::iter::Peekable;
use std::str::Chars;

const MARKER: &str = "var filmData";

/// Scalar fields read from a film page's `filmData` object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilmData {
    fields: HashMap<String, String>,
}

impl FilmData {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Letterboxd's internal film id.
    pub fn id(&self) -> Option<&str> {
        self.get("id")
    }

    /// Display title.
    pub fn name(&self) -> Option<&str> {
        self.get("name")
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Find `var filmData = {...}` in a script body and parse the literal.
pub fn parse_film_data_script(script: &str) -> Option<FilmData> {
    let start = script.find(MARKER)?;
    let rest = script[start + MARKER.len()..].trim_start();
    let rest = rest.strip_prefix('=')?;
    parse_object_literal(rest)
}

/// Parse a flat object literal that starts at `{` (leading whitespace is
/// allowed). Text after the closing brace is ignored. Returns `None` if the
/// literal is not terminated.
pub fn parse_object_literal(src: &str) -> Option<FilmData> {
    let mut cur = Cursor {
        chars: src.chars().peekable(),
    };
    cur.skip_ws();
    if cur.bump()? != '{' {
        return None;
    }

    let mut fields = HashMap::new();
    loop {
        cur.skip_ws();
        match cur.peek()? {
            '}' => {
                cur.bump();
                return Some(FilmData { fields });
            }
            ',' => {
                cur.bump();
                continue;
            }
            _ => {}
        }

        let key = cur.key();
        cur.skip_ws();
        if let Some(key) = key {
            if cur.peek()? == ':' {
                cur.bump();
                cur.skip_ws();
                if let Some(value) = cur.value()? {
                    fields.insert(key, value);
                }
            }
        }

        // Consume the separator along with anything we could not read.
        if cur.skip_entry()? == '}' {
            return Some(FilmData { fields });
        }
    }
}

struct Cursor<'a> {
    chars: Peekable<Chars<'a>>,
}

impl Cursor<'_> {
    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn bump(&mut self) -> Option<char> {
        self.chars.next()
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn key(&mut self) -> Option<String> {
        match self.peek()? {
            q @ ('"' | '\'') => {
                self.bump();
                self.quoted(q)
            }
            c if is_ident_char(c) => {
                let mut key = String::new();
                while let Some(c) = self.peek().filter(|c| is_ident_char(*c)) {
                    key.push(c);
                    self.bump();
                }
                Some(key)
            }
            _ => None,
        }
    }

    /// Read one value. The outer `None` means the input ended; the inner
    /// `None` means the value exists but is not a usable scalar.
    fn value(&mut self) -> Option<Option<String>> {
        match self.peek()? {
            q @ ('"' | '\'' | '`') => {
                self.bump();
                self.quoted(q).map(Some)
            }
            '{' | '[' => {
                self.skip_nested()?;
                Some(None)
            }
            _ => {
                let word = self.bare();
                let word = word.trim();
                Some(match word {
                    "" | "null" | "undefined" => None,
                    w => Some(w.to_string()),
                })
            }
        }
    }

    /// Read a quoted string whose opening quote was already consumed.
    fn quoted(&mut self, quote: char) -> Option<String> {
        let mut out = String::new();
        loop {
            match self.bump()? {
                '\\' => match self.bump()? {
                    'n' => out.push('\n'),
                    'r' => out.push('\r'),
                    't' => out.push('\t'),
                    'u' => {
                        let mut hex = String::new();
                        while hex.len() < 4 {
                            match self.peek().filter(char::is_ascii_hexdigit) {
                                Some(h) => {
                                    hex.push(h);
                                    self.bump();
                                }
                                None => break,
                            }
                        }
                        if let Some(c) = u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32)
                        {
                            out.push(c);
                        }
                    }
                    other => out.push(other),
                },
                c if c == quote => return Some(out),
                c => out.push(c),
            }
        }
    }

    /// Read an unquoted value up to the next top-level `,` or `}`. Quoted
    /// strings inside the expression are copied verbatim.
    fn bare(&mut self) -> String {
        let mut out = String::new();
        let mut depth = 0usize;
        while let Some(c) = self.peek() {
            match c {
                ',' | '}' if depth == 0 => break,
                '"' | '\'' | '`' => {
                    self.bump();
                    out.push(c);
                    self.raw_quoted(c, &mut out);
                    continue;
                }
                '(' | '[' | '{' => depth += 1,
                ')' | ']' | '}' => depth = depth.saturating_sub(1),
                _ => {}
            }
            out.push(c);
            self.bump();
        }
        out
    }

    /// Copy a quoted string, escapes and closing quote included, without
    /// decoding it.
    fn raw_quoted(&mut self, quote: char, out: &mut String) {
        while let Some(c) = self.bump() {
            out.push(c);
            if c == '\\' {
                if let Some(escaped) = self.bump() {
                    out.push(escaped);
                }
            } else if c == quote {
                return;
            }
        }
    }

    /// Skip a balanced `{...}` or `[...]` value.
    fn skip_nested(&mut self) -> Option<()> {
        let mut depth = 0usize;
        loop {
            match self.bump()? {
                q @ ('"' | '\'' | '`') => {
                    self.quoted(q)?;
                }
                '{' | '[' | '(' => depth += 1,
                '}' | ']' | ')' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Some(());
                    }
                }
                _ => {}
            }
        }
    }

    /// Skip to and consume the next top-level `,` or `}`, returning it.
    fn skip_entry(&mut self) -> Option<char> {
        let mut depth = 0usize;
        loop {
            let c = self.bump()?;
            match c {
                '"' | '\'' | '`' => {
                    self.quoted(c)?;
                }
                '{' | '[' | '(' => depth += 1,
                '}' | ']' | ')' if depth > 0 => depth -= 1,
                ',' | '}' if depth == 0 => return Some(c),
                _ => {}
            }
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

#[cfg(test)]
#[path = "tests/film_data_tests.rs"]
mod tests;

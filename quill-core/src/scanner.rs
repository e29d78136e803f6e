//! Delimiter scanner.
//!
//! `Hi <%= it.name -%>!` = `Match { literal: "Hi ", prefix: '=', content: "it.name", trim_after: Newline }`
//! with `"!"` left as [`Scanner::remainder`].
//!
//! Inside a tag, quoted strings (`'`, `"` and `` ` ``) and `/* */` comments are opaque, a
//! close delimiter inside them does not end the tag.
use crate::{Config, Diagnostic, Error, Result, Trim};

/// A delimited tag and the static content preceding it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match<'a> {
    /// Static content between the previous tag and this one.
    pub literal: &'a str,
    /// Trim marker following the open delimiter, trims `literal`.
    pub trim_before: Option<Trim>,
    /// Kind prefix.
    pub prefix: Option<char>,
    /// Tag content, without surrounding whitespace.
    pub content: &'a str,
    /// Trim marker preceding the close delimiter, trims the next static content.
    pub trim_after: Option<Trim>,
    /// Offset of the open delimiter.
    pub offset: usize,
}

/// Template source scanner.
///
/// Yields one [`Match`] per tag in document order. After the scanner is exhausted, the
/// static content after the last tag is available via [`Scanner::remainder`].
pub struct Scanner<'a> {
    source: &'a str,
    config: &'a Config,

    // scanner states
    cursor: usize,
    done: bool,
}

impl<'a> Scanner<'a> {
    /// Create new [`Scanner`].
    pub fn new(source: &'a str, config: &'a Config) -> Result<Self> {
        if config.tags.open.is_empty() || config.tags.close.is_empty() {
            return Err(Error::Config("tag delimiters must not be empty"));
        }
        Ok(Self { source, config, cursor: 0, done: false })
    }

    /// Static content after the last scanned tag.
    pub fn remainder(&self) -> &'a str {
        &self.source[self.cursor..]
    }

    fn scan(&mut self) -> Result<Option<Match<'a>>> {
        let source = self.source;
        let Some(found) = source[self.cursor..].find(self.config.tags.open.as_str()) else {
            return Ok(None);
        };

        let offset = self.cursor + found;
        let literal = &source[self.cursor..offset];

        let (index, trim_before, prefix) = self.open_tag(offset + self.config.tags.open.len());
        let start = skip_whitespace(source, index);

        let Some((end, trim_after, next)) = self.close_tag(start) else {
            return Diagnostic::fail("unclosed tag", source, offset);
        };

        self.cursor = next;

        Ok(Some(Match {
            literal,
            trim_before,
            prefix,
            content: &source[start..end],
            trim_after,
            offset,
        }))
    }

    /// `[trim marker] [whitespace] [prefix]`, returns the index after them.
    fn open_tag(&self, index: usize) -> (usize, Option<Trim>, Option<char>) {
        let prefixes = &self.config.prefixes;
        let marker = peek(self.source, index).and_then(|ch| Some((ch, Trim::from_marker(ch)?)));
        let after_marker = match marker {
            Some((ch, _)) => index + ch.len_utf8(),
            None => index,
        };
        let at = skip_whitespace(self.source, after_marker);

        match (peek(self.source, at), marker) {
            (Some(ch), _) if prefixes.contains(ch) => (at + ch.len_utf8(), marker.map(|e| e.1), Some(ch)),
            // the marker itself is a configured prefix, e.g. `_` for execute
            (_, Some((ch, _))) if prefixes.contains(ch) => (after_marker, None, Some(ch)),
            (_, Some((_, trim))) => (at, Some(trim), None),
            (_, None) => (at, None, None),
        }
    }

    /// Returns content end, closing trim marker and the index after the close delimiter.
    fn close_tag(&self, mut index: usize) -> Option<(usize, Option<Trim>, usize)> {
        let source = self.source;
        loop {
            if let Some(found) = self.closes_at(index) {
                return Some(found);
            }

            index = match peek(source, index)? {
                quote @ ('\'' | '"') => skip_quoted(source, index, quote, false).unwrap_or(index + 1),
                '`' => skip_quoted(source, index, '`', true).unwrap_or(index + 1),
                '/' if source[index..].starts_with("/*") => match source[index + 2..].find("*/") {
                    Some(end) => index + 2 + end + 2,
                    None => index + 1,
                },
                ch => index + ch.len_utf8(),
            };
        }
    }

    /// `[whitespace] [trim marker] <close>` at given index
    fn closes_at(&self, index: usize) -> Option<(usize, Option<Trim>, usize)> {
        let close = self.config.tags.close.as_str();
        let at = skip_whitespace(self.source, index);
        let rest = &self.source[at..];

        if rest.starts_with(close) {
            return Some((index, None, at + close.len()));
        }

        let trim = rest.chars().next().and_then(Trim::from_marker)?;
        match rest[1..].starts_with(close) {
            true => Some((index, Some(trim), at + 1 + close.len())),
            false => None,
        }
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<Match<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.scan() {
            Ok(Some(found)) => Some(Ok(found)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

fn peek(source: &str, index: usize) -> Option<char> {
    source.get(index..)?.chars().next()
}

fn skip_whitespace(source: &str, index: usize) -> usize {
    source[index..]
        .find(|ch: char| !ch.is_whitespace())
        .map_or(source.len(), |i| index + i)
}

/// Returns the index after the closing quote.
///
/// Unless `multiline`, a line break ends the search, the quote is then not a string opener.
fn skip_quoted(source: &str, start: usize, quote: char, multiline: bool) -> Option<usize> {
    let mut chars = source[start + 1..].char_indices();
    while let Some((i, ch)) = chars.next() {
        match ch {
            '\\' => {
                chars.next();
            }
            '\n' | '\r' if !multiline => return None,
            ch if ch == quote => return Some(start + 1 + i + 1),
            _ => {}
        }
    }
    None
}

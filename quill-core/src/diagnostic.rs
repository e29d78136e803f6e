//! Line and column annotated error messages.
//!
//! ```text
//! unclosed tag at line 2 col 4:
//!
//!   Hi <%= name
//!      ^
//! ```
use std::fmt;

use crate::{Error, Result};

/// A message located at an offset of some source text.
///
/// Which text the offset refers to is decided by whoever raises it: [`Error::Parse`] carries
/// template offsets, [`Error::Syntax`] carries offsets into the generated artifact body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    message: String,
    offset: usize,
    line: usize,
    column: usize,
    snippet: String,
}

impl Diagnostic {
    /// Locate `offset` (a byte offset, clamped to the source length) in `source`.
    pub fn new(message: impl Into<String>, source: &str, offset: usize) -> Self {
        let mut offset = offset.min(source.len());
        while !source.is_char_boundary(offset) {
            offset -= 1;
        }

        let before = &source[..offset];
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let line = before.matches('\n').count() + 1;
        let column = before[line_start..].chars().count() + 1;
        let snippet = source[line_start..]
            .split('\n')
            .next()
            .unwrap_or_default()
            .trim_end_matches('\r');

        Self {
            message: message.into(),
            offset,
            line,
            column,
            snippet: snippet.to_owned(),
        }
    }

    /// Raise a [`Error::Parse`] located at `offset` of `source`.
    pub fn fail<T>(message: impl Into<String>, source: &str, offset: usize) -> Result<T> {
        Err(Error::Parse(Self::new(message, source, offset)))
    }

    /// The raw message, without location.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// 1-based line number.
    pub fn line(&self) -> usize {
        self.line
    }

    /// 1-based column number, counted in characters.
    pub fn column(&self) -> usize {
        self.column
    }

    /// The full source line containing the offset.
    pub fn snippet(&self) -> &str {
        &self.snippet
    }

    /// `=` as long as the `<message> at line L col C:` heading, separates the diagnostic from
    /// the text it refers to.
    pub fn ruler(&self) -> String {
        let heading = format!("{} at line {} col {}:", self.message, self.line, self.column);
        "=".repeat(heading.chars().count())
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at line {} col {}:\n\n  {}\n  {:pad$}^",
            self.message,
            self.line,
            self.column,
            self.snippet,
            "",
            pad = self.column - 1,
        )
    }
}

#[cfg(test)]
mod test {
    use super::Diagnostic;

    #[test]
    fn first_line() {
        let diag = Diagnostic::new("unclosed tag", "Hi <%= name", 3);
        assert_eq!(diag.line(), 1);
        assert_eq!(diag.column(), 4);
        assert_eq!(diag.snippet(), "Hi <%= name");
        assert_eq!(diag.to_string(), "unclosed tag at line 1 col 4:\n\n  Hi <%= name\n     ^");
        assert_eq!(diag.ruler(), "=".repeat("unclosed tag at line 1 col 4:".len()));
    }

    #[test]
    fn later_line() {
        let src = "one\r\ntwo\nthree <% x";
        let diag = Diagnostic::new("oops", src, src.find("<%").unwrap());
        assert_eq!(diag.line(), 3);
        assert_eq!(diag.column(), 7);
        assert_eq!(diag.snippet(), "three <% x");
    }

    #[test]
    fn offset_past_end() {
        let diag = Diagnostic::new("eof", "ab\ncd", 99);
        assert_eq!(diag.offset(), 5);
        assert_eq!((diag.line(), diag.column()), (2, 3));
    }

    #[test]
    fn multibyte_column() {
        let src = "héllo <%";
        let diag = Diagnostic::new("x", src, src.find('<').unwrap());
        assert_eq!(diag.column(), 7);
    }
}

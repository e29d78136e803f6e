//! Script tokenizer.
//!
//! `__out += escape(it.name)` = `Ident("__out") Punct("+=") Ident("escape") Punct("(") ...`
use super::ScriptError;

/// Punctuations, longest first.
const PUNCTS: [&str; 29] = [
    "??", "==", "!=", "<=", ">=", "&&", "||", "+=",
    "(", ")", "[", "]", "{", "}", ",", ":", ";", ".",
    "+", "-", "*", "/", "%", "!", "=", "<", ">", "?", "|",
];

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// word identifier, keywords included
    Ident(String),
    /// literal integer
    Int(i64),
    /// literal float
    Float(f64),
    /// literal string, escapes resolved
    Str(String),
    /// punctuation
    Punct(&'static str),
    /// end of input
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub offset: usize,
    /// A line break precedes this token.
    pub line_break: bool,
}

impl Token {
    pub fn is_punct(&self, punct: &str) -> bool {
        matches!(self.kind, TokenKind::Punct(p) if p == punct)
    }

    pub fn is_ident(&self, ident: &str) -> bool {
        matches!(&self.kind, TokenKind::Ident(i) if i == ident)
    }
}

pub struct Tokenizer<'a> {
    source: &'a str,
    offset: usize,
    line_break: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source, offset: 0, line_break: false }
    }

    /// Collect all tokens, the last one is always [`TokenKind::Eof`].
    pub fn tokenize(mut self) -> Result<Vec<Token>, ScriptError> {
        let mut tokens = vec![];
        loop {
            let token = self.next_token()?;
            let eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if eof {
                break Ok(tokens);
            }
        }
    }

    fn peek(&self) -> Option<char> {
        self.source[self.offset..].chars().next()
    }

    fn rest(&self) -> &'a str {
        &self.source[self.offset..]
    }

    fn next_token(&mut self) -> Result<Token, ScriptError> {
        self.skip_trivia()?;

        let offset = self.offset;
        let line_break = std::mem::take(&mut self.line_break);

        let kind = match self.peek() {
            None => TokenKind::Eof,
            Some(ch) if ch.is_alphabetic() || ch == '_' || ch == '$' => self.identifier(),
            Some(ch) if ch.is_ascii_digit() => self.digit(),
            Some(quote @ ('\'' | '"' | '`')) => self.litstr(quote)?,
            Some(ch) => match PUNCTS.into_iter().find(|p| self.rest().starts_with(p)) {
                Some(punct) => {
                    self.offset += punct.len();
                    TokenKind::Punct(punct)
                }
                None => return Err(ScriptError::new(format!("unexpected character `{ch}`"), offset)),
            },
        };

        Ok(Token { kind, offset, line_break })
    }

    /// whitespace and comments
    fn skip_trivia(&mut self) -> Result<(), ScriptError> {
        loop {
            let rest = self.rest();
            match self.peek() {
                Some(ch) if ch.is_whitespace() => {
                    if matches!(ch, '\n' | '\r') {
                        self.line_break = true;
                    }
                    self.offset += ch.len_utf8();
                }
                Some('/') if rest.starts_with("//") => {
                    self.offset += rest.find(['\n', '\r']).unwrap_or(rest.len());
                }
                Some('/') if rest.starts_with("/*") => {
                    let Some(end) = rest[2..].find("*/") else {
                        return Err(ScriptError::new("unterminated comment", self.offset));
                    };
                    if rest[2..2 + end].contains(['\n', '\r']) {
                        self.line_break = true;
                    }
                    self.offset += 2 + end + 2;
                }
                _ => break Ok(()),
            }
        }
    }

    /// collect identifier
    ///
    /// the caller must ensure that current char is alphabetic, `_` or `$`
    fn identifier(&mut self) -> TokenKind {
        let rest = self.rest();
        let len = rest
            .find(|ch: char| !(ch.is_alphanumeric() || ch == '_' || ch == '$'))
            .unwrap_or(rest.len());
        self.offset += len;
        TokenKind::Ident(rest[..len].to_owned())
    }

    /// collect literal number
    ///
    /// the caller must ensure that current char is an ascii digit
    fn digit(&mut self) -> TokenKind {
        let start = self.offset;
        let bytes = self.source.as_bytes();
        let digits = |mut i: usize| {
            while bytes.get(i).is_some_and(u8::is_ascii_digit) {
                i += 1;
            }
            i
        };

        let mut end = digits(start);
        let mut float = false;

        // `1.5`, but not `1.len`
        if bytes.get(end) == Some(&b'.') && bytes.get(end + 1).is_some_and(u8::is_ascii_digit) {
            end = digits(end + 1);
            float = true;
        }

        if matches!(bytes.get(end), Some(b'e' | b'E')) {
            let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
            if bytes.get(end + 1 + sign).is_some_and(u8::is_ascii_digit) {
                end = digits(end + 1 + sign);
                float = true;
            }
        }

        self.offset = end;
        let text = &self.source[start..end];

        match float {
            false => match text.parse() {
                Ok(int) => TokenKind::Int(int),
                // too large for an integer
                Err(_) => TokenKind::Float(text.parse().unwrap_or(f64::INFINITY)),
            },
            true => TokenKind::Float(text.parse().unwrap_or(f64::NAN)),
        }
    }

    /// collect literal string
    ///
    /// only backtick strings may span multiple lines
    fn litstr(&mut self, quote: char) -> Result<TokenKind, ScriptError> {
        let start = self.offset;
        let mut chars = self.source[start + 1..].char_indices();
        let mut value = String::new();

        while let Some((i, ch)) = chars.next() {
            match ch {
                '\\' => match chars.next() {
                    Some((_, 'n')) => value.push('\n'),
                    Some((_, 'r')) => value.push('\r'),
                    Some((_, 't')) => value.push('\t'),
                    Some((_, '0')) => value.push('\0'),
                    // line continuation
                    Some((_, '\n')) => {}
                    Some((_, ch)) => value.push(ch),
                    None => break,
                },
                '\n' | '\r' if quote != '`' => break,
                ch if ch == quote => {
                    self.offset = start + 1 + i + 1;
                    return Ok(TokenKind::Str(value));
                }
                ch => value.push(ch),
            }
        }

        Err(ScriptError::new("unterminated string", start))
    }
}

#[cfg(test)]
mod test {
    use super::{TokenKind::*, Tokenizer};

    fn kinds(source: &str) -> Vec<super::TokenKind> {
        Tokenizer::new(source).tokenize().unwrap().into_iter().map(|e| e.kind).collect()
    }

    #[test]
    fn basic() {
        assert_eq!(
            kinds("__out += escape(it.name)"),
            [
                Ident("__out".into()),
                Punct("+="),
                Ident("escape".into()),
                Punct("("),
                Ident("it".into()),
                Punct("."),
                Ident("name".into()),
                Punct(")"),
                Eof,
            ]
        );
    }

    #[test]
    fn numbers() {
        assert_eq!(kinds("1 2.5 1e3 7.len"), [
            Int(1),
            Float(2.5),
            Float(1000.0),
            Int(7),
            Punct("."),
            Ident("len".into()),
            Eof,
        ]);
    }

    #[test]
    fn strings() {
        assert_eq!(kinds(r#"'it\'s\n' "a\\b" `x
y`"#), [
            Str("it's\n".into()),
            Str("a\\b".into()),
            Str("x\ny".into()),
            Eof,
        ]);
    }

    #[test]
    fn line_breaks_and_comments() {
        let tokens = Tokenizer::new("a // b\nc /* d\n */ e /* f */ g").tokenize().unwrap();
        let breaks: Vec<_> = tokens.iter().map(|e| e.line_break).collect();
        assert_eq!(breaks, [false, true, true, false, false]);
        assert_eq!(tokens[1].offset, 7);
    }

    #[test]
    fn errors() {
        let err = Tokenizer::new("x = 'abc\n'").tokenize().unwrap_err();
        assert_eq!((err.message.as_str(), err.offset), ("unterminated string", 4));

        let err = Tokenizer::new("a # b").tokenize().unwrap_err();
        assert_eq!((err.message.as_str(), err.offset), ("unexpected character `#`", 2));
    }
}

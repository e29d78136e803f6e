//! Static content helpers.
//!
//! Pure functions used by the node builder to turn static template content into text that
//! can be embedded in a single quoted script string.
use crate::{Config, Trim};

/// Escape `\` and `'` with a backslash.
pub fn escape_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '\\' | '\'') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Escape line breaks so the literal stays on a single script line.
pub fn escape_newlines(text: &str) -> String {
    text.replace('\n', "\\n").replace('\r', "\\r")
}

/// Trim whitespace of static content.
///
/// `left` is the trim of the leading edge, coming from the closing marker of the previous
/// tag. `right` is the trim of the trailing edge, coming from the opening marker of the
/// next tag. [`None`] falls back to [`Config::auto_trim`].
pub fn trim_ws(text: &str, config: &Config, left: Option<Trim>, right: Option<Trim>) -> String {
    let left = left.unwrap_or(config.auto_trim.after_tag);
    let right = right.unwrap_or(config.auto_trim.before_tag);

    let text = match config.rm_whitespace {
        true => rm_whitespace(text),
        false => text.to_owned(),
    };

    let mut text = text.as_str();

    if left == Trim::Slurp && right == Trim::Slurp {
        return text.trim().to_owned();
    }

    match left {
        Trim::Slurp => text = text.trim_start(),
        Trim::Newline => text = strip_newline_start(text),
        Trim::None => {}
    }

    match right {
        Trim::Slurp => text = text.trim_end(),
        Trim::Newline => text = strip_newline_end(text),
        Trim::None => {}
    }

    text.to_owned()
}

fn strip_newline_start(text: &str) -> &str {
    text.strip_prefix("\r\n")
        .or_else(|| text.strip_prefix('\n'))
        .or_else(|| text.strip_prefix('\r'))
        .unwrap_or(text)
}

fn strip_newline_end(text: &str) -> &str {
    text.strip_suffix("\r\n")
        .or_else(|| text.strip_suffix('\n'))
        .or_else(|| text.strip_suffix('\r'))
        .unwrap_or(text)
}

/// Strip every line and drop the empty ones.
fn rm_whitespace(text: &str) -> String {
    text.split(['\n', '\r'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn escape() {
        assert_eq!(escape_literal(r"it's C:\"), r"it\'s C:\\");
        assert_eq!(escape_newlines("a\r\nb"), r"a\r\nb");
    }

    #[test]
    fn default_trim() {
        let config = Config::default();
        // a single line break after a tag is trimmed by default
        assert_eq!(trim_ws("\n  hi\n", &config, None, None), "  hi\n");
        assert_eq!(trim_ws("\r\nhi", &config, None, None), "hi");
        assert_eq!(trim_ws("\n\nhi", &config, None, None), "\nhi");
    }

    #[test]
    fn explicit_trim() {
        let config = Config::default();
        assert_eq!(trim_ws("\n  hi  \n", &config, Some(Trim::None), Some(Trim::None)), "\n  hi  \n");
        assert_eq!(trim_ws(" \n hi \n ", &config, Some(Trim::Slurp), Some(Trim::Newline)), "hi \n ");
        assert_eq!(trim_ws(" \n hi \n", &config, Some(Trim::None), Some(Trim::Newline)), " \n hi ");
        assert_eq!(trim_ws("\t hi \n", &config, Some(Trim::Slurp), Some(Trim::Slurp)), "hi");
    }

    #[test]
    fn remove_whitespace() {
        let config = Config::default().rm_whitespace(true);
        assert_eq!(
            trim_ws("\n  <ul>\n\n    <li>\n  ", &config, Some(Trim::None), Some(Trim::None)),
            "<ul>\n<li>"
        );
    }
}

/// A unit of a parsed template.
///
/// Nodes keep the document order of the template, concatenating them in order gives the
/// evaluation order of the rendered output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Static content, already escaped to be embedded in a single quoted script string and
    /// already whitespace trimmed.
    Literal(String),
    /// A delimited fragment, `content` is left untouched.
    Tag { kind: TagKind, content: String },
}

impl Node {
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(value.into())
    }

    pub fn tag(kind: TagKind, content: impl Into<String>) -> Self {
        Self::Tag { kind, content: content.into() }
    }
}

/// Tag kind, selected by the prefix following the open delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    /// `<%~ it.html %>` output without escaping.
    Raw,
    /// `<%= it.name %>` output, escaped when auto escape is enabled.
    Interpolate,
    /// `<% if it.admin { %>` statement, produces no output by itself.
    Execute,
}

impl std::fmt::Display for TagKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Raw => f.write_str("raw"),
            Self::Interpolate => f.write_str("interpolate"),
            Self::Execute => f.write_str("execute"),
        }
    }
}

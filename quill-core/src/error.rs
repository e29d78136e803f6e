use crate::Diagnostic;

/// [`Result`][std::result::Result] alias for [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// An error that may occur while parsing or compiling a template.
///
/// Every variant is fatal, no partial node sequence or artifact is ever returned alongside it.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The template source is malformed, e.g. an unclosed tag.
    ///
    /// The diagnostic offsets refer to the template source.
    #[error("{0}")]
    Parse(Diagnostic),
    /// The generated artifact body cannot be parsed as a script.
    ///
    /// The diagnostic offsets refer to `code`, which is the artifact body itself. The ruler
    /// between them is as long as the diagnostic heading.
    #[error("Bad template syntax\n\n{diagnostic}\n{}\n{code}", .diagnostic.ruler())]
    Syntax { diagnostic: Diagnostic, code: String },
    /// The configuration cannot be used for parsing.
    #[error("invalid config: {0}")]
    Config(&'static str),
}

impl Error {
    /// Returns the diagnostic, if any.
    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            Error::Parse(diagnostic) => Some(diagnostic),
            Error::Syntax { diagnostic, .. } => Some(diagnostic),
            Error::Config(_) => None,
        }
    }
}

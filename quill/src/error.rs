use std::io;
use quill_core::Diagnostic;

/// [`Result`][std::result::Result] alias for [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// An error that can occur during compiling or rendering.
///
/// A failed render never produces partial output.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The template could not be parsed or compiled.
    #[error(transparent)]
    Compile(#[from] quill_core::Error),
    /// A fragment failed while rendering.
    ///
    /// The diagnostic offsets refer to `code`, the artifact body.
    #[error("{diagnostic}\n{}\n{code}", .diagnostic.ruler())]
    Render { diagnostic: Diagnostic, code: String },
    /// Render data could not be serialized.
    #[error("invalid render data: {0}")]
    Data(#[from] serde_json::Error),
    /// A resolver failed to provide an included template.
    #[error("failed to resolve template: {0}")]
    Resolve(String),
    /// `include()` or `layout()` used without a resolver.
    #[error("no resolver to include templates with")]
    NoResolver,
    /// Named template is not registered.
    #[error("template `{0}` not found")]
    NotFound(String),
    /// An async template rendered synchronously.
    #[error("async template must be rendered with `render_async`")]
    AsyncTemplate,
    /// A resolver passed to a synchronous render did not complete immediately.
    #[error("resolver suspended in a synchronous render")]
    Suspended,
    /// Writer failure.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// Convert error to [`io::Error`].
    ///
    /// Anything but [`Error::Io`] will become [`io::ErrorKind::InvalidData`].
    pub fn into_io(self) -> io::Error {
        match self {
            Error::Io(error) => error,
            err => io::Error::new(io::ErrorKind::InvalidData, err),
        }
    }

    /// Returns the diagnostic, if any.
    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            Error::Compile(err) => err.diagnostic(),
            Error::Render { diagnostic, .. } => Some(diagnostic),
            _ => None,
        }
    }
}

use proc_macro2::Span;
use syn::{punctuated::Punctuated, spanned::Spanned, *};

use crate::shared::error;

/// Derive macro type level attribute
///
/// Accept input:
///
/// - template: `#[template(source = ".." | path = "..")]`
/// - binding: `#[template(var = "it", use_with = bool)]`
/// - output: `#[template(escape = bool, rm_whitespace = bool)]`
/// - delimiters: `#[template(tags = ("{{", "}}"))]`
pub struct Metadata {
    pub source: Source,
    /// span of the source or path value, compile errors point at it
    pub span: Span,
    pub var: Option<String>,
    pub escape: Option<bool>,
    pub use_with: Option<bool>,
    pub rm_whitespace: Option<bool>,
    pub tags: Option<(String, String)>,
}

pub enum Source {
    Inline(String),
    /// absolute file path
    File(String),
}

impl Metadata {
    pub fn from_attrs(attrs: &[Attribute]) -> Result<Self> {
        let mut visitor = Visitor::default();

        for attr in attrs.iter().filter(|e| e.meta.path().is_ident("template")) {
            let attrs = attr.parse_args_with(Punctuated::<MetaNameValue, Token![,]>::parse_terminated)?;

            for MetaNameValue { path, value, .. } in attrs {
                visitor.visit_pair(path.require_ident()?.clone(), value)?;
            }
        }

        let Visitor { source, var, escape, use_with, rm_whitespace, tags } = visitor;
        let (source, span) = error!(?source, "one of `source` or `path` is required");

        Ok(Self { source, span, var, escape, use_with, rm_whitespace, tags })
    }

    /// Template source text, read from disk for file templates.
    pub fn read_source(&self) -> Result<String> {
        match &self.source {
            Source::Inline(source) => Ok(source.clone()),
            Source::File(path) => match std::fs::read_to_string(path) {
                Ok(source) => Ok(source),
                Err(err) => error!(@ self.span, "cannot read `{path}`: {err}"),
            },
        }
    }
}

// ===== Visitor =====

#[derive(Default)]
struct Visitor {
    source: Option<(Source, Span)>,
    var: Option<String>,
    escape: Option<bool>,
    use_with: Option<bool>,
    rm_whitespace: Option<bool>,
    tags: Option<(String, String)>,
}

impl Visitor {
    fn visit_pair(&mut self, name: Ident, value: Expr) -> Result<()> {
        match () {
            _ if name.eq("source") => {
                let source = Source::Inline(str_value(&value)?);
                set(&mut self.source, (source, value.span()), &name)
            }
            _ if name.eq("path") => {
                let source = Source::File(resolve_path(&str_value(&value)?));
                set(&mut self.source, (source, value.span()), &name)
            }
            _ if name.eq("var") => set(&mut self.var, str_value(&value)?, &name),
            _ if name.eq("escape") => set(&mut self.escape, bool_value(&value)?, &name),
            _ if name.eq("use_with") => set(&mut self.use_with, bool_value(&value)?, &name),
            _ if name.eq("rm_whitespace") => set(&mut self.rm_whitespace, bool_value(&value)?, &name),
            _ if name.eq("tags") => set(&mut self.tags, tags_value(&value)?, &name),
            _ => error!(name, "no such key"),
        }
    }
}

fn set<T>(slot: &mut Option<T>, value: T, name: &Ident) -> Result<()> {
    match slot.replace(value) {
        Some(_) if name.eq("source") || name.eq("path") => {
            error!(name, "only single either of `source` or `path` allowed")
        }
        Some(_) => error!(name, "duplicate `{name}` key"),
        None => Ok(()),
    }
}

/// Relative to `templates` in the crate root.
fn resolve_path(path: &str) -> String {
    let root = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".into());
    let mut buf = std::path::PathBuf::from(root);
    buf.push("templates");
    buf.push(path.trim_start_matches('/'));
    buf.to_string_lossy().into_owned()
}

// ===== Util =====

fn str_value(value: &Expr) -> Result<String> {
    match value {
        Expr::Lit(ExprLit { lit: Lit::Str(lit), .. }) => Ok(lit.value()),
        _ => error!(value, "expected string"),
    }
}

fn bool_value(value: &Expr) -> Result<bool> {
    match value {
        Expr::Lit(ExprLit { lit: Lit::Bool(lit), .. }) => Ok(lit.value),
        _ => error!(value, "expected `true` or `false`"),
    }
}

/// `("{{", "}}")`
fn tags_value(value: &Expr) -> Result<(String, String)> {
    let Expr::Tuple(tuple) = value else {
        error!(value, "expected `(\"open\", \"close\")`")
    };
    let mut elems = tuple.elems.iter();
    let (Some(open), Some(close), None) = (elems.next(), elems.next(), elems.next()) else {
        error!(value, "expected exactly open and close delimiters")
    };
    let (open, close) = (str_value(open)?, str_value(close)?);
    if open.is_empty() || close.is_empty() {
        error!(value, "delimiters must not be empty");
    }
    Ok((open, close))
}

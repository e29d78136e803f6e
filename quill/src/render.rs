use serde::Serialize;

use crate::{NoResolver, Resolver, Result, Template, Writer};

/// A type rendered by a fixed template, itself being the render data.
///
/// User may not implement this directly but instead use provided derive macro
/// [`Template`][quill_macros::Template].
pub trait Render: Serialize {
    /// The compiled template.
    fn template() -> &'static Template;

    fn render(&self) -> Result<String> {
        Self::template().render_with(self, &NoResolver)
    }

    fn render_with(&self, resolver: &impl Resolver) -> Result<String> {
        Self::template().render_with(self, resolver)
    }

    fn render_into(&self, resolver: &impl Resolver, writer: &mut impl Writer) -> Result<()> {
        Self::template().render_into(self, resolver, writer)
    }
}

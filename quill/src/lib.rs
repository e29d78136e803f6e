//! Embedded templating with layouts and includes.
//!
//! ```html
//! <% layout('base', { title: 'Users' }) %>
//! <ul>
//! <% for user in it.users { %>
//!   <li><%= user.name %></li>
//! <% } %>
//! </ul>
//! ```
//!
//! Templates are compiled by [`quill_core`] into a [`Procedure`], rendered here against any
//! [`serde::Serialize`] data bound to `it`.
//!
//! - `<%= value %>` output, html escaped
//! - `<%~ value %>` output as is
//! - `<% code %>` statements, see [`script`][quill_core::script] for the language
//!
//! Named templates live in a [`Templates`] registry, which resolves `include()` and
//! `layout()` calls. Types with a fixed inline template can derive [`Render`] via
//! [`Template`][macro@Template].
mod template;
mod registry;
mod render;
mod resolver;
mod eval;
mod value;
mod write;
mod display;
mod error;

pub use template::{Filter, Template};
pub use registry::Templates;
pub use render::Render;
pub use resolver::{AsyncResolver, NoResolver, Resolver};
pub use eval::MAX_INCLUDE_DEPTH;
pub use write::{Escape, Writer, escape};
pub use display::Display;
pub use error::{Error, Result};

pub use quill_core::{Config, Diagnostic, Node, Plugin, Procedure, ProcessCode, ProcessNodes, TagKind, Trim};
pub use quill_macros::Template;
pub use serde_json::Value;

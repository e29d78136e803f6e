//! The [`quill`][1] template parser and compiler.
//!
//! Compilation happens in three steps:
//!
//! 1. [`Scanner`] splits the source into static content and delimited tags.
//! 2. [`parse`] classifies tags into [`Node`]s and trims whitespace of static content.
//! 3. [`compile_to_string`] turns nodes into an artifact body, [`compile`] additionally
//!    parses it into a [`Procedure`] the runtime can execute.
//!
//! ```html
//! Hi <%= it.name %>!
//! ```
//!
//! [`parse`] stores `"Hi "` and `"!"` as literals and `"it.name"` as an interpolate tag, which
//! [`compile_to_string`] turns into, with includes disabled:
//!
//! ```text
//! let __out = ''
//! __out += 'Hi '
//! __out += escape(it.name)
//! __out += '!'
//! return __out
//! ```
//!
//! Fragments are written in a small [script] language, see its module docs for the syntax.
//!
//! This separation allows the derive macro in [`quill-macros`][2] to validate templates at
//! compile time while rendering happens in [`quill`][1].
//!
//! [1]: <https://docs.rs/quill>
//! [2]: <https://docs.rs/quill-macros>
mod config;
mod diagnostic;
mod error;
mod node;
mod plugin;
mod scanner;
mod parser;
mod compiler;

pub mod text;
pub mod script;

pub use config::{AutoTrim, Config, Prefixes, Tags, Trim};
pub use diagnostic::Diagnostic;
pub use error::{Error, Result};
pub use node::{Node, TagKind};
pub use plugin::{Plugin, ProcessCode, ProcessNodes};
pub use scanner::{Match, Scanner};
pub use parser::parse;
pub use compiler::{LAYOUT, LAYOUT_BODY, LAYOUT_DATA, OUTPUT, compile, compile_to_string};
pub use script::Procedure;

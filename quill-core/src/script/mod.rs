//! The script language of fragments and artifact bodies.
//!
//! ```text
//! let total = 0
//! for i, item in it.items {
//!     if item.price > 100 && !item.hidden {
//!         __out += upper(item.name) + ': ' + item.price
//!     } else {
//!         total = total + (item.price ?? 0)
//!     }
//! }
//! with it.user { __out += name }
//! return __out
//! ```
//!
//! Statements are separated by a line break or `;`. A line break also ends an expression
//! before `(` or `[`, so `x` followed by `[1]` on the next line is two statements.
mod ast;
mod parser;
mod token;

pub use ast::{BinOp, Builtin, Expr, ExprKind, Lit, Stmt, StmtKind, UnaryOp};
pub use parser::parse;

/// Script syntax error, located at a byte offset of the script source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ScriptError {
    pub message: String,
    pub offset: usize,
}

impl ScriptError {
    pub fn new(message: impl Into<String>, offset: usize) -> Self {
        Self { message: message.into(), offset }
    }
}

/// A compiled template, the artifact body together with its parsed statements.
///
/// Produced by [`compile`][crate::compile], executed by the runtime.
#[derive(Debug, Clone)]
pub struct Procedure {
    code: String,
    stmts: Vec<Stmt>,
    is_async: bool,
}

impl Procedure {
    pub fn new(code: String, stmts: Vec<Stmt>, is_async: bool) -> Self {
        Self { code, stmts, is_async }
    }

    /// The artifact body, offsets of every node refer to it.
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn stmts(&self) -> &[Stmt] {
        &self.stmts
    }

    /// Compiled with [`Config::async_mode`][crate::Config::async_mode].
    pub fn is_async(&self) -> bool {
        self.is_async
    }
}

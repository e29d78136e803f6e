//! Script syntax tree.
//!
//! Every node keeps the offset into the artifact body it was parsed from, used to locate
//! render time failures.
use std::ops::RangeInclusive;

/// A statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// `let name = expr`
    Let(String, Expr),
    /// `name = expr`
    Assign(String, Expr),
    /// `name += expr`
    Append(String, Expr),
    /// `if cond { } else if cond { } else { }`
    If {
        branches: Vec<(Expr, Vec<Stmt>)>,
        otherwise: Option<Vec<Stmt>>,
    },
    /// `for [key,] value in expr { }`
    For {
        key: Option<String>,
        value: String,
        iter: Expr,
        body: Vec<Stmt>,
    },
    /// `with expr { }`
    With(Expr, Vec<Stmt>),
    /// `return expr`
    Return(Expr),
    /// `expr`
    Expr(Expr),
}

/// An expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Lit(Lit),
    Ident(String),
    /// `[a, b]`
    Array(Vec<Expr>),
    /// `{ key: a, "other key": b }`
    Object(Vec<(String, Expr)>),
    /// `expr.name`
    Field(Box<Expr>, String),
    /// `expr[index]`
    Index(Box<Expr>, Box<Expr>),
    /// `name(args)`
    Call(Builtin, Vec<Expr>),
    Unary(UnaryOp, Box<Expr>),
    Binary(Box<Expr>, BinOp, Box<Expr>),
    /// `await expr`
    Await(Box<Expr>),
}

/// Literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Lit {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    /// `??`
    Coalesce,
    Or,
    And,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl BinOp {
    pub fn precedence(&self) -> u8 {
        match self {
            BinOp::Coalesce => 1,
            BinOp::Or => 2,
            BinOp::And => 3,
            BinOp::Eq | BinOp::NotEq => 4,
            BinOp::Lt | BinOp::LtEq | BinOp::Gt | BinOp::GtEq => 5,
            BinOp::Add | BinOp::Sub => 6,
            BinOp::Mul | BinOp::Div | BinOp::Rem => 7,
        }
    }

    pub(crate) fn from_punct(punct: &str) -> Option<Self> {
        Some(match punct {
            "??" => BinOp::Coalesce,
            "||" => BinOp::Or,
            "&&" => BinOp::And,
            "==" => BinOp::Eq,
            "!=" => BinOp::NotEq,
            "<" => BinOp::Lt,
            "<=" => BinOp::LtEq,
            ">" => BinOp::Gt,
            ">=" => BinOp::GtEq,
            "+" => BinOp::Add,
            "-" => BinOp::Sub,
            "*" => BinOp::Mul,
            "/" => BinOp::Div,
            "%" => BinOp::Rem,
            _ => return None,
        })
    }
}

/// Functions callable from fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    /// `escape(value)` html escape.
    Escape,
    /// `filter(value)` the configured content filter.
    Filter,
    /// `include(name[, data])` render another template.
    Include,
    /// `layout(name[, data])` render the output into another template.
    Layout,
    /// `merge(object, object)`
    Merge,
    /// `len(array | string | object)`
    Len,
    Upper,
    Lower,
    Trim,
    /// `join(array[, separator])`
    Join,
    /// `json(value)`
    Json,
}

impl Builtin {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "escape" => Self::Escape,
            "filter" => Self::Filter,
            "include" => Self::Include,
            "layout" => Self::Layout,
            "merge" => Self::Merge,
            "len" => Self::Len,
            "upper" => Self::Upper,
            "lower" => Self::Lower,
            "trim" => Self::Trim,
            "join" => Self::Join,
            "json" => Self::Json,
            _ => return None,
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Escape => "escape",
            Self::Filter => "filter",
            Self::Include => "include",
            Self::Layout => "layout",
            Self::Merge => "merge",
            Self::Len => "len",
            Self::Upper => "upper",
            Self::Lower => "lower",
            Self::Trim => "trim",
            Self::Join => "join",
            Self::Json => "json",
        }
    }

    /// Accepted argument count.
    pub fn arity(&self) -> RangeInclusive<usize> {
        match self {
            Self::Include | Self::Layout | Self::Join => 1..=2,
            Self::Merge => 2..=2,
            _ => 1..=1,
        }
    }

    /// Only available when includes are enabled.
    pub fn is_include(&self) -> bool {
        matches!(self, Self::Include | Self::Layout)
    }
}

use super::{
    BinOp, Builtin, Expr, ExprKind, Lit, ScriptError, Stmt, StmtKind, UnaryOp,
    token::{Token, TokenKind, Tokenizer},
};
use crate::Config;

type Result<T, E = ScriptError> = std::result::Result<T, E>;

/// Blocks, delimiters, unary operators and operator chains each count as one level,
/// evaluation recurses once per level.
const MAX_NESTING: usize = 64;

const KEYWORDS: [&str; 11] = [
    "let", "if", "else", "for", "in", "with", "return", "await", "true", "false", "null",
];

/// Parse script source into statements.
///
/// Builtins are checked here: unknown functions, wrong argument counts, `include` and
/// `layout` without [`Config::include`], and `await` without [`Config::async_mode`] are all
/// syntax errors.
pub fn parse(source: &str, config: &Config) -> Result<Vec<Stmt>> {
    let tokens = Tokenizer::new(source).tokenize()?;
    let mut parser = Parser {
        tokens,
        index: 0,
        depth: 0,
        no_object: false,
        include: config.include,
        async_mode: config.async_mode,
    };

    let stmts = parser.block_body()?;
    match parser.peek().kind {
        TokenKind::Eof => Ok(stmts),
        _ => parser.unexpected("statement"),
    }
}

struct Parser {
    tokens: Vec<Token>,
    index: usize,
    /// current nesting level
    depth: usize,
    /// block heads, `{` opens the block and not an object
    no_object: bool,
    include: bool,
    async_mode: bool,
}

impl Parser {
    fn peek(&self) -> &Token {
        // the last token is always `Eof`
        &self.tokens[self.index.min(self.tokens.len() - 1)]
    }

    fn bump(&mut self) -> Token {
        let token = self.peek().clone();
        if self.index < self.tokens.len() - 1 {
            self.index += 1;
        }
        token
    }

    fn eat_punct(&mut self, punct: &str) -> bool {
        let found = self.peek().is_punct(punct);
        if found {
            self.bump();
        }
        found
    }

    fn expect_punct(&mut self, punct: &str) -> Result<Token> {
        match self.peek().is_punct(punct) {
            true => Ok(self.bump()),
            false => self.unexpected(&format!("`{punct}`")),
        }
    }

    fn expect_ident(&mut self) -> Result<String> {
        match &self.peek().kind {
            TokenKind::Ident(name) if !KEYWORDS.contains(&name.as_str()) => {
                let name = name.clone();
                self.bump();
                Ok(name)
            }
            _ => self.unexpected("identifier"),
        }
    }

    fn unexpected<T>(&self, expected: &str) -> Result<T> {
        let token = self.peek();
        Err(ScriptError::new(
            format!("expected {expected}, found {}", describe(token)),
            token.offset,
        ))
    }

    /// statements until `}` or end of input
    fn block_body(&mut self) -> Result<Vec<Stmt>> {
        let mut stmts = vec![];
        loop {
            while self.eat_punct(";") {}
            match &self.peek().kind {
                TokenKind::Eof => break,
                TokenKind::Punct("}") => break,
                _ => stmts.push(self.stmt()?),
            }
        }
        Ok(stmts)
    }

    /// `{ stmts }`
    fn block(&mut self) -> Result<Vec<Stmt>> {
        self.nest(|p| {
            p.expect_punct("{")?;
            let stmts = p.block_body()?;
            p.expect_punct("}")?;
            Ok(stmts)
        })
    }

    /// one nesting level deeper
    fn nest<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= MAX_NESTING {
            return self.too_deep();
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn too_deep<T>(&self) -> Result<T> {
        Err(ScriptError::new(
            format!("nesting exceeds the limit of {MAX_NESTING} levels"),
            self.peek().offset,
        ))
    }

    fn stmt(&mut self) -> Result<Stmt> {
        let offset = self.peek().offset;
        let keyword = match &self.peek().kind {
            TokenKind::Ident(name) => name.clone(),
            _ => String::new(),
        };

        let kind = match keyword.as_str() {
            "let" => {
                self.bump();
                let name = self.expect_ident()?;
                self.expect_punct("=")?;
                StmtKind::Let(name, self.expr()?)
            }
            "if" => return Ok(Stmt { kind: self.if_stmt()?, offset }),
            "for" => {
                self.bump();
                let first = self.expect_ident()?;
                let (key, value) = match self.eat_punct(",") {
                    true => (Some(first), self.expect_ident()?),
                    false => (None, first),
                };
                if !self.peek().is_ident("in") {
                    return self.unexpected("`in`");
                }
                self.bump();
                let iter = self.head_expr()?;
                let body = self.block()?;
                return Ok(Stmt { kind: StmtKind::For { key, value, iter, body }, offset });
            }
            "with" => {
                self.bump();
                let scope = self.head_expr()?;
                let body = self.block()?;
                return Ok(Stmt { kind: StmtKind::With(scope, body), offset });
            }
            "return" => {
                self.bump();
                let next = self.peek();
                let value = match next.line_break
                    || next.is_punct(";")
                    || next.is_punct("}")
                    || next.kind == TokenKind::Eof
                {
                    true => Expr { kind: ExprKind::Lit(Lit::Null), offset },
                    false => self.expr()?,
                };
                StmtKind::Return(value)
            }
            "else" => return self.unexpected("statement"),
            _ => self.assign_or_expr()?,
        };

        self.end_of_stmt()?;
        Ok(Stmt { kind, offset })
    }

    fn if_stmt(&mut self) -> Result<StmtKind> {
        let mut branches = vec![];
        let mut otherwise = None;

        loop {
            // `if`
            self.bump();
            let cond = self.head_expr()?;
            let body = self.block()?;
            branches.push((cond, body));

            if !self.peek().is_ident("else") {
                break;
            }
            self.bump();

            if !self.peek().is_ident("if") {
                otherwise = Some(self.block()?);
                break;
            }
        }

        Ok(StmtKind::If { branches, otherwise })
    }

    fn assign_or_expr(&mut self) -> Result<StmtKind> {
        let expr = self.expr()?;
        let op = match &self.peek().kind {
            TokenKind::Punct(op @ ("=" | "+=")) => *op,
            _ => return Ok(StmtKind::Expr(expr)),
        };

        let ExprKind::Ident(name) = expr.kind else {
            return Err(ScriptError::new("invalid assignment target", expr.offset));
        };

        self.bump();
        let value = self.expr()?;

        Ok(match op {
            "=" => StmtKind::Assign(name, value),
            _ => StmtKind::Append(name, value),
        })
    }

    fn end_of_stmt(&mut self) -> Result<()> {
        let next = self.peek();
        match () {
            _ if next.is_punct(";") => {
                self.bump();
                Ok(())
            }
            _ if next.line_break || next.is_punct("}") || next.kind == TokenKind::Eof => Ok(()),
            _ => self.unexpected("end of statement"),
        }
    }

    /// expression followed by a block
    fn head_expr(&mut self) -> Result<Expr> {
        let prev = std::mem::replace(&mut self.no_object, true);
        let expr = self.expr();
        self.no_object = prev;
        expr
    }

    /// expression in a nested delimiter, objects allowed again
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let prev = std::mem::replace(&mut self.no_object, false);
        let result = self.nest(f);
        self.no_object = prev;
        result
    }

    fn expr(&mut self) -> Result<Expr> {
        self.binary(1)
    }

    /// precedence climbing, all operators are left associative
    fn binary(&mut self, min_prec: u8) -> Result<Expr> {
        let mut lhs = self.unary()?;
        let mut chain = 0;

        loop {
            let op = match self.peek().kind {
                TokenKind::Punct(punct) => match BinOp::from_punct(punct) {
                    Some(op) if op.precedence() >= min_prec => op,
                    _ => break,
                },
                _ => break,
            };

            chain += 1;
            if self.depth + chain > MAX_NESTING {
                return self.too_deep();
            }

            self.bump();
            let rhs = self.binary(op.precedence() + 1)?;
            let offset = lhs.offset;
            lhs = Expr { kind: ExprKind::Binary(Box::new(lhs), op, Box::new(rhs)), offset };
        }

        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr> {
        let token = self.peek().clone();
        let op = match &token.kind {
            TokenKind::Punct("!") => Some(UnaryOp::Not),
            TokenKind::Punct("-") => Some(UnaryOp::Neg),
            TokenKind::Ident(name) if name == "await" => {
                if !self.async_mode {
                    return Err(ScriptError::new(
                        "`await` is only allowed in async templates",
                        token.offset,
                    ));
                }
                self.bump();
                let inner = self.nest(Self::unary)?;
                return Ok(Expr { kind: ExprKind::Await(Box::new(inner)), offset: token.offset });
            }
            _ => None,
        };

        match op {
            Some(op) => {
                self.bump();
                let inner = self.nest(Self::unary)?;
                Ok(Expr { kind: ExprKind::Unary(op, Box::new(inner)), offset: token.offset })
            }
            None => self.postfix(),
        }
    }

    fn postfix(&mut self) -> Result<Expr> {
        let mut expr = self.primary()?;
        let mut chain = 0;

        loop {
            let next = self.peek();
            if next.is_punct(".") || next.is_punct("[") {
                chain += 1;
                if self.depth + chain > MAX_NESTING {
                    return self.too_deep();
                }
            }
            match () {
                _ if next.is_punct(".") => {
                    self.bump();
                    let TokenKind::Ident(name) = self.peek().kind.clone() else {
                        return self.unexpected("field name");
                    };
                    self.bump();
                    let offset = expr.offset;
                    expr = Expr { kind: ExprKind::Field(Box::new(expr), name), offset };
                }
                // a line break ends the statement instead
                _ if next.is_punct("[") && !next.line_break => {
                    self.bump();
                    let index = self.nested(Self::expr)?;
                    self.expect_punct("]")?;
                    let offset = expr.offset;
                    expr = Expr { kind: ExprKind::Index(Box::new(expr), Box::new(index)), offset };
                }
                _ if next.is_punct("(") && !next.line_break => {
                    return Err(ScriptError::new("only builtin functions can be called", next.offset));
                }
                _ => break Ok(expr),
            }
        }
    }

    fn primary(&mut self) -> Result<Expr> {
        let token = self.peek().clone();
        let offset = token.offset;

        let kind = match token.kind {
            TokenKind::Int(int) => ExprKind::Lit(Lit::Int(int)),
            TokenKind::Float(float) => ExprKind::Lit(Lit::Float(float)),
            TokenKind::Str(string) => ExprKind::Lit(Lit::Str(string)),
            TokenKind::Ident(name) => match name.as_str() {
                "true" => ExprKind::Lit(Lit::Bool(true)),
                "false" => ExprKind::Lit(Lit::Bool(false)),
                "null" => ExprKind::Lit(Lit::Null),
                keyword if KEYWORDS.contains(&keyword) => return self.unexpected("expression"),
                _ => {
                    self.bump();
                    let next = self.peek();
                    if next.is_punct("(") && !next.line_break {
                        return self.call(name, offset);
                    }
                    return Ok(Expr { kind: ExprKind::Ident(name), offset });
                }
            },
            TokenKind::Punct("(") => {
                self.bump();
                let mut expr = self.nested(Self::expr)?;
                self.expect_punct(")")?;
                expr.offset = offset;
                return Ok(expr);
            }
            TokenKind::Punct("[") => {
                self.bump();
                let items = self.nested(|p| p.list("]", Self::expr))?;
                return Ok(Expr { kind: ExprKind::Array(items), offset });
            }
            TokenKind::Punct("{") if !self.no_object => {
                self.bump();
                let entries = self.nested(|p| p.list("}", Self::entry))?;
                return Ok(Expr { kind: ExprKind::Object(entries), offset });
            }
            _ => return self.unexpected("expression"),
        };

        self.bump();
        Ok(Expr { kind, offset })
    }

    /// `name(args)`, the name is already consumed
    fn call(&mut self, name: String, offset: usize) -> Result<Expr> {
        let Some(builtin) = Builtin::from_name(&name) else {
            return Err(ScriptError::new(format!("unknown function `{name}`"), offset));
        };

        if builtin.is_include() && !self.include {
            return Err(ScriptError::new(format!("`{name}` is not enabled"), offset));
        }

        self.expect_punct("(")?;
        let args = self.nested(|p| p.list(")", Self::expr))?;

        let arity = builtin.arity();
        if !arity.contains(&args.len()) {
            let expected = match arity.start() == arity.end() {
                true => arity.start().to_string(),
                false => format!("{} to {}", arity.start(), arity.end()),
            };
            return Err(ScriptError::new(
                format!("`{name}` takes {expected} arguments, found {}", args.len()),
                offset,
            ));
        }

        Ok(Expr { kind: ExprKind::Call(builtin, args), offset })
    }

    /// `key: value`, `"key": value` or `key`
    fn entry(&mut self) -> Result<(String, Expr)> {
        let offset = self.peek().offset;
        let (key, shorthand) = match &self.peek().kind {
            TokenKind::Ident(key) => (key.clone(), !KEYWORDS.contains(&key.as_str())),
            TokenKind::Str(key) => (key.clone(), false),
            _ => return self.unexpected("object key"),
        };
        self.bump();

        match () {
            _ if self.eat_punct(":") => Ok((key, self.expr()?)),
            _ if shorthand => {
                let value = Expr { kind: ExprKind::Ident(key.clone()), offset };
                Ok((key, value))
            }
            _ => self.unexpected("`:`"),
        }
    }

    /// comma separated items until `close`, trailing comma allowed
    fn list<T>(&mut self, close: &str, mut item: impl FnMut(&mut Self) -> Result<T>) -> Result<Vec<T>> {
        let mut items = vec![];
        loop {
            if self.eat_punct(close) {
                break Ok(items);
            }
            items.push(item(self)?);
            if !self.eat_punct(",") {
                self.expect_punct(close)?;
                break Ok(items);
            }
        }
    }
}

fn describe(token: &Token) -> String {
    match &token.kind {
        TokenKind::Ident(name) => format!("`{name}`"),
        TokenKind::Punct(punct) => format!("`{punct}`"),
        TokenKind::Int(_) | TokenKind::Float(_) => "number".into(),
        TokenKind::Str(_) => "string".into(),
        TokenKind::Eof => "end of input".into(),
    }
}

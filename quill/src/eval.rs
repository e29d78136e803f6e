//! Procedure evaluator.
//!
//! One evaluator serves synchronous and asynchronous renders. Evaluation is a future that
//! only suspends while a resolver is pending, with a [`Blocking`][crate::resolver::Blocking]
//! resolver it is always ready on first poll.
use std::collections::HashMap;

use futures_util::{FutureExt, future::BoxFuture};
use quill_core::{
    Diagnostic, LAYOUT, LAYOUT_DATA, OUTPUT, Procedure,
    script::{BinOp, Builtin, Expr, ExprKind, Lit, Stmt, StmtKind},
};
use serde_json::{Map, Value};

use crate::{
    Error, Result,
    display::to_string,
    resolver::Resolve,
    template::Filter,
    value,
    write::escape,
};

/// Deepest include level, a template included at this depth can not include any further.
pub const MAX_INCLUDE_DEPTH: usize = 16;

pub(crate) struct Evaluator<'a> {
    procedure: &'a Procedure,
    resolver: &'a dyn Resolve,
    /// include level of the procedure, 0 at the top
    depth: usize,
    filter: Option<&'a Filter>,
    var_name: &'a str,
    scopes: Vec<Scope>,
}

enum Scope {
    Vars(HashMap<String, Value>),
    /// `with` fallback, fields of the object read as names
    With(Value),
}

enum Flow {
    Next,
    Return(Value),
}

/// Render time failure, located in the artifact body.
fn error(procedure: &Procedure, message: impl Into<String>, offset: usize) -> Error {
    Error::Render {
        diagnostic: Diagnostic::new(message, procedure.code(), offset),
        code: procedure.code().to_owned(),
    }
}

impl<'a> Evaluator<'a> {
    pub fn new(
        procedure: &'a Procedure,
        resolver: &'a dyn Resolve,
        filter: Option<&'a Filter>,
        var_name: &'a str,
        data: Value,
    ) -> Self {
        let root = HashMap::from([(var_name.to_owned(), data)]);
        Self { procedure, resolver, depth: 0, filter, var_name, scopes: vec![Scope::Vars(root)] }
    }

    pub fn depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    /// Run the procedure, without an explicit `return` the output accumulator is returned.
    pub async fn run(mut self) -> Result<String> {
        let procedure = self.procedure;
        let value = match self.exec(procedure.stmts()).await? {
            Flow::Return(value) => value,
            Flow::Next => self.lookup(OUTPUT).cloned().unwrap_or(Value::Null),
        };

        Ok(match value {
            Value::String(output) => output,
            value => to_string(&value),
        })
    }

    fn lookup(&self, name: &str) -> Option<&Value> {
        self.scopes.iter().rev().find_map(|scope| match scope {
            Scope::Vars(vars) => vars.get(name),
            Scope::With(Value::Object(fields)) => fields.get(name),
            Scope::With(_) => None,
        })
    }

    /// Only declared names can be assigned.
    fn lookup_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.scopes.iter_mut().rev().find_map(|scope| match scope {
            Scope::Vars(vars) => vars.get_mut(name),
            Scope::With(_) => None,
        })
    }

    fn declare(&mut self, name: &str, value: Value) {
        let vars = self.scopes.iter_mut().rev().find_map(|scope| match scope {
            Scope::Vars(vars) => Some(vars),
            Scope::With(_) => None,
        });
        if let Some(vars) = vars {
            vars.insert(name.to_owned(), value);
        }
    }

    /// `a.b.c` without cloning intermediate values.
    fn path(&self, expr: &Expr) -> Option<&Value> {
        match &expr.kind {
            ExprKind::Ident(name) => self.lookup(name),
            ExprKind::Field(target, name) => self.path(target)?.as_object()?.get(name),
            _ => None,
        }
    }

    /// Run statements in a new scope.
    async fn scoped(&mut self, stmts: &'a [Stmt], scope: HashMap<String, Value>) -> Result<Flow> {
        self.scopes.push(Scope::Vars(scope));
        let flow = self.exec(stmts).await;
        self.scopes.pop();
        flow
    }

    fn exec<'s>(&'s mut self, stmts: &'a [Stmt]) -> BoxFuture<'s, Result<Flow>> {
        async move {
            let procedure = self.procedure;

            for stmt in stmts {
                let undefined = |name: &str| error(procedure, format!("`{name}` is not defined"), stmt.offset);

                match &stmt.kind {
                    StmtKind::Let(name, expr) => {
                        let value = self.eval(expr).await?;
                        self.declare(name, value);
                    }
                    StmtKind::Assign(name, expr) => {
                        let value = self.eval(expr).await?;
                        *self.lookup_mut(name).ok_or_else(|| undefined(name))? = value;
                    }
                    StmtKind::Append(name, expr) => {
                        let value = self.eval(expr).await?;
                        let slot = self.lookup_mut(name).ok_or_else(|| undefined(name))?;
                        value::append(slot, &value).map_err(|msg| error(procedure, msg, expr.offset))?;
                    }
                    StmtKind::If { branches, otherwise } => {
                        let mut body = otherwise.as_deref();
                        for (cond, then) in branches {
                            if value::truthy(&self.eval(cond).await?) {
                                body = Some(then.as_slice());
                                break;
                            }
                        }
                        if let Some(body) = body {
                            if let Flow::Return(value) = self.scoped(body, HashMap::new()).await? {
                                return Ok(Flow::Return(value));
                            }
                        }
                    }
                    StmtKind::For { key, value: binding, iter, body } => {
                        let items: Vec<(Value, Value)> = match self.eval(iter).await? {
                            Value::Array(items) => items.into_iter().enumerate().map(|(i, e)| (i.into(), e)).collect(),
                            Value::Object(fields) => fields.into_iter().map(|(k, e)| (k.into(), e)).collect(),
                            other => {
                                let message = format!("{} is not iterable", value::type_name(&other));
                                return Err(error(procedure, message, iter.offset));
                            }
                        };

                        for (k, v) in items {
                            let mut scope = HashMap::from([(binding.clone(), v)]);
                            if let Some(key) = key {
                                scope.insert(key.clone(), k);
                            }
                            if let Flow::Return(value) = self.scoped(body, scope).await? {
                                return Ok(Flow::Return(value));
                            }
                        }
                    }
                    StmtKind::With(expr, body) => {
                        let fields = self.eval(expr).await?;
                        self.scopes.push(Scope::With(fields));
                        let flow = self.scoped(body, HashMap::new()).await;
                        self.scopes.pop();
                        if let Flow::Return(value) = flow? {
                            return Ok(Flow::Return(value));
                        }
                    }
                    StmtKind::Return(expr) => return Ok(Flow::Return(self.eval(expr).await?)),
                    StmtKind::Expr(expr) => {
                        self.eval(expr).await?;
                    }
                }
            }

            Ok(Flow::Next)
        }
        .boxed()
    }

    fn eval<'s>(&'s mut self, expr: &'a Expr) -> BoxFuture<'s, Result<Value>> {
        async move {
            let procedure = self.procedure;
            let fail = |message: String| error(procedure, message, expr.offset);

            match &expr.kind {
                ExprKind::Lit(lit) => Ok(match lit {
                    Lit::Null => Value::Null,
                    Lit::Bool(b) => Value::Bool(*b),
                    Lit::Int(int) => Value::from(*int),
                    Lit::Float(float) => value::float(*float),
                    Lit::Str(s) => Value::String(s.clone()),
                }),
                ExprKind::Ident(name) => match self.lookup(name) {
                    Some(value) => Ok(value.clone()),
                    None => Err(fail(format!("`{name}` is not defined"))),
                },
                ExprKind::Array(items) => {
                    let mut values = Vec::with_capacity(items.len());
                    for item in items {
                        values.push(self.eval(item).await?);
                    }
                    Ok(Value::Array(values))
                }
                ExprKind::Object(entries) => {
                    let mut fields = Map::new();
                    for (key, expr) in entries {
                        let value = self.eval(expr).await?;
                        fields.insert(key.clone(), value);
                    }
                    Ok(Value::Object(fields))
                }
                ExprKind::Field(target, name) => {
                    if let Some(value) = self.path(expr) {
                        return Ok(value.clone());
                    }
                    let target = self.eval(target).await?;
                    value::field(&target, name).map_err(fail)
                }
                ExprKind::Index(target, index) => {
                    let target = self.eval(target).await?;
                    let index = self.eval(index).await?;
                    value::index(&target, &index).map_err(fail)
                }
                ExprKind::Unary(op, inner) => {
                    let inner = self.eval(inner).await?;
                    value::unary(*op, inner).map_err(fail)
                }
                ExprKind::Binary(lhs, op, rhs) => {
                    let lhs = self.eval(lhs).await?;
                    match op {
                        BinOp::Coalesce if !lhs.is_null() => Ok(lhs),
                        BinOp::Or if value::truthy(&lhs) => Ok(lhs),
                        BinOp::And if !value::truthy(&lhs) => Ok(lhs),
                        BinOp::Coalesce | BinOp::Or | BinOp::And => self.eval(rhs).await,
                        op => {
                            let rhs = self.eval(rhs).await?;
                            value::binary(lhs, *op, rhs).map_err(fail)
                        }
                    }
                }
                // suspension happens inside the resolver
                ExprKind::Await(inner) => self.eval(inner).await,
                ExprKind::Call(builtin, args) => {
                    let mut values = Vec::with_capacity(args.len());
                    for arg in args {
                        values.push(self.eval(arg).await?);
                    }
                    self.call(*builtin, values, expr.offset).await
                }
            }
        }
        .boxed()
    }

    async fn call(&mut self, builtin: Builtin, args: Vec<Value>, offset: usize) -> Result<Value> {
        let procedure = self.procedure;
        let fail = |message: String| error(procedure, message, offset);

        // argument counts are checked by the parser
        let mut args = args.into_iter();
        let mut arg = || args.next().unwrap_or(Value::Null);

        match builtin {
            Builtin::Escape => Ok(Value::String(escape(&to_string(&arg())))),
            Builtin::Filter => Ok(match self.filter {
                Some(filter) => filter(arg()),
                None => arg(),
            }),
            Builtin::Include => {
                let name = template_name(arg()).map_err(fail)?;
                let data = match arg() {
                    // defaults to the render data
                    Value::Null => self.lookup(self.var_name).cloned().unwrap_or(Value::Null),
                    data => data,
                };
                if self.depth >= MAX_INCLUDE_DEPTH {
                    return Err(fail(format!(
                        "including `{name}` exceeds the include depth limit of {MAX_INCLUDE_DEPTH}"
                    )));
                }
                log::trace!("including `{name}` at depth {}", self.depth + 1);
                let output = self.resolver.resolve(&name, &data, self.depth + 1).await?;
                Ok(Value::String(output))
            }
            Builtin::Layout => {
                let name = template_name(arg()).map_err(fail)?;
                let data = arg();
                let undefined = || fail(format!("`{LAYOUT}` is not defined"));
                *self.lookup_mut(LAYOUT).ok_or_else(undefined)? = Value::String(name);
                *self.lookup_mut(LAYOUT_DATA).ok_or_else(undefined)? = data;
                Ok(Value::Null)
            }
            Builtin::Merge => value::merge(arg(), arg()).map_err(fail),
            Builtin::Len => value::len(&arg()).map(Value::from).map_err(fail),
            Builtin::Upper => Ok(Value::String(to_string(&arg()).to_uppercase())),
            Builtin::Lower => Ok(Value::String(to_string(&arg()).to_lowercase())),
            Builtin::Trim => Ok(Value::String(to_string(&arg()).trim().to_owned())),
            Builtin::Join => {
                let items = arg();
                let separator = match arg() {
                    Value::Null => ",".to_owned(),
                    separator => to_string(&separator),
                };
                value::join(&items, &separator).map_err(fail)
            }
            Builtin::Json => Ok(Value::String(serde_json::to_string(&arg())?)),
        }
    }
}

fn template_name(value: Value) -> value::Fallible<String> {
    match value {
        Value::String(name) => Ok(name),
        other => Err(format!("template name must be a string, found {}", value::type_name(&other))),
    }
}

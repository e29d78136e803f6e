//! Include and layout resolution.
use std::future::Future;

use futures_util::{FutureExt, future::BoxFuture};
use serde_json::Value;

use crate::{Error, Result};

/// Renders named templates for `include()` and `layout()`.
///
/// Called once per `include()` occurrence, and at most once per render for a layout.
pub trait Resolver: Sync {
    fn resolve(&self, name: &str, data: &Value) -> Result<String>;

    /// Resolve from inside a template that is itself `depth` includes deep.
    ///
    /// Resolvers rendering through [`Template`][crate::Template] forward `depth` to it, so
    /// recursive includes stop at [`MAX_INCLUDE_DEPTH`][crate::MAX_INCLUDE_DEPTH].
    fn resolve_nested(&self, name: &str, data: &Value, depth: usize) -> Result<String> {
        let _ = depth;
        self.resolve(name, data)
    }
}

/// Asynchronous [`Resolver`], used by [`render_async`][crate::Template::render_async].
pub trait AsyncResolver: Sync {
    fn resolve(&self, name: &str, data: &Value) -> impl Future<Output = Result<String>> + Send;

    /// See [`Resolver::resolve_nested`].
    fn resolve_nested(
        &self,
        name: &str,
        data: &Value,
        depth: usize,
    ) -> impl Future<Output = Result<String>> + Send {
        let _ = depth;
        self.resolve(name, data)
    }
}

/// Resolver for templates without includes, any resolution fails with [`Error::NoResolver`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NoResolver;

impl Resolver for NoResolver {
    fn resolve(&self, _: &str, _: &Value) -> Result<String> {
        Err(Error::NoResolver)
    }
}

impl AsyncResolver for NoResolver {
    async fn resolve(&self, _: &str, _: &Value) -> Result<String> {
        Err(Error::NoResolver)
    }
}

impl<F> Resolver for F where F: Fn(&str, &Value) -> Result<String> + Sync {
    fn resolve(&self, name: &str, data: &Value) -> Result<String> {
        self(name, data)
    }
}

/// Single resolver interface of the evaluator, both traits are adapted into it.
///
/// `depth` is the include depth of the resolved template.
pub(crate) trait Resolve: Sync {
    fn resolve<'r>(&'r self, name: &'r str, data: &'r Value, depth: usize) -> BoxFuture<'r, Result<String>>;
}

/// [`Resolver`] as an always ready future.
pub(crate) struct Blocking<'a, R: ?Sized>(pub &'a R);

impl<R> Resolve for Blocking<'_, R> where R: Resolver + ?Sized {
    fn resolve<'r>(&'r self, name: &'r str, data: &'r Value, depth: usize) -> BoxFuture<'r, Result<String>> {
        futures_util::future::ready(self.0.resolve_nested(name, data, depth)).boxed()
    }
}

pub(crate) struct Awaiting<'a, R: ?Sized>(pub &'a R);

impl<R> Resolve for Awaiting<'_, R> where R: AsyncResolver + ?Sized {
    fn resolve<'r>(&'r self, name: &'r str, data: &'r Value, depth: usize) -> BoxFuture<'r, Result<String>> {
        self.0.resolve_nested(name, data, depth).boxed()
    }
}

use std::{fmt, sync::Arc};

use futures_util::{FutureExt, future::{self, BoxFuture}};
use quill_core::{Config, Procedure};
use serde::Serialize;
use serde_json::Value;

use crate::{
    AsyncResolver, Error, NoResolver, Resolver, Result, Writer,
    eval::Evaluator,
    resolver::{Awaiting, Blocking, Resolve},
};

/// Content filter applied by `filter()`.
pub type Filter = dyn Fn(Value) -> Value + Send + Sync;

/// A compiled template.
///
/// Cheap to clone, the compiled procedure is shared.
///
/// ```
/// use quill::{Config, Template};
/// use serde_json::json;
///
/// let template = Template::compile("Hi <%= it.name %>", &Config::default()).unwrap();
/// assert_eq!(template.render(&json!({ "name": "Ben" })).unwrap(), "Hi Ben");
/// ```
#[derive(Clone)]
pub struct Template {
    procedure: Arc<Procedure>,
    var_name: Arc<str>,
    filter: Option<Arc<Filter>>,
}

impl Template {
    /// Compile template source.
    pub fn compile(source: &str, config: &Config) -> Result<Self> {
        let procedure = quill_core::compile(source, config)?;
        Ok(Self::from_procedure(procedure, &config.var_name))
    }

    /// Create template from an already compiled procedure, render data is bound to `var_name`.
    pub fn from_procedure(procedure: Procedure, var_name: &str) -> Self {
        Self {
            procedure: Arc::new(procedure),
            var_name: var_name.into(),
            filter: None,
        }
    }

    /// Set the content filter, without one `filter()` returns its input.
    pub fn with_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.filter = Some(Arc::new(filter));
        self
    }

    /// The compiled artifact body.
    pub fn code(&self) -> &str {
        self.procedure.code()
    }

    /// Returns `true` if only [`Template::render_async`] can render this template.
    pub fn is_async(&self) -> bool {
        self.procedure.is_async()
    }

    /// Render without includes.
    pub fn render<T: Serialize + ?Sized>(&self, data: &T) -> Result<String> {
        self.render_with(data, &NoResolver)
    }

    /// Render, resolving includes and layouts with given resolver.
    pub fn render_with<T, R>(&self, data: &T, resolver: &R) -> Result<String>
    where
        T: Serialize + ?Sized,
        R: Resolver + ?Sized,
    {
        self.render_value(serde_json::to_value(data)?, resolver)
    }

    /// Render into a [`Writer`], nothing is written if the render fails.
    pub fn render_into<T, R>(&self, data: &T, resolver: &R, writer: &mut impl Writer) -> Result<()>
    where
        T: Serialize + ?Sized,
        R: Resolver + ?Sized,
    {
        let output = self.render_with(data, resolver)?;
        writer.write_str(&output)
    }

    /// Render and deliver the result to a `(error, output)` callback.
    ///
    /// The same result is also returned.
    pub fn render_callback<T, R, F>(&self, data: &T, resolver: &R, callback: F) -> Result<String>
    where
        T: Serialize + ?Sized,
        R: Resolver + ?Sized,
        F: FnOnce(Option<&Error>, Option<&str>),
    {
        let result = self.render_with(data, resolver);
        match &result {
            Ok(output) => callback(None, Some(output.as_str())),
            Err(err) => callback(Some(err), None),
        }
        result
    }

    /// Render, resolving includes and layouts asynchronously.
    ///
    /// Renders synchronous templates as well. Data is converted before the returned future
    /// is polled, the future is `Send` and does not borrow `data`.
    pub fn render_async<'a, T, R>(&'a self, data: &T, resolver: &'a R) -> BoxFuture<'a, Result<String>>
    where
        T: Serialize + ?Sized,
        R: AsyncResolver + ?Sized,
    {
        match serde_json::to_value(data) {
            Ok(data) => self.render_value_async(data, resolver),
            Err(err) => future::ready(Err(Error::from(err))).boxed(),
        }
    }

    /// [`Template::render_with`] with already converted data.
    pub fn render_value<R>(&self, data: Value, resolver: &R) -> Result<String>
    where
        R: Resolver + ?Sized,
    {
        self.render_value_at(data, resolver, 0)
    }

    /// [`Template::render_value`] for a template included `depth` levels deep.
    pub fn render_value_at<R>(&self, data: Value, resolver: &R, depth: usize) -> Result<String>
    where
        R: Resolver + ?Sized,
    {
        if self.is_async() {
            return Err(Error::AsyncTemplate);
        }

        // a blocking resolver never suspends
        self.eval(data, &Blocking(resolver), depth)
            .now_or_never()
            .unwrap_or(Err(Error::Suspended))
    }

    /// [`Template::render_async`] with already converted data.
    pub fn render_value_async<'a, R>(&'a self, data: Value, resolver: &'a R) -> BoxFuture<'a, Result<String>>
    where
        R: AsyncResolver + ?Sized,
    {
        self.render_value_async_at(data, resolver, 0)
    }

    /// [`Template::render_value_async`] for a template included `depth` levels deep.
    pub fn render_value_async_at<'a, R>(
        &'a self,
        data: Value,
        resolver: &'a R,
        depth: usize,
    ) -> BoxFuture<'a, Result<String>>
    where
        R: AsyncResolver + ?Sized,
    {
        async move { self.eval(data, &Awaiting(resolver), depth).await }.boxed()
    }

    fn eval<'a>(&'a self, data: Value, resolver: &'a dyn Resolve, depth: usize) -> BoxFuture<'a, Result<String>> {
        let evaluator = Evaluator::new(
            &self.procedure,
            resolver,
            self.filter.as_deref(),
            &self.var_name,
            data,
        );
        evaluator.depth(depth).run().boxed()
    }
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Template")
            .field("code", &self.code())
            .field("is_async", &self.is_async())
            .field("filter", &self.filter.is_some())
            .finish()
    }
}

//! Named templates.
use std::{collections::HashMap, sync::OnceLock};

use futures_util::{FutureExt, future::{self, BoxFuture}};

use quill_core::Config;
use serde::Serialize;
use serde_json::Value;

use crate::{AsyncResolver, Error, Resolver, Result, Template};

/// Name to template mapping, resolves includes and layouts of its own templates.
///
/// The mapping lives as long as the caller keeps it. Sources are compiled on first use,
/// then kept when caching is enabled or compiled again on every use otherwise.
///
/// ```
/// use quill::{Config, Templates};
/// use serde_json::json;
///
/// let mut templates = Templates::new(Config::default());
/// templates.define_source("base", "<main><%~ it.body %></main>");
/// templates.define_source("page", "<% layout('base') %>Hi <%= it.name %>");
///
/// let output = templates.render("page", &json!({ "name": "Ben" })).unwrap();
/// assert_eq!(output, "<main>Hi Ben</main>");
/// ```
#[derive(Debug)]
pub struct Templates {
    config: Config,
    cache: bool,
    entries: HashMap<String, Entry>,
}

#[derive(Debug)]
enum Entry {
    Compiled(Template),
    Source { source: String, compiled: OnceLock<Template> },
}

impl Templates {
    /// Create empty registry, sources are compiled with given config.
    pub fn new(config: Config) -> Self {
        Self { config, cache: true, entries: HashMap::new() }
    }

    /// Keep compiled sources, enabled by default.
    pub fn cache(mut self, cache: bool) -> Self {
        self.cache = cache;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Register a compiled template, replacing any previous one with the same name.
    pub fn define(&mut self, name: impl Into<String>, template: Template) {
        self.entries.insert(name.into(), Entry::Compiled(template));
    }

    /// Register template source, compiled on first use.
    pub fn define_source(&mut self, name: impl Into<String>, source: impl Into<String>) {
        let entry = Entry::Source { source: source.into(), compiled: OnceLock::new() };
        self.entries.insert(name.into(), entry);
    }

    /// Returns `true` if a template was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        self.entries.remove(name).is_some()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Get a template by name, compiling it if necessary.
    pub fn get(&self, name: &str) -> Result<Template> {
        match self.entries.get(name) {
            None => Err(Error::NotFound(name.to_owned())),
            Some(Entry::Compiled(template)) => Ok(template.clone()),
            Some(Entry::Source { source, compiled }) => {
                if let Some(template) = compiled.get() {
                    log::debug!("template `{name}` cache hit");
                    return Ok(template.clone());
                }

                log::debug!("template `{name}` cache miss, compiling");
                let template = Template::compile(source, &self.config)?;

                if self.cache {
                    // another thread may have won, both are equal
                    let _ = compiled.set(template.clone());
                }

                Ok(template)
            }
        }
    }

    /// Render named template, includes and layouts resolve through this registry.
    pub fn render<T: Serialize + ?Sized>(&self, name: &str, data: &T) -> Result<String> {
        self.get(name)?.render_with(data, self)
    }

    /// Asynchronous [`Templates::render`], required for templates compiled in async mode.
    ///
    /// The template is looked up and `data` converted before the returned future is polled.
    pub fn render_async<T: Serialize + ?Sized>(&self, name: &str, data: &T) -> BoxFuture<'_, Result<String>> {
        let prepared = self.get(name).and_then(|template| Ok((template, serde_json::to_value(data)?)));
        match prepared {
            Ok((template, data)) => async move { template.render_value_async(data, self).await }.boxed(),
            Err(err) => future::ready(Err(err)).boxed(),
        }
    }
}

impl Resolver for Templates {
    fn resolve(&self, name: &str, data: &Value) -> Result<String> {
        Resolver::resolve_nested(self, name, data, 0)
    }

    fn resolve_nested(&self, name: &str, data: &Value, depth: usize) -> Result<String> {
        self.get(name)?.render_value_at(data.clone(), self, depth)
    }
}

impl AsyncResolver for Templates {
    async fn resolve(&self, name: &str, data: &Value) -> Result<String> {
        AsyncResolver::resolve_nested(self, name, data, 0).await
    }

    async fn resolve_nested(&self, name: &str, data: &Value, depth: usize) -> Result<String> {
        let template = self.get(name)?;
        template.render_value_async_at(data.clone(), self, depth).await
    }
}

#[cfg(test)]
mod test {
    use super::Templates;
    use crate::{Config, Error};
    use serde_json::json;

    #[test]
    fn not_found() {
        let templates = Templates::new(Config::default());
        assert!(matches!(templates.render("x", &json!({})), Err(Error::NotFound(name)) if name == "x"));
    }

    #[test]
    fn redefine_and_remove() {
        let mut templates = Templates::new(Config::default());
        templates.define_source("a", "one");
        assert_eq!(templates.render("a", &()).unwrap(), "one");

        templates.define_source("a", "two");
        assert_eq!(templates.render("a", &()).unwrap(), "two");

        assert!(templates.remove("a"));
        assert!(!templates.contains("a"));
    }

    #[test]
    fn cache_flag() {
        let mut templates = Templates::new(Config::default());
        templates.define_source("a", "x");
        let first = templates.get("a").unwrap();
        let second = templates.get("a").unwrap();
        assert!(std::ptr::eq(first.code(), second.code()));

        let mut templates = Templates::new(Config::default()).cache(false);
        templates.define_source("a", "x");
        let first = templates.get("a").unwrap();
        let second = templates.get("a").unwrap();
        assert!(!std::ptr::eq(first.code(), second.code()));
        assert_eq!(first.code(), second.code());
    }

    #[test]
    fn compile_error_surfaces_on_use() {
        let mut templates = Templates::new(Config::default());
        templates.define_source("bad", "<%= it.x");
        assert!(matches!(templates.render("bad", &()), Err(Error::Compile(_))));
    }
}

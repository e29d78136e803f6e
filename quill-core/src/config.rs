//! Parser and compiler configuration.
use std::{fmt, sync::Arc};

use crate::Plugin;

/// Configuration shared by the scanner, node builder and compiler.
///
/// Resolved once, then only read for the duration of a parse/compile pair.
///
/// ```
/// use quill_core::{Config, Trim};
///
/// let config = Config::default()
///     .tags("{{", "}}")
///     .auto_trim(Trim::None, Trim::Slurp)
///     .var_name("data");
/// assert_eq!(config.tags.open, "{{");
/// ```
#[derive(Clone)]
pub struct Config {
    /// Open and close tag delimiters.
    pub tags: Tags,
    /// Prefix character per tag kind.
    pub prefixes: Prefixes,
    /// Escape interpolated output.
    pub auto_escape: bool,
    /// Pass raw and interpolated output through the content filter.
    pub filter: bool,
    /// Whitespace trimmed around tags when no trim marker is given.
    pub auto_trim: AutoTrim,
    /// Strip every line and drop empty lines of static content.
    pub rm_whitespace: bool,
    /// Name the render data is bound to inside fragments.
    pub var_name: String,
    /// Make top level fields of the render data available as bare names.
    pub use_with: bool,
    /// Suspend at include and layout resolution.
    pub async_mode: bool,
    /// Enable `include()` and `layout()`.
    pub include: bool,
    /// Plugins in registration order.
    pub plugins: Vec<Arc<dyn Plugin>>,
}

/// Open and close tag delimiters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tags {
    pub open: String,
    pub close: String,
}

/// Prefix characters selecting the tag kind.
///
/// [`None`] means no prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prefixes {
    pub exec: Option<char>,
    pub interpolate: Option<char>,
    pub raw: Option<char>,
}

/// Whitespace trim mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Trim {
    /// Keep whitespace.
    #[default]
    None,
    /// Trim a single line break, marker `-`.
    Newline,
    /// Trim all whitespace, marker `_`.
    Slurp,
}

/// Default trim mode of static content around tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoTrim {
    /// Trailing edge of static content followed by a tag.
    pub before_tag: Trim,
    /// Leading edge of static content preceded by a tag.
    pub after_tag: Trim,
}

impl Trim {
    /// Returns [`Some`] if given char is a trim marker.
    pub fn from_marker(ch: char) -> Option<Self> {
        match ch {
            '-' => Some(Self::Newline),
            '_' => Some(Self::Slurp),
            _ => None,
        }
    }
}

impl Prefixes {
    /// Returns `true` if given char is any configured prefix.
    pub fn contains(&self, ch: char) -> bool {
        [self.exec, self.interpolate, self.raw].contains(&Some(ch))
    }
}

impl Config {
    /// Set tag delimiters.
    pub fn tags(mut self, open: impl Into<String>, close: impl Into<String>) -> Self {
        self.tags = Tags { open: open.into(), close: close.into() };
        self
    }

    /// Set tag kind prefixes.
    pub fn prefixes(mut self, exec: Option<char>, interpolate: Option<char>, raw: Option<char>) -> Self {
        self.prefixes = Prefixes { exec, interpolate, raw };
        self
    }

    pub fn auto_escape(mut self, auto_escape: bool) -> Self {
        self.auto_escape = auto_escape;
        self
    }

    pub fn filter(mut self, filter: bool) -> Self {
        self.filter = filter;
        self
    }

    pub fn auto_trim(mut self, before_tag: Trim, after_tag: Trim) -> Self {
        self.auto_trim = AutoTrim { before_tag, after_tag };
        self
    }

    pub fn rm_whitespace(mut self, rm_whitespace: bool) -> Self {
        self.rm_whitespace = rm_whitespace;
        self
    }

    pub fn var_name(mut self, var_name: impl Into<String>) -> Self {
        self.var_name = var_name.into();
        self
    }

    pub fn use_with(mut self, use_with: bool) -> Self {
        self.use_with = use_with;
        self
    }

    pub fn async_mode(mut self, async_mode: bool) -> Self {
        self.async_mode = async_mode;
        self
    }

    pub fn include(mut self, include: bool) -> Self {
        self.include = include;
        self
    }

    /// Register a plugin after the already registered ones.
    pub fn plugin(mut self, plugin: impl Plugin + 'static) -> Self {
        self.plugins.push(Arc::new(plugin));
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tags: Tags { open: "<%".into(), close: "%>".into() },
            prefixes: Prefixes { exec: None, interpolate: Some('='), raw: Some('~') },
            auto_escape: true,
            filter: false,
            auto_trim: AutoTrim { before_tag: Trim::None, after_tag: Trim::Newline },
            rm_whitespace: false,
            var_name: "it".into(),
            use_with: false,
            async_mode: false,
            include: true,
            plugins: vec![],
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("tags", &self.tags)
            .field("prefixes", &self.prefixes)
            .field("auto_escape", &self.auto_escape)
            .field("filter", &self.filter)
            .field("auto_trim", &self.auto_trim)
            .field("rm_whitespace", &self.rm_whitespace)
            .field("var_name", &self.var_name)
            .field("use_with", &self.use_with)
            .field("async_mode", &self.async_mode)
            .field("include", &self.include)
            .field("plugins", &self.plugins.len())
            .finish()
    }
}

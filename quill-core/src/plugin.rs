//! Extension points around the compiler.
//!
//! Plugins are applied in registration order, each one receiving the output of the previous
//! one. Both hooks default to returning their input untouched.
use crate::{Config, Node};

/// A template plugin.
pub trait Plugin: Send + Sync {
    /// Rewrite the node sequence before compilation.
    ///
    /// The output is not validated, malformed nodes surface when the artifact is parsed or
    /// rendered.
    fn process_nodes(&self, nodes: Vec<Node>, config: &Config) -> Vec<Node> {
        let _ = config;
        nodes
    }

    /// Rewrite the assembled artifact body.
    fn process_code(&self, code: String, config: &Config) -> String {
        let _ = config;
        code
    }
}

/// [`Plugin`] from a node transform closure.
pub struct ProcessNodes<F>(pub F);

impl<F> Plugin for ProcessNodes<F>
where
    F: Fn(Vec<Node>, &Config) -> Vec<Node> + Send + Sync,
{
    fn process_nodes(&self, nodes: Vec<Node>, config: &Config) -> Vec<Node> {
        (self.0)(nodes, config)
    }
}

/// [`Plugin`] from a code transform closure.
pub struct ProcessCode<F>(pub F);

impl<F> Plugin for ProcessCode<F>
where
    F: Fn(String, &Config) -> String + Send + Sync,
{
    fn process_code(&self, code: String, config: &Config) -> String {
        (self.0)(code, config)
    }
}

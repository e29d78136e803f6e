//! Artifact code generation.
//!
//! The artifact body is a [script][crate::script] procedure, one statement per line:
//!
//! ```text
//! let __out = ''
//! let __layout = null
//! let __layout_data = null
//! __out += 'Hi '
//! __out += escape(it.name)
//! if __layout { __out = include(__layout, merge(__layout_data ?? it, { body: __out })) }
//! return __out
//! ```
use std::fmt::Write;

use crate::{
    Config, Error, Node, Result, TagKind,
    diagnostic::Diagnostic,
    parser::parse,
    script::{self, Procedure},
};

/// Output accumulator binding.
pub const OUTPUT: &str = "__out";
/// Pending layout target binding.
pub const LAYOUT: &str = "__layout";
/// Pending layout data binding.
pub const LAYOUT_DATA: &str = "__layout_data";
/// Key the rendered body is merged into the layout data under.
pub const LAYOUT_BODY: &str = "body";

/// Compile template source into an artifact body.
///
/// Registered plugins rewrite the body afterwards, in registration order.
///
/// ```
/// use quill_core::{Config, compile_to_string};
///
/// let config = Config::default().include(false);
/// let code = compile_to_string("Hi <%= it.user %>", &config).unwrap();
/// assert_eq!(code, "let __out = ''\n__out += 'Hi '\n__out += escape(it.user)\nreturn __out");
/// ```
pub fn compile_to_string(source: &str, config: &Config) -> Result<String> {
    let nodes = parse(source, config)?;
    let mut code = String::with_capacity(source.len() + 128);

    // `fmt::Write` for `String` is infallible
    let _ = writeln!(code, "let {OUTPUT} = ''");

    if config.include {
        let _ = writeln!(code, "let {LAYOUT} = null");
        let _ = writeln!(code, "let {LAYOUT_DATA} = null");
    }

    if config.use_with {
        let _ = writeln!(code, "with {} {{", config.var_name);
    }

    compile_scope(&nodes, config, &mut code);

    if config.include {
        let _ = writeln!(
            code,
            "if {LAYOUT} {{ {OUTPUT} = {}include({LAYOUT}, merge({LAYOUT_DATA} ?? {}, {{ {LAYOUT_BODY}: {OUTPUT} }})) }}",
            if config.async_mode { "await " } else { "" },
            config.var_name,
        );
    }

    let _ = write!(code, "return {OUTPUT}");

    if config.use_with {
        code.push_str("\n}");
    }

    for (i, plugin) in config.plugins.iter().enumerate() {
        log::trace!("plugin #{i} processing {} bytes of code", code.len());
        code = plugin.process_code(code, config);
    }

    log::debug!("compiled {} nodes into {} bytes of code", nodes.len(), code.len());

    Ok(code)
}

/// Compile template source into a callable [`Procedure`].
///
/// Artifact body syntax errors are reported as [`Error::Syntax`], located in the artifact
/// body rather than in the template source.
pub fn compile(source: &str, config: &Config) -> Result<Procedure> {
    let code = compile_to_string(source, config)?;
    match script::parse(&code, config) {
        Ok(stmts) => Ok(Procedure::new(code, stmts, config.async_mode)),
        Err(err) => Err(Error::Syntax {
            diagnostic: Diagnostic::new(err.message, &code, err.offset),
            code,
        }),
    }
}

/// Append one statement per node.
fn compile_scope(nodes: &[Node], config: &Config, code: &mut String) {
    for node in nodes {
        match node {
            Node::Literal(literal) => {
                let _ = writeln!(code, "{OUTPUT} += '{literal}'");
            }
            Node::Tag { kind: TagKind::Execute, content } => {
                // own line, `<% } %>` must not end up behind another statement
                code.push_str(content);
                code.push('\n');
            }
            Node::Tag { content, .. } if content.trim().is_empty() => {}
            Node::Tag { kind, content } => {
                let mut expr = content.clone();
                if config.filter {
                    expr = format!("filter({expr})");
                }
                if config.auto_escape && matches!(kind, TagKind::Interpolate) {
                    expr = format!("escape({expr})");
                }
                let _ = writeln!(code, "{OUTPUT} += {expr}");
            }
        }
    }
}

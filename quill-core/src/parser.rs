use crate::{
    Config, Node, Prefixes, Result, TagKind, Trim,
    scanner::Scanner,
    text::{escape_literal, escape_newlines, trim_ws},
};

/// Parse template source into nodes.
///
/// Registered plugins rewrite the node sequence afterwards, in registration order.
pub fn parse(source: &str, config: &Config) -> Result<Vec<Node>> {
    let mut nodes = vec![];
    let mut scanner = Scanner::new(source, config)?;

    // the first static content never trims its leading edge
    let mut trim_left = Some(Trim::None);

    for found in scanner.by_ref() {
        let found = found?;

        push_literal(&mut nodes, found.literal, config, trim_left, found.trim_before);

        nodes.push(Node::Tag {
            kind: tag_kind(found.prefix, &config.prefixes),
            content: found.content.to_owned(),
        });

        trim_left = found.trim_after;
    }

    // end of input, nothing to trim against
    push_literal(&mut nodes, scanner.remainder(), config, trim_left, Some(Trim::None));

    for (i, plugin) in config.plugins.iter().enumerate() {
        log::trace!("plugin #{i} processing {} nodes", nodes.len());
        nodes = plugin.process_nodes(nodes, config);
    }

    Ok(nodes)
}

fn push_literal(
    nodes: &mut Vec<Node>,
    literal: &str,
    config: &Config,
    left: Option<Trim>,
    right: Option<Trim>,
) {
    if literal.is_empty() {
        return;
    }

    let literal = escape_literal(literal);
    let literal = trim_ws(&literal, config, left, right);
    let literal = escape_newlines(&literal);

    if !literal.is_empty() {
        nodes.push(Node::Literal(literal));
    }
}

/// Unrecognized prefixes fall back to [`TagKind::Execute`].
fn tag_kind(prefix: Option<char>, prefixes: &Prefixes) -> TagKind {
    match () {
        _ if prefix == prefixes.exec => TagKind::Execute,
        _ if prefix == prefixes.raw => TagKind::Raw,
        _ if prefix == prefixes.interpolate => TagKind::Interpolate,
        _ => TagKind::Execute,
    }
}

#[cfg(test)]
mod test {
    use super::parse;
    use crate::{Config, Node, TagKind, Trim};

    #[test]
    fn literal_only() {
        let nodes = parse("it's a\\b\nc", &Config::default()).unwrap();
        assert_eq!(nodes, [Node::literal(r"it\'s a\\b\nc")]);
    }

    #[test]
    fn empty_source() {
        assert!(parse("", &Config::default()).unwrap().is_empty());
    }

    #[test]
    fn classify_default_prefixes() {
        let nodes = parse("<%= x %><%~ y %><% z %>", &Config::default()).unwrap();
        assert_eq!(
            nodes,
            [
                Node::tag(TagKind::Interpolate, "x"),
                Node::tag(TagKind::Raw, "y"),
                Node::tag(TagKind::Execute, "z"),
            ]
        );
    }

    #[test]
    fn classify_custom_prefixes() {
        let config = Config::default().prefixes(Some('_'), None, Some('~'));
        let nodes = parse("<%_ a %><%~ b %><% c %><%= d %>", &config).unwrap();
        assert_eq!(
            nodes,
            [
                Node::tag(TagKind::Execute, "a"),
                Node::tag(TagKind::Raw, "b"),
                Node::tag(TagKind::Interpolate, "c"),
                // `=` is no prefix here, it is part of the content
                Node::tag(TagKind::Interpolate, "= d"),
            ]
        );
    }

    #[test]
    fn unprefixed_falls_back_to_execute() {
        let config = Config::default().prefixes(Some('_'), Some('='), Some('~'));
        let nodes = parse("<% x %><%_ y %><%= z %>", &config).unwrap();
        assert_eq!(
            nodes,
            [
                Node::tag(TagKind::Execute, "x"),
                Node::tag(TagKind::Execute, "y"),
                Node::tag(TagKind::Interpolate, "z"),
            ]
        );
    }

    #[test]
    fn empty_tag() {
        let nodes = parse("a<%= %>b", &Config::default()).unwrap();
        assert_eq!(nodes, [Node::literal("a"), Node::tag(TagKind::Interpolate, ""), Node::literal("b")]);
    }

    #[test]
    fn default_newline_trim() {
        let src = "<% if it.x { %>\nyes\n<% } %>\n";
        let nodes = parse(src, &Config::default()).unwrap();
        assert_eq!(
            nodes,
            [
                Node::tag(TagKind::Execute, "if it.x {"),
                Node::literal(r"yes\n"),
                Node::tag(TagKind::Execute, "}"),
            ]
        );
    }

    #[test]
    fn first_and_last_literal_untrimmed() {
        let config = Config::default().auto_trim(Trim::Slurp, Trim::Slurp);
        let nodes = parse("  a  <%= x %>  b  ", &config).unwrap();
        assert_eq!(nodes, [Node::literal("  a"), Node::tag(TagKind::Interpolate, "x"), Node::literal("b  ")]);
    }

    #[test]
    fn trim_markers_override() {
        let nodes = parse("a \n<%_= x -%>\n\n b", &Config::default()).unwrap();
        assert_eq!(nodes, [Node::literal("a"), Node::tag(TagKind::Interpolate, "x"), Node::literal(r"\n b")]);
    }

    #[test]
    fn slurp_everything() {
        let src = "<%_ if it.x { _%>\n   \t\n<%_= it.y _%>\n  <%_ } _%>";
        let nodes = parse(src, &Config::default()).unwrap();
        assert_eq!(
            nodes,
            [
                Node::tag(TagKind::Execute, "if it.x {"),
                Node::tag(TagKind::Interpolate, "it.y"),
                Node::tag(TagKind::Execute, "}"),
            ]
        );
    }

    #[test]
    fn unclosed_tag() {
        let err = parse("Hi <%= name", &Config::default()).unwrap_err();
        let diag = err.diagnostic().unwrap();
        assert_eq!(diag.offset(), 3);
        assert!(err.to_string().starts_with("unclosed tag at line 1 col 4"));
    }
}

use quill_core::{
    Config, Error, Node, ProcessNodes, TagKind, Trim, compile, compile_to_string, parse,
};

#[test]
fn pure_literal() {
    let src = "<p>\n  it's a \"quote\" \\ and some % text >\n</p>\n";
    let nodes = parse(src, &Config::default()).unwrap();
    assert_eq!(
        nodes,
        [Node::literal(r#"<p>\n  it\'s a "quote" \\ and some % text >\n</p>\n"#)]
    );
}

#[test]
fn classification() {
    let config = Config::default().prefixes(Some('_'), Some('='), Some('~'));
    let nodes = parse("<%= x %><%~ x %><%_ x %>", &config).unwrap();
    assert_eq!(
        nodes,
        [
            Node::tag(TagKind::Interpolate, "x"),
            Node::tag(TagKind::Raw, "x"),
            Node::tag(TagKind::Execute, "x"),
        ]
    );
}

#[test]
fn quote_safety() {
    let nodes = parse(r#"<%= "a %> b" %>"#, &Config::default()).unwrap();
    assert_eq!(nodes, [Node::tag(TagKind::Interpolate, r#""a %> b""#)]);
}

#[test]
fn unclosed_tag() {
    let err = compile("Hi <%= name", &Config::default()).unwrap_err();
    let Error::Parse(diagnostic) = &err else {
        panic!("expected parse error, got {err:?}")
    };
    assert_eq!(diagnostic.offset(), 3);
    assert_eq!(err.to_string(), "unclosed tag at line 1 col 4:\n\n  Hi <%= name\n     ^");
}

#[test]
fn trim_markers_everywhere() {
    let src = "<%_ let x = 1 _%>\n\n   <%_= x _%>  \t\n <%_= x + 1 _%>\n";
    for _ in 0..3 {
        let config = Config::default().include(false);
        let code = compile_to_string(src, &config).unwrap();
        assert_eq!(
            code,
            "let __out = ''\nlet x = 1\n__out += escape(x)\n__out += escape(x + 1)\nreturn __out"
        );
    }
}

#[test]
fn plugin_ordering() {
    let marker = |name: &'static str| {
        ProcessNodes(move |mut nodes: Vec<Node>, _: &Config| {
            nodes.insert(0, Node::literal(name));
            nodes
        })
    };

    let config = Config::default().plugin(marker("P1")).plugin(marker("P2"));

    for _ in 0..3 {
        let nodes = parse("x", &config).unwrap();
        assert_eq!(nodes, [Node::literal("P2"), Node::literal("P1"), Node::literal("x")]);
    }
}

#[test]
fn custom_delimiters() {
    let config = Config::default()
        .tags("{{", "}}")
        .auto_trim(Trim::None, Trim::None)
        .include(false);
    let procedure = compile("{{ for x in it { }}[{{= x }}]{{ } }}", &config).unwrap();
    assert_eq!(procedure.stmts().len(), 3);
    assert!(!procedure.is_async());
}

#[test]
fn syntax_error_display() {
    let err = compile("<% if it.x { %>open", &Config::default().include(false)).unwrap_err();
    let Error::Syntax { diagnostic, code } = &err else {
        panic!("expected syntax error, got {err:?}")
    };
    assert_eq!(diagnostic.message(), "expected `}`, found end of input");
    assert_eq!((diagnostic.line(), diagnostic.column()), (4, 13));
    assert_eq!(
        err.to_string(),
        format!(
            "Bad template syntax\n\n\
            expected `}}`, found end of input at line 4 col 13:\n\n  return __out\n{}^\n\
            {}\n{code}",
            " ".repeat(14),
            "=".repeat("expected `}`, found end of input at line 4 col 13:".len()),
        )
    );
}

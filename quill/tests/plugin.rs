use quill::{Config, Error, Node, ProcessCode, ProcessNodes, Template};
use serde_json::json;

#[test]
fn node_and_code_plugins() {
    let shout = ProcessNodes(|nodes: Vec<Node>, _: &Config| -> Vec<Node> {
        nodes
            .into_iter()
            .map(|node| match node {
                Node::Literal(text) => Node::Literal(text.to_uppercase()),
                node => node,
            })
            .collect()
    });
    let bang = ProcessCode(|code: String, _: &Config| code.replace("return __out", "__out += '!'\nreturn __out"));

    let config = Config::default().plugin(shout).plugin(bang);
    let template = Template::compile("hi <%= it.n %>", &config).unwrap();
    assert_eq!(template.render(&json!({ "n": "Ben" })).unwrap(), "HI Ben!");
}

#[test]
fn malformed_plugin_output() {
    let config = Config::default().plugin(ProcessCode(|_: String, _: &Config| "return (".to_owned()));
    let err = Template::compile("x", &config).unwrap_err();
    let Error::Compile(quill_core::Error::Syntax { code, .. }) = &err else {
        panic!("expected syntax error, got {err:?}")
    };
    assert_eq!(code, "return (");
}

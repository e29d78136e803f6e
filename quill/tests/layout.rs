use quill::{Config, Error, MAX_INCLUDE_DEPTH, Template, Templates, Value};
use serde_json::json;

fn templates(entries: &[(&str, &str)]) -> Templates {
    let mut templates = Templates::new(Config::default());
    for (name, source) in entries {
        templates.define_source(*name, *source);
    }
    templates
}

#[test]
fn include_with_data() {
    let templates = templates(&[
        ("item", "<li><%= it.name %></li>"),
        ("list", "<ul><% for x in it.items { %><%~ include('item', x) %><% } %></ul>"),
    ]);
    let data = json!({ "items": [{ "name": "a" }, { "name": "<b>" }] });
    assert_eq!(
        templates.render("list", &data).unwrap(),
        "<ul><li>a</li><li>&lt;b&gt;</li></ul>"
    );
}

#[test]
fn include_defaults_to_render_data() {
    let templates = templates(&[
        ("header", "<h1><%= it.title %></h1>"),
        ("page", "<%~ include('header') %>body"),
    ]);
    assert_eq!(templates.render("page", &json!({ "title": "T" })).unwrap(), "<h1>T</h1>body");
}

#[test]
fn include_inline_object() {
    let templates = templates(&[
        ("pair", "<%= it.k %>=<%= it.v %>"),
        ("page", "<%~ include('pair', { k: 'a', v: it.n + 1 }) %>"),
    ]);
    assert_eq!(templates.render("page", &json!({ "n": 1 })).unwrap(), "a=2");
}

#[test]
fn layout_with_data() {
    let templates = templates(&[
        ("base", "<title><%= it.title %></title><main><%~ it.body %></main>"),
        ("page", "<% layout('base', { title: 'Home' }) %><p><%= it.user %></p>"),
    ]);
    assert_eq!(
        templates.render("page", &json!({ "user": "Ben" })).unwrap(),
        "<title>Home</title><main><p>Ben</p></main>"
    );
}

#[test]
fn layout_defaults_to_render_data() {
    let templates = templates(&[
        ("base", "<title><%= it.title %></title><%~ it.body %>"),
        ("page", "<% layout('base') %>x"),
    ]);
    assert_eq!(
        templates.render("page", &json!({ "title": "T" })).unwrap(),
        "<title>T</title>x"
    );
}

#[test]
fn layout_anywhere_in_body() {
    let templates = templates(&[
        ("base", "[<%~ it.body %>]"),
        ("page", "a<% layout('base') %>b"),
    ]);
    assert_eq!(templates.render("page", &json!({})).unwrap(), "[ab]");
}

#[test]
fn last_layout_wins() {
    let templates = templates(&[
        ("one", "1<%~ it.body %>"),
        ("two", "2<%~ it.body %>"),
        ("page", "<% layout('one') %><% layout('two') %>x"),
    ]);
    assert_eq!(templates.render("page", &json!({})).unwrap(), "2x");
}

#[test]
fn nested_layouts() {
    let templates = templates(&[
        ("outer", "[<%~ it.body %>]"),
        ("inner", "<% layout('outer') %>(<%~ it.body %>)"),
        ("page", "<% layout('inner') %>x"),
    ]);
    assert_eq!(templates.render("page", &json!({})).unwrap(), "[(x)]");
}

#[test]
fn missing_template() {
    let templates = templates(&[("page", "<%~ include('nope') %>")]);
    let err = templates.render("page", &json!({})).unwrap_err();
    assert!(matches!(&err, Error::NotFound(name) if name == "nope"));
    assert_eq!(err.to_string(), "template `nope` not found");
}

#[test]
fn included_render_error() {
    let templates = templates(&[
        ("broken", "<%= it.a.b %>"),
        ("page", "ok <%~ include('broken') %>"),
    ]);
    let err = templates.render("page", &json!({})).unwrap_err();
    let diagnostic = err.diagnostic().unwrap();
    assert_eq!(diagnostic.message(), "cannot read field `b` of null");
    assert_eq!(diagnostic.snippet(), "__out += escape(it.a.b)");
}

#[test]
fn invalid_template_name() {
    let templates = templates(&[("page", "<%~ include(1) %>")]);
    let err = templates.render("page", &json!({})).unwrap_err();
    assert_eq!(err.diagnostic().unwrap().message(), "template name must be a string, found number");
}

#[test]
fn includes_disabled() {
    let err = Template::compile("<%~ include('x') %>", &Config::default().include(false)).unwrap_err();
    assert_eq!(err.diagnostic().unwrap().message(), "`include` is not enabled");
}

#[test]
fn closure_resolver() {
    let template = Template::compile("<%~ include('a', 1) %><%~ include('b') %>", &Config::default()).unwrap();
    let resolver = |name: &str, data: &Value| -> quill::Result<String> { Ok(format!("<{name}:{data}>")) };
    let output = template.render_with(&json!({ "x": true }), &resolver).unwrap();
    assert_eq!(output, r#"<a:1><b:{"x":true}>"#);
}

#[test]
fn predefined_template() {
    let mut templates = Templates::new(Config::default());
    let config = Config::default().var_name("data");
    templates.define("item", Template::compile("<%= data %>", &config).unwrap());
    templates.define_source("page", "<%~ include('item', 'x') %>");
    assert_eq!(templates.render("page", &()).unwrap(), "x");
}

#[test]
fn self_include_stops() {
    let templates = templates(&[("a", "<%~ include('a') %>")]);
    let err = templates.render("a", &json!({})).unwrap_err();
    assert!(matches!(err, Error::Render { .. }));
    assert_eq!(
        err.diagnostic().unwrap().message(),
        format!("including `a` exceeds the include depth limit of {MAX_INCLUDE_DEPTH}")
    );
}

#[test]
fn bounded_recursion() {
    let templates = templates(&[("r", "<% if it.n > 0 { %><%~ include('r', { n: it.n - 1 }) %><% } %>.")]);
    assert_eq!(templates.render("r", &json!({ "n": 10 })).unwrap(), ".".repeat(11));
    assert_eq!(templates.render("r", &json!({ "n": MAX_INCLUDE_DEPTH })).unwrap().len(), MAX_INCLUDE_DEPTH + 1);

    let err = templates.render("r", &json!({ "n": 50 })).unwrap_err();
    assert!(err.diagnostic().unwrap().message().contains("include depth limit"));
}

#[test]
fn layout_cycle_stops() {
    let templates = templates(&[("a", "<% layout('b') %>a"), ("b", "<% layout('a') %>b")]);
    let err = templates.render("a", &json!({})).unwrap_err();
    assert!(err.diagnostic().unwrap().message().contains("include depth limit"));
}

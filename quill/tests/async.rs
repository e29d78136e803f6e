use std::sync::Arc;

use quill::{AsyncResolver, Config, Error, NoResolver, Template, Templates, Value};
use serde_json::json;

/// Suspends once before every resolution.
struct Yielding;

impl AsyncResolver for Yielding {
    async fn resolve(&self, name: &str, data: &Value) -> quill::Result<String> {
        tokio::task::yield_now().await;
        Ok(format!("[{name}:{data}]"))
    }
}

fn async_config() -> Config {
    Config::default().async_mode(true)
}

#[tokio::test]
async fn await_include() {
    let template = Template::compile("1<%~ await include('a', 0) %>2<%~ await include('b', 0) %>3", &async_config()).unwrap();
    let output = template.render_async(&json!({}), &Yielding).await.unwrap();
    assert_eq!(output, "1[a:0]2[b:0]3");
}

#[tokio::test]
async fn async_registry() {
    let mut templates = Templates::new(async_config());
    templates.define_source("base", "<main><%~ it.body %></main>");
    templates.define_source("part", "p<%= it.n %>");
    templates.define_source("page", "<% layout('base') %>A<%~ await include('part') %>B");

    let output = templates.render_async("page", &json!({ "n": 1 })).await.unwrap();
    assert_eq!(output, "<main>Ap1B</main>");

    assert!(matches!(templates.render("page", &json!({})), Err(Error::AsyncTemplate)));
}

#[tokio::test]
async fn sync_template_async_render() {
    let template = Template::compile("<%~ include('x') %>!", &Config::default()).unwrap();
    let output = template.render_async(&json!(null), &Yielding).await.unwrap();
    assert_eq!(output, "[x:null]!");
}

#[tokio::test]
async fn same_result_every_convention() {
    let template = Template::compile("<% for x in it { %><%= x * 2 %>,<% } %>", &Config::default()).unwrap();
    let data = json!([1, 2, 3]);

    let sync = template.render(&data).unwrap();
    let callback = template.render_callback(&data, &NoResolver, |_, _| {}).unwrap();
    let promise = template.render_async(&data, &NoResolver).await.unwrap();

    assert_eq!(sync, "2,4,6,");
    assert_eq!(callback, sync);
    assert_eq!(promise, sync);
}

#[tokio::test]
async fn async_render_error() {
    let template = Template::compile("<%~ await include(it.name) %>", &async_config()).unwrap();
    let err = template.render_async(&json!({}), &Yielding).await.unwrap_err();
    assert_eq!(err.diagnostic().unwrap().message(), "template name must be a string, found null");

    let template = Template::compile("<%~ await include('x') %>", &async_config()).unwrap();
    let err = template.render_async(&json!({}), &NoResolver).await.unwrap_err();
    assert!(matches!(err, Error::NoResolver));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn render_on_spawned_task() {
    let mut templates = Templates::new(async_config());
    templates.define_source("part", "p");
    templates.define_source("page", "[<%~ await include('part') %>]");
    let templates = Arc::new(templates);

    let task = tokio::spawn({
        let templates = templates.clone();
        async move { templates.render_async("page", &json!({})).await }
    });
    assert_eq!(task.await.unwrap().unwrap(), "[p]");

    let template = templates.get("page").unwrap();
    let task = tokio::spawn(async move { template.render_async(&json!({}), &Yielding).await });
    assert_eq!(task.await.unwrap().unwrap(), "[[part:{}]]");
}

#[tokio::test]
async fn async_include_depth() {
    let mut templates = Templates::new(async_config());
    templates.define_source("a", "<%~ await include('a') %>");
    let err = templates.render_async("a", &json!({})).await.unwrap_err();
    assert!(err.diagnostic().unwrap().message().contains("include depth limit"));
}

#[test]
fn await_requires_async_mode() {
    let err = Template::compile("<%~ await include('x') %>", &Config::default()).unwrap_err();
    assert_eq!(err.diagnostic().unwrap().message(), "`await` is only allowed in async templates");
}

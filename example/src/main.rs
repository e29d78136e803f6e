use std::{
    fs,
    io::{BufRead, stdin},
    path::Path,
};

use quill::{Config, Render, Template, Templates};
use serde::Serialize;
use serde_json::json;

#[derive(Serialize, Template)]
#[template(source = "<div>Inlined <%= it.name %></div>")]
struct Inline {
    name: String,
}

/// Register every file in `templates/` by its stem.
fn load(dir: &Path) -> std::io::Result<Templates> {
    let mut templates = Templates::new(Config::default()).cache(false);
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let Some(name) = path.file_stem().and_then(|e| e.to_str()) else {
            continue;
        };
        log::info!("registering `{name}`");
        templates.define_source(name.to_owned(), fs::read_to_string(&path)?);
    }
    Ok(templates)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("templates");

    loop {
        // sources are read again on every render, edit them and press enter
        let templates = load(&dir)?;

        let data = json!({
            "year": 2025,
            "users": [
                { "name": "<script>alert('foo')</script>", "admin": false },
                { "name": "Ben", "admin": true },
            ],
        });

        match templates.render("users", &data) {
            Ok(output) => println!("{output}"),
            Err(err) => eprintln!("{err}"),
        }

        println!("{}", Inline { name: format!("foo {}", 4) }.render()?);
        println!("[Press ENTER to re render, q to quit]");

        let mut buf = String::new();
        stdin().lock().read_line(&mut buf)?;

        if buf.trim() == "q" {
            break Ok(());
        }
    }
}

//! macros for `quill` template
mod attribute;
mod shared;
mod template;

/// derive macro for `Render` trait
///
/// ```ignore
/// #[derive(Serialize, Template)]
/// #[template(source = "Hi <%= it.name %>")]
/// struct Greet {
///     name: String,
/// }
/// ```
#[proc_macro_derive(Template, attributes(template))]
pub fn template(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    match template::template(syn::parse_macro_input!(input as syn::DeriveInput)) {
        Ok(ok) => ok.into(),
        Err(err) => err.into_compile_error().into(),
    }
}

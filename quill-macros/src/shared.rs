// ===== Namespace =====

/// `ToTokens` for public name
pub struct QuillRender;

impl quote::ToTokens for QuillRender {
    fn to_tokens(&self, tokens: &mut proc_macro2::TokenStream) {
        quote::quote! {::quill::Render}.to_tokens(tokens);
    }
}

/// `ToTokens` for public name
pub struct QuillTemplate;

impl quote::ToTokens for QuillTemplate {
    fn to_tokens(&self, tokens: &mut proc_macro2::TokenStream) {
        quote::quote! {::quill::Template}.to_tokens(tokens);
    }
}

// ===== macros =====

/// Everything will return `Result<T, syn::Error>`
///
/// `error!(?option, "{}", error)`, unwrap option with error as standard `format!`.
///
/// `error!(attr, "`{path}`: {}")`, standard `format!` with `attr`s span.
///
/// `error!("{}", error)`, standard `format!` with call site span.
macro_rules! error {
    (@ $s:expr, $($tt:tt)*) => {
        return Err(syn::Error::new($s, format!($($tt)*)))
    };
    (?$s:expr, $($tt:tt)*) => {
        match $s { Some(ok) => ok, None => crate::shared::error!($($tt)*), }
    };
    ($s:expr, $($tt:tt)*) => {
        crate::shared::error!(@ syn::spanned::Spanned::span(&$s), $($tt)*)
    };
    ($($tt:tt)*) => {
        crate::shared::error!(@ proc_macro2::Span::call_site(), $($tt)*)
    };
}

pub(crate) use error;

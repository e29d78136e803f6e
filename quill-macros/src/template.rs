//! `Template` derive macro
use proc_macro2::TokenStream;
use quote::quote;
use syn::*;

use crate::{
    attribute::{Metadata, Source},
    shared::{QuillRender, QuillTemplate, error},
};

/// output code can be split to 3 parts:
///
/// 1. source, for file template, an `include_str` to trigger recompile on template change
/// 2. config, the builder chain mirroring the attribute
/// 3. the `OnceLock` holding the compiled template
///
/// the template is compiled once here, so syntax errors are reported at compile time
pub fn template(input: DeriveInput) -> Result<TokenStream> {
    let DeriveInput { attrs, ident, generics, .. } = input;

    let (g1, g2, g3) = generics.split_for_impl();

    let meta = Metadata::from_attrs(&attrs)?;

    // validate
    let config = config(&meta);
    if let Err(err) = quill_core::compile(&meta.read_source()?, &config) {
        error!(@ meta.span, "{err}");
    }

    // 1. source
    let source = match &meta.source {
        Source::Inline(source) => quote! { #source },
        Source::File(path) => quote! { ::std::include_str!(#path) },
    };

    // 2. config
    let config = config_tokens(&meta);

    // 3. the template
    Ok(quote! {
        #[automatically_derived]
        impl #g1 #QuillRender for #ident #g2 #g3 {
            fn template() -> &'static #QuillTemplate {
                static TEMPLATE: ::std::sync::OnceLock<#QuillTemplate> = ::std::sync::OnceLock::new();
                TEMPLATE.get_or_init(|| {
                    let config = #config;
                    #QuillTemplate::compile(#source, &config)
                        .expect("template is checked at compile time")
                })
            }
        }
    })
}

fn config(meta: &Metadata) -> quill_core::Config {
    let mut config = quill_core::Config::default();
    if let Some(var) = &meta.var {
        config = config.var_name(var.as_str());
    }
    if let Some(escape) = meta.escape {
        config = config.auto_escape(escape);
    }
    if let Some(use_with) = meta.use_with {
        config = config.use_with(use_with);
    }
    if let Some(rm_whitespace) = meta.rm_whitespace {
        config = config.rm_whitespace(rm_whitespace);
    }
    if let Some((open, close)) = &meta.tags {
        config = config.tags(open.as_str(), close.as_str());
    }
    config
}

fn config_tokens(meta: &Metadata) -> TokenStream {
    let mut tokens = quote! { ::quill::Config::default() };
    if let Some(var) = &meta.var {
        tokens.extend(quote! { .var_name(#var) });
    }
    if let Some(escape) = meta.escape {
        tokens.extend(quote! { .auto_escape(#escape) });
    }
    if let Some(use_with) = meta.use_with {
        tokens.extend(quote! { .use_with(#use_with) });
    }
    if let Some(rm_whitespace) = meta.rm_whitespace {
        tokens.extend(quote! { .rm_whitespace(#rm_whitespace) });
    }
    if let Some((open, close)) = &meta.tags {
        tokens.extend(quote! { .tags(#open, #close) });
    }
    tokens
}

use super::derived_trait_names;
use fxhash::FxHashSet;
use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::parse::Parser;
use syn::punctuated::Punctuated;
use syn::{Attribute, Expr, ItemFn, ItemStruct, Lit, LitStr, Meta, MetaNameValue, Token};

const DEFAULT_RENAME: &str = "camelCase";

#[derive(Default)]
struct ModelOptions {
    rename_all: Option<LitStr>,
    deny_unknown_fields: Option<bool>,
}

/// Serde settings already written on the struct by hand.
#[derive(Default)]
struct ExistingSerde {
    rename_all: Option<LitStr>,
    deny_unknown_fields: bool,
}

pub fn expand_api_model(args: TokenStream, input: ItemStruct) -> TokenStream {
    match model_attributes(args, &input) {
        Ok(extra) => quote! {
            #extra
            #input
        },
        Err(err) => err.to_compile_error(),
    }
}

pub fn expand_api_handler(args: TokenStream, input: ItemFn) -> TokenStream {
    let ItemFn { attrs, vis, sig, block } = input;

    quote! {
        #(#attrs)*
        #[allow(clippy::unused_async)]
        #[cfg_attr(feature = "server", ::utoipa::path(#args))]
        #vis #sig #block
    }
}

fn model_attributes(args: TokenStream, input: &ItemStruct) -> syn::Result<TokenStream> {
    let options = parse_options(args)?;
    let existing = existing_serde(&input.attrs)?;
    let derives = derived_trait_names(&input.attrs);

    let derive = missing_derives(&derives);
    let schema = if derives.contains("ToSchema") {
        quote!()
    } else {
        quote!(#[cfg_attr(feature = "server", derive(::utoipa::ToSchema))])
    };

    let wanted_rename =
        options.rename_all.unwrap_or_else(|| LitStr::new(DEFAULT_RENAME, Span::call_site()));
    let rename = match &existing.rename_all {
        Some(current) if current.value() != wanted_rename.value() => {
            return Err(syn::Error::new_spanned(
                current,
                "serde(rename_all) disagrees with api_model(rename_all)",
            ));
        },
        Some(_) => quote!(),
        None => quote!(#[serde(rename_all = #wanted_rename)]),
    };

    let deny = options.deny_unknown_fields.unwrap_or(true);
    let strict = match (deny, existing.deny_unknown_fields) {
        (false, true) => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "serde(deny_unknown_fields) is set by hand; drop it to relax the model",
            ));
        },
        (true, false) => quote!(#[serde(deny_unknown_fields)]),
        _ => quote!(),
    };

    Ok(quote! {
        #derive
        #schema
        #rename
        #strict
    })
}

fn missing_derives(derives: &FxHashSet<String>) -> TokenStream {
    let wanted = [
        ("Debug", quote!(Debug)),
        ("Serialize", quote!(::serde::Serialize)),
        ("Deserialize", quote!(::serde::Deserialize)),
    ];
    let missing: Vec<_> =
        wanted.into_iter().filter(|(name, _)| !derives.contains(*name)).map(|(_, t)| t).collect();

    if missing.is_empty() { quote!() } else { quote!(#[derive(#(#missing),*)]) }
}

fn parse_options(args: TokenStream) -> syn::Result<ModelOptions> {
    let metas = Punctuated::<Meta, Token![,]>::parse_terminated.parse2(args)?;
    let mut options = ModelOptions::default();

    for meta in metas {
        let Meta::NameValue(pair) = meta else {
            return Err(syn::Error::new_spanned(meta, "expected `key = value`"));
        };

        if pair.path.is_ident("rename_all") {
            let value = string_value(&pair)?;
            if options.rename_all.replace(value).is_some() {
                return Err(syn::Error::new_spanned(&pair, "rename_all given twice"));
            }
        } else if pair.path.is_ident("deny_unknown_fields") {
            let value = bool_value(&pair)?;
            if options.deny_unknown_fields.replace(value).is_some() {
                return Err(syn::Error::new_spanned(&pair, "deny_unknown_fields given twice"));
            }
        } else {
            return Err(syn::Error::new_spanned(
                &pair.path,
                "unknown api_model option; supported: rename_all, deny_unknown_fields",
            ));
        }
    }

    Ok(options)
}

fn string_value(pair: &MetaNameValue) -> syn::Result<LitStr> {
    if let Expr::Lit(expr) = &pair.value {
        if let Lit::Str(lit) = &expr.lit {
            return Ok(lit.clone());
        }
    }
    Err(syn::Error::new_spanned(&pair.value, "expected a string literal"))
}

fn bool_value(pair: &MetaNameValue) -> syn::Result<bool> {
    if let Expr::Lit(expr) = &pair.value {
        if let Lit::Bool(lit) = &expr.lit {
            return Ok(lit.value);
        }
    }
    Err(syn::Error::new_spanned(&pair.value, "expected `true` or `false`"))
}

fn existing_serde(attrs: &[Attribute]) -> syn::Result<ExistingSerde> {
    let mut found = ExistingSerde::default();

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                found.rename_all = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("deny_unknown_fields") {
                found.deny_unknown_fields = true;
            } else if meta.input.peek(Token![=]) {
                let _: Expr = meta.value()?.parse()?;
            } else if meta.input.peek(syn::token::Paren) {
                let _content;
                syn::parenthesized!(_content in meta.input);
            }
            Ok(())
        })?;
    }

    Ok(found)
}

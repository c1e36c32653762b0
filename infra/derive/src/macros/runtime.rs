use proc_macro2::TokenStream;
use quote::quote;
use syn::{Error, ItemFn, ReturnType, Type};

pub fn expand_main(args: TokenStream, input: ItemFn) -> TokenStream {
    if input.sig.asyncness.is_none() {
        return Error::new_spanned(&input.sig.fn_token, "folio_runtime::main needs an async fn")
            .to_compile_error();
    }
    if !input.sig.inputs.is_empty() {
        return Error::new_spanned(&input.sig.inputs, "folio_runtime::main takes no arguments")
            .to_compile_error();
    }
    if !is_result(&input.sig.output) {
        return Error::new_spanned(&input.sig.output, "folio_runtime::main must return a Result")
            .to_compile_error();
    }

    let profile = match profile_constructor(args) {
        Ok(profile) => profile,
        Err(err) => return err.to_compile_error(),
    };

    let ItemFn { attrs, vis, sig, block } = input;
    let ident = &sig.ident;
    let output = &sig.output;

    quote! {
        #(#attrs)*
        #vis fn #ident() #output {
            let runtime_config = #profile;
            let runtime = ::folio_runtime::build_runtime_with_config(&runtime_config)?;
            runtime.block_on(async move #block)
        }
    }
}

fn profile_constructor(args: TokenStream) -> syn::Result<TokenStream> {
    if args.is_empty() {
        return Ok(quote!(::folio_runtime::RuntimeConfig::default()));
    }

    let profile: syn::Ident = syn::parse2(args)?;
    let constructor = match profile.to_string().as_str() {
        "default" => quote!(::folio_runtime::RuntimeConfig::default()),
        "high_performance" => quote!(::folio_runtime::RuntimeConfig::high_performance()),
        "memory_efficient" => quote!(::folio_runtime::RuntimeConfig::memory_efficient()),
        _ => {
            return Err(Error::new_spanned(
                profile,
                "expected one of: default, high_performance, memory_efficient",
            ));
        },
    };
    Ok(constructor)
}

fn is_result(output: &ReturnType) -> bool {
    let ReturnType::Type(_, ty) = output else {
        return false;
    };
    let Type::Path(path) = ty.as_ref() else {
        return false;
    };
    path.path.segments.last().is_some_and(|segment| segment.ident == "Result")
}

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Fields, ItemStruct};

pub fn expand_slice(input: ItemStruct) -> TokenStream {
    if !matches!(input.fields, Fields::Named(_)) {
        return syn::Error::new_spanned(&input.ident, "folio_slice expects a struct with named fields")
            .to_compile_error();
    }

    let handle = &input.ident;
    let state = format_ident!("{handle}Inner");
    let vis = &input.vis;
    let fields = &input.fields;
    let attrs = &input.attrs;
    let slice_name = handle.to_string().to_lowercase();

    quote! {
        #(#attrs)*
        #[derive(Debug)]
        #vis struct #state #fields

        #[derive(Debug, Clone)]
        #vis struct #handle(std::sync::Arc<#state>);

        impl #handle {
            #[must_use]
            pub fn new(state: #state) -> Self {
                Self(std::sync::Arc::new(state))
            }
        }

        impl std::ops::Deref for #handle {
            type Target = #state;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        #[automatically_derived]
        impl ::folio_kernel::domain::registry::FeatureSlice for #handle {
            fn name(&self) -> &'static str {
                #slice_name
            }

            fn as_any(&self) -> &dyn std::any::Any {
                self
            }
        }
    }
}

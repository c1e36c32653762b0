#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by every Folio crate.
//!
//! * [`macro@folio_error`] turns a struct-variant enum into a `thiserror` error with a
//!   `.context(...)` extension trait.
//! * [`macro@folio_slice`] wraps feature state into a cheap-to-clone slice handle.
//! * [`macro@api_model`] and [`macro@api_handler`] keep DTOs and Axum handlers consistent
//!   with the `OpenAPI` document.
//! * [`macro@main`] boots the tuned Tokio runtime from `folio-runtime`.
//!
//! Examples are `ignore`d here because a proc-macro crate cannot use its own macros;
//! the consuming crates carry the real tests.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemFn, ItemStruct, parse_macro_input};

/// Turns an `async fn main` into a blocking `fn main` running on a `folio-runtime` profile.
///
/// Accepted profiles: `high_performance`, `memory_efficient`, `default` (or no argument).
/// The function must return a `Result`.
///
/// ```rust,ignore
/// #[folio_runtime::main(high_performance)]
/// async fn main() -> anyhow::Result<()> {
///     Ok(())
/// }
/// ```
#[proc_macro_attribute]
pub fn main(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::runtime::expand_main(args.into(), input).into()
}

/// Declares an API data model (request/response DTO).
///
/// Injects `Debug`, `Serialize`, `Deserialize` when missing, `utoipa::ToSchema` when the
/// consuming crate builds with its `server` feature, and the serde policy
/// `rename_all = "camelCase"` plus `deny_unknown_fields`. Both knobs can be overridden:
///
/// ```rust,ignore
/// #[api_model(rename_all = "snake_case", deny_unknown_fields = false)]
/// pub struct UploadResponse {
///     pub url: String,
/// }
/// ```
#[proc_macro_attribute]
pub fn api_model(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::api::expand_api_model(attr.into(), input).into()
}

/// Registers an Axum handler in the `OpenAPI` document.
///
/// Arguments are forwarded verbatim to `utoipa::path` (only under the `server` feature).
///
/// ```rust,ignore
/// #[api_handler(get, path = "/settings", responses((status = OK)), tag = SETTINGS_TAG)]
/// pub async fn read_settings() -> impl IntoResponse { /* ... */ }
/// ```
#[proc_macro_attribute]
pub fn api_handler(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::api::expand_api_handler(args.into(), input).into()
}

/// Defines a domain error enum.
///
/// # Generated items
///
/// * `#[derive(Debug, thiserror::Error)]` unless already derived.
/// * `<Name>Ext<T>` with `.context(...)` for `Result<T, Name>` and for
///   `Result<T, Source>` of every variant holding a `source` field.
/// * `From<Source>` for every variant holding a `source` field.
/// * `From<&'static str>` / `From<String>` when an `Internal { message, context }`
///   variant exists.
/// * A module-private `format_context` helper used inside `#[error(...)]` strings.
///
/// # Requirements
///
/// Variants must use named fields; variants with a `source` must also carry
/// `context: Option<Cow<'static, str>>`.
///
/// ```rust,ignore
/// #[folio_derive::folio_error]
/// pub enum StoreError {
///     #[error("I/O failure{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///     #[error("Internal store error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
/// ```
#[proc_macro_attribute]
pub fn folio_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}

/// Defines a vertical-slice handle.
///
/// `pub struct Settings { .. }` becomes `SettingsInner { .. }` plus an `Arc`-backed
/// `Settings` handle with `new`, `Deref<Target = SettingsInner>` and the kernel's
/// `FeatureSlice` marker, ready for registration in the API state.
///
/// ```rust,ignore
/// #[folio_derive::folio_slice]
/// pub struct Settings {
///     pub collection: Collection,
/// }
/// ```
#[proc_macro_attribute]
pub fn folio_slice(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::slice::expand_slice(input).into()
}

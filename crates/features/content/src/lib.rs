//! Portfolio section content.
//!
//! Twelve resources (hero, about, skills, educations, ...) share one generic CRUD
//! contract. The homepage and the admin screens consume them; the visibility registry in
//! `folio-settings` decides which of them the homepage mounts.
//!
//! * `server` (feature): `/{resource}` and `/{resource}/{id}` over the document store.
//! * `client` (feature): [`client::ContentClient`] with typed entries from `folio-domain`.

#[cfg(feature = "client")]
pub mod client;
mod error;
#[cfg(feature = "server")]
pub mod server;

pub use error::{ContentError, ContentErrorExt};

#[cfg(feature = "server")]
pub use server::{Content, ContentRecord, init, router};

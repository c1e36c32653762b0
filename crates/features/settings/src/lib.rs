//! Section visibility registry.
//!
//! One remote document maps every toggleable homepage section to `visible` or `hidden`.
//!
//! * `server` (feature): the `GET/POST /settings` resource backed by the document store.
//! * `client` (feature): [`client::SettingsEditor`] for the admin screen and
//!   [`gate::HomePage`] for the public homepage.
//! * [`gate::should_render`] and [`gate::compose`] decide what the homepage mounts.

#[cfg(feature = "client")]
pub mod client;
mod error;
pub mod gate;
#[cfg(feature = "server")]
pub mod server;

pub use error::{SettingsError, SettingsErrorExt};
pub use gate::{HomeSection, compose, should_render};

#[cfg(feature = "server")]
pub use server::{Settings, SettingsDocument, init, router};

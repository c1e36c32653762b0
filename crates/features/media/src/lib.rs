//! Image hosting.
//!
//! Section records store image URLs, never bytes. [`ImageHost`] pushes a file to an
//! imgbb-compatible host and returns the public URL; with the `server` feature the same
//! host sits behind `POST /upload` so browser front-ends never see the host key.

mod error;
mod host;
#[cfg(feature = "server")]
pub mod server;

pub use error::{MediaError, MediaErrorExt};
pub use host::ImageHost;

#[cfg(feature = "server")]
pub use server::{Media, UploadResponse, init, router};

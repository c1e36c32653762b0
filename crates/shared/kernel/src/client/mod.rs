//! HTTP plumbing for the admin and public surfaces.

mod error;
mod http;
mod notice;
mod scope;

pub use error::{ClientError, ClientErrorExt};
pub use http::ApiClient;
pub use notice::{Notice, NoticeLevel};
pub use scope::ViewScope;

//! Names shared between the server, the clients and the `OpenAPI` document.

pub const SYSTEM_TAG: &str = "System";
pub const SETTINGS_TAG: &str = "Settings";
pub const CONTENT_TAG: &str = "Content";
pub const MEDIA_TAG: &str = "Media";

/// Store collection holding the visibility registry.
pub const SETTINGS_COLLECTION: &str = "settings";
/// The registry is a single document.
pub const SETTINGS_DOCUMENT: &str = "section-flags";

pub const ID_FIELD: &str = "_id";
pub const CREATED_AT_FIELD: &str = "createdAt";

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:4583";
pub const DEFAULT_IMAGE_HOST: &str = "https://api.imgbb.com";

/// Route of the visibility registry.
pub const SETTINGS_PATH: &str = "/settings";
/// Route of the image upload proxy.
pub const UPLOAD_PATH: &str = "/upload";

//! Facade crate for the Folio feature slices and shared modules.
//! Re-exports domain/kernel primitives and aggregates slice initialization.
//! Keep this crate thin: it composes other crates, it does not implement business logic.
//!
//! ## Usage
//! - Add `folio` with the desired feature flags (`server`/`client`).
//! - Call `folio::server::init` to build every slice and `folio::server::router` for
//!   their routes.

use std::borrow::Cow;

pub use folio_domain as domain;
pub use folio_kernel as kernel;

/// Feature registry for runtime introspection.
pub mod features {
    pub use folio_content as content;
    pub use folio_media as media;
    pub use folio_settings as settings;

    /// Build-time enabled features (by Cargo feature).
    pub const ENABLED: &[&str] = &[
        #[cfg(feature = "server")]
        "server",
        #[cfg(feature = "client")]
        "client",
        "settings",
        "content",
        "media",
    ];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

#[folio_derive::folio_error]
pub enum FolioError {
    #[error("Settings slice failed{}: {source}", format_context(.context))]
    Settings { source: folio_settings::SettingsError, context: Option<Cow<'static, str>> },
    #[error("Content slice failed{}: {source}", format_context(.context))]
    Content { source: folio_content::ContentError, context: Option<Cow<'static, str>> },
    #[error("Media slice failed{}: {source}", format_context(.context))]
    Media { source: folio_media::MediaError, context: Option<Cow<'static, str>> },
    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

#[cfg(feature = "server")]
pub mod server {
    use super::FolioError;
    use crate::domain::config::ApiConfig;
    use crate::domain::registry::InitializedSlice;
    use crate::features::{content, media, settings};
    use folio_kernel::server::state::ApiState;
    use folio_store::Store;
    use utoipa_axum::router::OpenApiRouter;

    pub use folio_kernel::server::system_router;

    /// Initialize every slice for server mode.
    pub fn init(config: &ApiConfig, store: &Store) -> Result<Vec<InitializedSlice>, FolioError> {
        let slices = vec![settings::init(store)?, content::init(store)?, media::init(&config.media)?];

        tracing::info!(count = slices.len(), "Feature slices initialized");
        Ok(slices)
    }

    /// Routes of every slice plus the system routes.
    pub fn router() -> OpenApiRouter<ApiState> {
        system_router::<ApiState>()
            .merge(settings::router())
            .merge(media::router())
            .merge(content::router())
    }
}

use std::borrow::Cow;

/// A specialized [`SettingsError`] enum of this crate.
#[folio_derive::folio_error]
pub enum SettingsError {
    /// The submitted registry document breaks the key-naming or value contract.
    #[error("Invalid section flags{}: {message}", format_context(.context))]
    Rejected { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[cfg(feature = "server")]
    #[error("Settings storage failure{}: {source}", format_context(.context))]
    Store { source: folio_store::StoreError, context: Option<Cow<'static, str>> },

    #[error("Internal settings error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

#[cfg(feature = "server")]
mod response {
    use super::SettingsError;
    use axum::response::{IntoResponse, Response};
    use folio_kernel::server::error::{ApiErrorBody, ErrorCode};

    impl From<SettingsError> for ApiErrorBody {
        fn from(err: SettingsError) -> Self {
            match err {
                SettingsError::Rejected { message, .. } => {
                    tracing::warn!(%message, "Section flags rejected");
                    Self::new(ErrorCode::ValidationFailed, message)
                },
                other => {
                    tracing::error!(error = %other, "Settings request failed");
                    Self::internal()
                },
            }
        }
    }

    impl IntoResponse for SettingsError {
        fn into_response(self) -> Response {
            ApiErrorBody::from(self).into_response()
        }
    }
}

use std::borrow::Cow;

/// A specialized [`MediaError`] enum of this crate.
#[folio_derive::folio_error]
pub enum MediaError {
    /// No image host key is configured.
    #[error("Image uploads are not configured{}: {message}", format_context(.context))]
    NotConfigured { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The upload request itself is unusable (no `image` part, not multipart, empty file).
    #[error("Invalid upload{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The image host refused the file or answered without a URL.
    #[error("Image host rejected the upload{}: {message}", format_context(.context))]
    Upstream { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Image host unreachable{}: {source}", format_context(.context))]
    Network { source: reqwest::Error, context: Option<Cow<'static, str>> },

    #[error("Unexpected image host response{}: {source}", format_context(.context))]
    Decode { source: serde_json::Error, context: Option<Cow<'static, str>> },

    #[error("Internal media error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

#[cfg(feature = "server")]
mod response {
    use super::MediaError;
    use axum::response::{IntoResponse, Response};
    use folio_kernel::server::error::{ApiErrorBody, ErrorCode};

    impl From<MediaError> for ApiErrorBody {
        fn from(err: MediaError) -> Self {
            match &err {
                MediaError::NotConfigured { .. } => {
                    Self::new(ErrorCode::Unavailable, "image uploads are not configured")
                },
                MediaError::Validation { message, .. } => {
                    Self::new(ErrorCode::ValidationFailed, message.clone())
                },
                MediaError::Upstream { .. } | MediaError::Network { .. } | MediaError::Decode { .. } => {
                    tracing::warn!(error = %err, "Image host failed");
                    Self::new(ErrorCode::UpstreamFailed, err.to_string())
                },
                MediaError::Internal { .. } => {
                    tracing::error!(error = %err, "Upload failed");
                    Self::internal()
                },
            }
        }
    }

    impl IntoResponse for MediaError {
        fn into_response(self) -> Response {
            ApiErrorBody::from(self).into_response()
        }
    }
}

use std::borrow::Cow;

/// A specialized [`ContentError`] enum of this crate.
#[folio_derive::folio_error]
pub enum ContentError {
    /// The path segment names no content collection.
    #[error("Unknown content resource{}: {message}", format_context(.context))]
    UnknownResource { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Record not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Required fields are absent or blank, or the body is not a JSON object.
    #[error("Invalid record{}: {message}", format_context(.context))]
    Validation {
        message: Cow<'static, str>,
        fields: Vec<&'static str>,
        context: Option<Cow<'static, str>>,
    },

    /// A singleton resource already holds its record.
    #[error("Record already exists{}: {message}", format_context(.context))]
    Conflict { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[cfg(feature = "server")]
    #[error("Content storage failure{}: {source}", format_context(.context))]
    Store { source: folio_store::StoreError, context: Option<Cow<'static, str>> },

    #[error("Internal content error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl ContentError {
    pub fn missing(resource: &str, fields: Vec<&'static str>) -> Self {
        Self::Validation {
            message: format!("{resource}: missing required fields: {}", fields.join(", ")).into(),
            fields,
            context: None,
        }
    }
}

#[cfg(feature = "server")]
mod response {
    use super::ContentError;
    use axum::response::{IntoResponse, Response};
    use folio_kernel::server::error::{ApiErrorBody, ErrorCode};

    impl From<ContentError> for ApiErrorBody {
        fn from(err: ContentError) -> Self {
            match err {
                ContentError::UnknownResource { message, .. } | ContentError::NotFound { message, .. } => {
                    Self::not_found(message)
                },
                ContentError::Validation { message, fields, .. } => {
                    tracing::warn!(%message, "Content record rejected");
                    let body = Self::new(ErrorCode::ValidationFailed, message);
                    if fields.is_empty() { body } else { body.with_details(fields) }
                },
                ContentError::Conflict { message, .. } => Self::new(ErrorCode::Conflict, message),
                other => {
                    tracing::error!(error = %other, "Content request failed");
                    Self::internal()
                },
            }
        }
    }

    impl IntoResponse for ContentError {
        fn into_response(self) -> Response {
            ApiErrorBody::from(self).into_response()
        }
    }
}

use std::borrow::Cow;

/// Everything a client call can fail with. None of these are fatal: surfaces turn them
/// into a [`Notice`](super::Notice) and the operator repeats the action.
#[folio_derive::folio_error]
pub enum ClientError {
    /// The request never completed (DNS, refused connection, TLS, reset).
    #[error("Network error{}: {source}", format_context(.context))]
    Network { source: reqwest::Error, context: Option<Cow<'static, str>> },

    /// The server answered with a non-2xx status.
    #[error("Server responded {status}{}: {message}", format_context(.context))]
    Server { status: u16, message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Rejected locally before anything was sent.
    #[error("Validation failed{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Unexpected response body{}: {source}", format_context(.context))]
    Decode { source: serde_json::Error, context: Option<Cow<'static, str>> },

    /// The owning view was torn down before the response arrived.
    #[error("Request cancelled{}", format_context(.context))]
    Cancelled { context: Option<Cow<'static, str>> },

    /// Another load or save is still in flight.
    #[error("Busy{}: {message}", format_context(.context))]
    Busy { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal client error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl ClientError {
    /// HTTP status for [`ClientError::Server`].
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn validation(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Validation { message: message.into(), context: None }
    }

    #[must_use]
    pub const fn cancelled() -> Self {
        Self::Cancelled { context: None }
    }
}

//! `POST /upload`: forwards one multipart image to the configured host.

use crate::error::MediaError;
use crate::host::ImageHost;
use axum::Json;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use folio_derive::{api_handler, api_model};
use folio_domain::config::MediaConfig;
use folio_domain::constants::MEDIA_TAG;
use folio_kernel::domain::registry::InitializedSlice;
use folio_kernel::server::error::ApiErrorBody;
use folio_kernel::server::state::ApiState;
use tracing::{info, warn};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// Largest accepted request body.
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Upload proxy state. Without a host every upload is refused with `503`.
#[folio_derive::folio_slice]
pub struct Media {
    host: Option<ImageHost>,
}

pub fn init(config: &MediaConfig) -> Result<InitializedSlice, MediaError> {
    let host = ImageHost::from_config(config);
    match &host {
        Some(host) => info!(endpoint = host.endpoint(), "Media server slice initialized"),
        None => warn!("No image host key configured; POST /upload answers 503"),
    }

    Ok(InitializedSlice::new(Media::new(MediaInner { host })))
}

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(upload_image))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct UploadResponse {
    /// Public URL of the hosted image.
    pub url: String,
}

/// Multipart body with one file part named `image`.
#[derive(Debug, utoipa::ToSchema)]
pub struct UploadForm {
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
}

#[api_handler(
    post,
    path = "/upload",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = OK, description = "Image hosted", body = UploadResponse),
        (status = UNPROCESSABLE_ENTITY, description = "No `image` part", body = ApiErrorBody),
        (status = BAD_GATEWAY, description = "Image host failed", body = ApiErrorBody),
        (status = SERVICE_UNAVAILABLE, description = "No image host key configured", body = ApiErrorBody),
    ),
    tag = MEDIA_TAG,
)]
pub async fn upload_image(
    State(state): State<ApiState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiErrorBody> {
    let media = state.try_get_slice::<Media>()?;
    let Some(host) = &media.host else {
        return Err(MediaError::NotConfigured { message: "missing api key".into(), context: None }.into());
    };

    let multipart = multipart.map_err(|rejection| invalid(rejection.body_text()))?;
    let (file_name, bytes) = image_part(multipart).await?;
    let url = host.upload(&file_name, bytes).await?;

    Ok(Json(UploadResponse { url }))
}

async fn image_part(mut multipart: Multipart) -> Result<(String, Vec<u8>), MediaError> {
    while let Some(field) = multipart.next_field().await.map_err(|err| invalid(err.body_text()))? {
        if field.name() != Some("image") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("image").to_owned();
        let bytes = field.bytes().await.map_err(|err| invalid(err.body_text()))?;
        return Ok((file_name, bytes.to_vec()));
    }

    Err(invalid("multipart field `image` is missing"))
}

fn invalid(message: impl Into<String>) -> MediaError {
    MediaError::Validation { message: message.into().into(), context: None }
}

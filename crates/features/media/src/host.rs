use crate::error::{MediaError, MediaErrorExt};
use folio_domain::config::MediaConfig;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// imgbb-style image host: `POST {endpoint}/1/upload?key=..` with a multipart `image` part.
#[derive(Clone)]
pub struct ImageHost {
    http: reqwest::Client,
    endpoint: Arc<str>,
    api_key: Arc<str>,
}

impl std::fmt::Debug for ImageHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageHost").field("endpoint", &self.endpoint).finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct HostResponse {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    data: Option<HostImage>,
}

#[derive(Debug, Deserialize)]
struct HostImage {
    #[serde(default)]
    url: Option<String>,
}

impl ImageHost {
    pub fn new(endpoint: impl AsRef<str>, api_key: impl AsRef<str>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: Arc::from(endpoint.as_ref().trim_end_matches('/')),
            api_key: Arc::from(api_key.as_ref()),
        }
    }

    /// `None` when no (non-blank) key is configured.
    #[must_use]
    pub fn from_config(config: &MediaConfig) -> Option<Self> {
        config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .map(|key| Self::new(&config.endpoint, key))
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Uploads one image and returns its public URL.
    pub async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<String, MediaError> {
        if bytes.is_empty() {
            return Err(MediaError::Validation { message: "empty file".into(), context: None });
        }

        let size = bytes.len();
        let part = Part::bytes(bytes).file_name(file_name.to_owned());
        let form = Form::new().part("image", part);

        let response = self
            .http
            .post(format!("{}/1/upload", self.endpoint))
            .query(&[("key", &*self.api_key)])
            .multipart(form)
            .send()
            .await
            .context("sending image")?;

        let status = response.status();
        let body = response.bytes().await.context("reading image host response")?;
        debug!(%status, size, file_name, "Image host answered");

        if !status.is_success() {
            let text = String::from_utf8_lossy(&body).trim().to_owned();
            warn!(%status, %text, "Image host refused upload");
            return Err(MediaError::Upstream {
                message: format!("status {status}: {text}").into(),
                context: None,
            });
        }

        let parsed: HostResponse = serde_json::from_slice(&body).context("image host response")?;
        if parsed.success == Some(false) {
            return Err(MediaError::Upstream { message: "upload not accepted".into(), context: None });
        }

        let url = parsed
            .data
            .and_then(|image| image.url)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| MediaError::Upstream {
                message: "response carries no image URL".into(),
                context: None,
            })?;

        info!(file_name, size, %url, "Image uploaded");
        Ok(url)
    }
}

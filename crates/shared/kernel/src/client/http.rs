use super::{ClientError, ClientErrorExt};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::sync::Arc;
use tracing::{debug, warn};

/// JSON-over-HTTP binding to a Folio content API.
///
/// Cloning is cheap. No timeout and no retry are configured: a failed call surfaces
/// once and the caller decides whether to repeat it.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Arc<str>,
}

impl ApiClient {
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self::with_http(reqwest::Client::new(), base_url)
    }

    /// Reuses an existing connection pool.
    pub fn with_http(http: reqwest::Client, base_url: impl AsRef<str>) -> Self {
        Self { http, base: Arc::from(base_url.as_ref().trim_end_matches('/')) }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base
    }

    #[must_use]
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base, path.trim_start_matches('/'))
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self.send(self.request(Method::GET, path), path).await?;
        decode(response, path).await
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(self.request(Method::POST, path).json(body), path).await?;
        decode(response, path).await
    }

    pub async fn patch_json<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(self.request(Method::PATCH, path).json(body), path).await?;
        decode(response, path).await
    }

    /// Succeeds on any 2xx; the body is ignored.
    pub async fn delete(&self, path: &str) -> Result<(), ClientError> {
        self.send(self.request(Method::DELETE, path), path).await.map(drop)
    }

    /// Sends a prepared request; non-2xx answers become [`ClientError::Server`].
    pub async fn send(&self, request: RequestBuilder, what: &str) -> Result<Response, ClientError> {
        let response = request.send().await.context(what.to_owned())?;
        let status = response.status();
        debug!(%status, what, "API response");

        if status.is_success() {
            return Ok(response);
        }

        let message = error_message(status, response).await;
        warn!(%status, what, %message, "API request rejected");
        Err(ClientError::Server {
            status: status.as_u16(),
            message: message.into(),
            context: Some(Cow::Owned(what.to_owned())),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, self.url(path))
    }
}

async fn decode<T: DeserializeOwned>(response: Response, what: &str) -> Result<T, ClientError> {
    let bytes = response.bytes().await.context(what.to_owned())?;
    serde_json::from_slice(&bytes).context(what.to_owned())
}

/// Prefers the `message` of a JSON error body, then the raw text, then the reason phrase.
async fn error_message(status: StatusCode, response: Response) -> String {
    let text = response.text().await.unwrap_or_default();

    let from_json = serde_json::from_str::<serde_json::Value>(&text)
        .ok()
        .and_then(|value| value.get("message").and_then(|m| m.as_str()).map(str::to_owned));

    from_json.or_else(|| (!text.trim().is_empty()).then(|| text.trim().to_owned())).unwrap_or_else(
        || status.canonical_reason().unwrap_or("request failed").to_owned(),
    )
}

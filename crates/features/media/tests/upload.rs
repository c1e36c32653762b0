use axum::Json;
use axum::extract::{Multipart, Query};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use folio_domain::config::MediaConfig;
use folio_kernel::server::state::ApiState;
use folio_media::{ImageHost, MediaError};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::net::TcpListener;

#[derive(Deserialize)]
struct KeyQuery {
    key: String,
}

/// Accepts key `good`; answers like imgbb.
async fn fake_host(Query(query): Query<KeyQuery>, mut multipart: Multipart) -> Response {
    if query.key != "good" {
        return (StatusCode::BAD_REQUEST, Json(json!({ "success": false, "error": "bad key" })))
            .into_response();
    }
    while let Some(field) = multipart.next_field().await.unwrap() {
        if field.name() == Some("image") {
            let name = field.file_name().unwrap_or("unnamed").to_owned();
            let bytes = field.bytes().await.unwrap();
            let url = format!("https://i.example/{name}?size={}", bytes.len());
            return Json(json!({ "data": { "url": url }, "success": true })).into_response();
        }
    }
    Json(json!({ "success": false })).into_response()
}

async fn serve(router: axum::Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
    format!("http://{addr}")
}

async fn spawn_host() -> String {
    serve(axum::Router::new().route("/1/upload", post(fake_host))).await
}

async fn spawn_proxy(config: MediaConfig) -> (String, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let store = folio_store::Store::builder().root(dir.path()).connect().await.unwrap();
    let slice = folio_media::init(&config).unwrap();
    let state = ApiState::builder().store(store).register_slice(slice).build().unwrap();
    let (router, _openapi) = folio_media::router().split_for_parts();

    (serve(router.with_state(state)).await, dir)
}

fn image_form(field: &str) -> Form {
    Form::new().part(field.to_owned(), Part::bytes(vec![0x89, b'P', b'N', b'G']).file_name("cat.png"))
}

#[tokio::test]
async fn host_returns_the_public_url() {
    let host = ImageHost::new(spawn_host().await, "good");
    let url = host.upload("cat.png", vec![1, 2, 3]).await.unwrap();
    assert_eq!(url, "https://i.example/cat.png?size=3");
}

#[tokio::test]
async fn host_refusal_is_an_upstream_error() {
    let host = ImageHost::new(spawn_host().await, "wrong");
    let err = host.upload("cat.png", vec![1]).await.unwrap_err();
    assert!(matches!(err, MediaError::Upstream { .. }));
    assert!(err.to_string().contains("bad key"), "{err}");
}

#[tokio::test]
async fn unsuccessful_answer_is_an_upstream_error() {
    let base = serve(axum::Router::new().route(
        "/1/upload",
        post(|| async { Json(json!({ "data": { "url": "https://i.example/x" }, "success": false })) }),
    ))
    .await;
    let err = ImageHost::new(base, "good").upload("x.png", vec![1]).await.unwrap_err();
    assert!(matches!(err, MediaError::Upstream { .. }));
}

#[tokio::test]
async fn proxy_forwards_the_image() {
    let config = MediaConfig { endpoint: spawn_host().await, api_key: Some("good".into()) };
    let (base, _dir) = spawn_proxy(config).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/upload"))
        .multipart(image_form("image"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "url": "https://i.example/cat.png?size=4" }));
}

#[tokio::test]
async fn proxy_without_key_is_unavailable() {
    let (base, _dir) = spawn_proxy(MediaConfig::default()).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/upload"))
        .multipart(image_form("image"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "UNAVAILABLE");
}

#[tokio::test]
async fn proxy_requires_the_image_field() {
    let config = MediaConfig { endpoint: spawn_host().await, api_key: Some("good".into()) };
    let (base, _dir) = spawn_proxy(config).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/upload"))
        .multipart(image_form("file"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn proxy_reports_host_failures_as_bad_gateway() {
    let config = MediaConfig { endpoint: spawn_host().await, api_key: Some("revoked".into()) };
    let (base, _dir) = spawn_proxy(config).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/upload"))
        .multipart(image_form("image"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "UPSTREAM_FAILED");
}

#[test]
fn upload_body_is_documented_as_multipart() {
    let (_, openapi) = folio_media::router().split_for_parts();
    let doc = serde_json::to_value(&openapi).unwrap();

    let body = &doc["paths"]["/upload"]["post"]["requestBody"]["content"]["multipart/form-data"];
    assert!(body.is_object(), "{body}");
    assert_eq!(doc["components"]["schemas"]["UploadForm"]["properties"]["image"]["format"], "binary");
}

use folio_kernel::client::ApiClient;
use folio_server::Server;
use serde_json::{Value, json};
use tokio::net::TcpListener;

async fn spawn() -> (ApiClient, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let server = Server::builder().data_dir(dir.path().join("data")).build().await.unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = server.router();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

    (ApiClient::new(format!("http://{addr}")), dir)
}

#[tokio::test]
async fn health_reports_up() {
    let (api, _dir) = spawn().await;
    let health: Value = api.get_json("/health").await.unwrap();
    assert_eq!(health["status"], "up");
}

#[tokio::test]
async fn registry_and_content_share_one_server() {
    let (api, _dir) = spawn().await;

    let _: Value = api.post_json("/settings", &json!({ "galleryVisibility": "hidden" })).await.unwrap();
    let _: Value = api.post_json("/gallery", &json!({ "title": "t", "image": "u" })).await.unwrap();

    let settings: Vec<Value> = api.get_json("/settings").await.unwrap();
    let gallery: Vec<Value> = api.get_json("/gallery").await.unwrap();
    assert_eq!(settings.len(), 1);
    assert_eq!(gallery.len(), 1);
}

#[tokio::test]
async fn upload_without_key_is_unavailable() {
    let (api, _dir) = spawn().await;
    let form = reqwest::multipart::Form::new()
        .part("image", reqwest::multipart::Part::bytes(vec![1, 2, 3]).file_name("a.png"));

    let response = api.http().post(api.url("/upload")).multipart(form).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 503);
}

#[tokio::test]
async fn api_docs_and_cors_are_served() {
    let (api, _dir) = spawn().await;

    let docs = api.http().get(api.url("/api")).send().await.unwrap();
    assert!(docs.status().is_success());

    let preflight = api
        .http()
        .request(reqwest::Method::OPTIONS, api.url("/settings"))
        .header("Origin", "https://portfolio.example")
        .header("Access-Control-Request-Method", "POST")
        .send()
        .await
        .unwrap();
    assert!(preflight.headers().contains_key("access-control-allow-origin"));
}

#![allow(dead_code)]

use folio_kernel::client::ApiClient;
use folio_kernel::server::state::ApiState;
use folio_settings::client::SettingsClient;
use folio_store::Store;
use tempfile::TempDir;
use tokio::net::TcpListener;

pub struct TestServer {
    pub base: String,
    _dir: TempDir,
}

impl TestServer {
    pub fn api(&self) -> ApiClient {
        ApiClient::new(&self.base)
    }

    pub fn settings(&self) -> SettingsClient {
        SettingsClient::new(self.api())
    }
}

/// The real `/settings` resource over a throwaway store.
pub async fn spawn_registry() -> TestServer {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::builder().root(dir.path()).connect().await.unwrap();
    let slice = folio_settings::init(&store).unwrap();
    let state = ApiState::builder().store(store).register_slice(slice).build().unwrap();

    let (router, _openapi) = folio_settings::router().split_for_parts();
    let base = serve(router.with_state(state)).await;

    TestServer { base, _dir: dir }
}

/// Any router on an ephemeral port; returns its base URL.
pub async fn serve(router: axum::Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
    format!("http://{addr}")
}

/// A base URL nothing listens on.
pub fn dead_base() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

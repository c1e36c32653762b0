#![allow(dead_code)]

use folio_kernel::client::ApiClient;
use folio_kernel::server::state::ApiState;
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
}

pub async fn spawn_content() -> TestServer {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::builder().root(dir.path()).connect().await.unwrap();
    let slice = folio_content::init(&store).unwrap();
    let state = ApiState::builder().store(store).register_slice(slice).build().unwrap();

    let (router, _openapi) = folio_content::router().split_for_parts();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router.with_state(state);
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

    TestServer { base: format!("http://{addr}"), _dir: dir }
}

use folio_domain::config::{ApiConfig, MediaConfig, ServerConfig, StoreCompression, StoreConfig};
use serde_json::json;

#[test]
fn defaults_are_usable_locally() {
    let server = ServerConfig::default();
    assert_eq!(server.port, 4583);
    assert!(server.ssl.is_none());

    let store = StoreConfig::default();
    assert_eq!(store.data_dir, std::path::PathBuf::from("data"));
    assert_eq!(store.compression, StoreCompression::None);

    let media = MediaConfig::default();
    assert_eq!(media.endpoint, "https://api.imgbb.com");
    assert!(media.api_key.is_none());
}

#[test]
fn partial_documents_keep_defaults() {
    let raw = json!({
        "server": { "port": 8080 },
        "store": { "compression": "lz4" },
        "media": { "api_key": "k" }
    });

    let config: ApiConfig = serde_json::from_value(raw).expect("config deserializes");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.store.compression, StoreCompression::Lz4);
    assert_eq!(config.store.data_dir, std::path::PathBuf::from("data"));
    assert_eq!(config.media.api_key.as_deref(), Some("k"));
    assert_eq!(config.log.level, "info");
}

#[test]
fn clones_share_until_mutated() {
    let mut config = ApiConfig::default();
    let snapshot = config.clone();

    config.server.port = 9000;
    assert_eq!(snapshot.server.port, 4583);
    assert_eq!(config.server.port, 9000);
}

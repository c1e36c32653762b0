use folio_store::{Compression, DocumentId, Store, StoreError};
use serde::{Deserialize, Serialize};
use tempfile::TempDir;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Skill {
    skill: String,
    level: u8,
}

fn id(value: &str) -> DocumentId {
    DocumentId::try_from(value).unwrap()
}

async fn open(temp: &TempDir, compression: Compression) -> Store {
    Store::builder().root(temp.path().join("data")).compression(compression).connect().await.unwrap()
}

#[tokio::test]
async fn write_then_read_plain() {
    let temp = TempDir::new().unwrap();
    let store = open(&temp, Compression::None).await;
    let skills = store.collection("skills").unwrap();

    let rust = Skill { skill: "Rust".into(), level: 9 };
    skills.write(&id("rust"), &rust).await.unwrap();

    assert_eq!(skills.read::<Skill>(&id("rust")).await.unwrap(), rust);
    assert!(store.root().join("skills").join("rust.json").exists());
}

#[tokio::test]
async fn write_then_read_lz4() {
    let temp = TempDir::new().unwrap();
    let store = open(&temp, Compression::Lz4).await;
    let skills = store.collection("skills").unwrap();

    let rust = Skill { skill: "Rust".repeat(200), level: 9 };
    skills.write(&id("rust"), &rust).await.unwrap();

    let raw = std::fs::read(store.root().join("skills").join("rust.json.lz4")).unwrap();
    assert!(serde_json::from_slice::<Skill>(&raw).is_err(), "bytes on disk are compressed");
    assert_eq!(skills.read::<Skill>(&id("rust")).await.unwrap(), rust);
}

#[tokio::test]
async fn missing_documents() {
    let temp = TempDir::new().unwrap();
    let store = open(&temp, Compression::None).await;
    let gallery = store.collection("gallery").unwrap();

    assert!(gallery.find::<Skill>(&id("nope")).await.unwrap().is_none());
    assert!(matches!(
        gallery.read::<Skill>(&id("nope")).await,
        Err(StoreError::NotFound { .. })
    ));
    assert!(!gallery.remove(&id("nope")).await.unwrap());
    assert!(gallery.list::<Skill>().await.unwrap().is_empty());
}

#[tokio::test]
async fn overwrite_replaces_whole_document() {
    let temp = TempDir::new().unwrap();
    let store = open(&temp, Compression::None).await;
    let settings = store.collection("settings").unwrap();

    settings
        .write(&id("flags"), &serde_json::json!({ "heroVisibility": "hidden", "aboutVisibility": "hidden" }))
        .await
        .unwrap();
    settings.write(&id("flags"), &serde_json::json!({ "aboutVisibility": "visible" })).await.unwrap();

    let stored: serde_json::Value = settings.read(&id("flags")).await.unwrap();
    assert_eq!(stored, serde_json::json!({ "aboutVisibility": "visible" }));
}

#[tokio::test]
async fn list_is_sorted_and_skips_foreign_files() {
    let temp = TempDir::new().unwrap();
    let store = open(&temp, Compression::None).await;
    let skills = store.collection("skills").unwrap();

    skills.write(&id("b"), &Skill { skill: "B".into(), level: 2 }).await.unwrap();
    skills.write(&id("a"), &Skill { skill: "A".into(), level: 1 }).await.unwrap();
    std::fs::write(store.root().join("skills").join("notes.txt"), b"ignore me").unwrap();

    let ids: Vec<String> =
        skills.ids().await.unwrap().iter().map(|id| id.as_str().to_owned()).collect();
    assert_eq!(ids, ["a", "b"]);

    let all: Vec<Skill> = skills.list().await.unwrap();
    assert_eq!(all.iter().map(|s| s.level).collect::<Vec<_>>(), [1, 2]);
}

#[tokio::test]
async fn remove_and_exists() {
    let temp = TempDir::new().unwrap();
    let store = open(&temp, Compression::None).await;
    let skills = store.collection("skills").unwrap();

    skills.write(&id("go"), &Skill { skill: "Go".into(), level: 5 }).await.unwrap();
    assert!(skills.exists(&id("go")).await.unwrap());

    assert!(skills.remove(&id("go")).await.unwrap());
    assert!(!skills.exists(&id("go")).await.unwrap());
}

#[tokio::test]
async fn collections_are_isolated() {
    let temp = TempDir::new().unwrap();
    let store = open(&temp, Compression::None).await;
    let a = store.collection("skills").unwrap();
    let b = store.collection("gallery").unwrap();

    a.write(&id("x"), &Skill { skill: "A".into(), level: 1 }).await.unwrap();
    assert!(b.find::<Skill>(&id("x")).await.unwrap().is_none());
}

#[tokio::test]
async fn invalid_names_are_rejected() {
    let temp = TempDir::new().unwrap();
    let store = open(&temp, Compression::None).await;

    assert!(matches!(store.collection("../up"), Err(StoreError::InvalidName { .. })));
    assert!(matches!(DocumentId::try_from("a/b"), Err(StoreError::InvalidName { .. })));
}

#[tokio::test]
async fn connect_without_create_requires_existing_root() {
    let temp = TempDir::new().unwrap();
    let result = Store::builder().root(temp.path().join("missing")).create(false).connect().await;
    assert!(matches!(result, Err(StoreError::Io { .. })));
}

#[tokio::test]
async fn connect_keeps_fresh_temp_files() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("data");
    std::fs::create_dir_all(root.join("skills")).unwrap();
    let in_flight = root.join("skills").join("a.json.foliotmp.1.1");
    std::fs::write(&in_flight, b"{").unwrap();

    let store = Store::builder().root(&root).connect().await.unwrap();
    assert!(in_flight.exists(), "young temp files may belong to a running writer");

    let skills = store.collection("skills").unwrap();
    assert!(skills.list::<Skill>().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn lock_serializes_check_then_write() {
    let temp = TempDir::new().unwrap();
    let store = open(&temp, Compression::None).await;

    let mut tasks = Vec::new();
    for n in 0..8 {
        let hero = store.collection("hero-section").unwrap();
        tasks.push(tokio::spawn(async move {
            let _guard = hero.lock().await;
            if hero.ids().await.unwrap().is_empty() {
                hero.write(&id(&format!("h{n}")), &serde_json::json!({ "title": n })).await.unwrap();
            }
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    let hero = store.collection("hero-section").unwrap();
    assert_eq!(hero.ids().await.unwrap().len(), 1);
}

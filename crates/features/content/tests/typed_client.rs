mod common;

use common::spawn_content;
use folio_content::client::ContentClient;
use folio_domain::content::{AboutContent, ExperienceEntry, GalleryItem, SkillEntry};
use folio_kernel::client::{ApiClient, ClientError};

#[tokio::test]
async fn typed_entries_round_trip() {
    let server = spawn_content().await;
    let client = ContentClient::new(server.api());

    let entry = ExperienceEntry {
        role: Some("Research assistant".into()),
        place: Some("Vision lab".into()),
        kind: Some("Part-time".into()),
        ..ExperienceEntry::default()
    };
    let created = client.create(&entry).await.unwrap();
    let id = created.id.clone().unwrap();

    let listed = client.list::<ExperienceEntry>().await.unwrap();
    assert_eq!(listed, [created.clone()]);

    let mut edit = created.clone();
    edit.duration = Some("2 years".into());
    let updated = client.update(&id, &edit).await.unwrap();
    assert_eq!(updated.duration.as_deref(), Some("2 years"));
    assert_eq!(updated.place.as_deref(), Some("Vision lab"));

    client.delete::<ExperienceEntry>(&id).await.unwrap();
    let err = client.get::<ExperienceEntry>(&id).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn partial_updates_keep_stored_fields() {
    let server = spawn_content().await;
    let client = ContentClient::new(server.api());

    let item = GalleryItem {
        title: Some("Sunset".into()),
        image: Some("https://img.local/a.png".into()),
        ..GalleryItem::default()
    };
    let id = client.create(&item).await.unwrap().id.unwrap();

    let patch = GalleryItem { image: Some("https://img.local/b.png".into()), ..GalleryItem::default() };
    let updated = client.update(&id, &patch).await.unwrap();

    assert_eq!(updated.title.as_deref(), Some("Sunset"));
    assert_eq!(updated.image.as_deref(), Some("https://img.local/b.png"));
}

#[tokio::test]
async fn incomplete_entries_never_leave_the_client() {
    // Nothing listens here; a request would surface as a network error.
    let client = ContentClient::new(ApiClient::new("http://127.0.0.1:9"));

    let err = client.create(&GalleryItem { title: Some("Untitled".into()), ..GalleryItem::default() }).await.unwrap_err();
    assert!(matches!(err, ClientError::Validation { .. }), "{err}");
}

#[tokio::test]
async fn singleton_upsert_creates_then_updates() {
    let server = spawn_content().await;
    let client = ContentClient::new(server.api());

    let first = AboutContent {
        name: Some("Ada".into()),
        descriptions: Some("Engineer".into()),
        ..AboutContent::default()
    };
    let created = client.upsert_singleton(&first).await.unwrap();

    let second = AboutContent { descriptions: Some("Engineer and writer".into()), ..first };
    let updated = client.upsert_singleton(&second).await.unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(client.list::<AboutContent>().await.unwrap().len(), 1);
    assert_eq!(updated.descriptions.as_deref(), Some("Engineer and writer"));
}

#[tokio::test]
async fn upsert_is_for_singletons_only() {
    let client = ContentClient::new(ApiClient::new("http://127.0.0.1:9"));
    let err = client.upsert_singleton(&SkillEntry::default()).await.unwrap_err();
    assert!(matches!(err, ClientError::Validation { .. }));
}

mod common;

use axum::Json;
use axum::http::StatusCode;
use axum::routing::get;
use common::{dead_base, serve, spawn_registry};
use folio_domain::sections::{SectionFlags, SectionKey, Visibility};
use folio_kernel::client::{ApiClient, ClientError, NoticeLevel};
use folio_settings::HomeSection;
use folio_settings::client::{EditorStatus, SettingsClient, SettingsEditor};
use folio_settings::gate::{HomePage, PageState};
use serde_json::json;
use std::time::Duration;

#[tokio::test]
async fn hidden_gallery_disappears_from_a_fresh_homepage() {
    let server = spawn_registry().await;

    let editor = SettingsEditor::new(server.settings());
    editor.load().await.unwrap();
    editor.set_flag(SectionKey::Gallery, Visibility::Hidden);
    editor.save().await.unwrap();

    let notices = editor.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Success);

    let mut page = HomePage::mount(server.settings());
    let PageState::Ready(sections) = page.settled().await else {
        panic!("homepage did not load: {:?}", page.state());
    };

    let expected: Vec<_> =
        HomeSection::ORDER.into_iter().filter(|s| *s != HomeSection::Gallery).collect();
    assert_eq!(sections, expected);
}

#[tokio::test]
async fn editor_load_replaces_local_flags() {
    let server = spawn_registry().await;
    server
        .settings()
        .save_flags(&SectionFlags::new().with(SectionKey::Training, Visibility::Hidden))
        .await
        .unwrap();

    let editor = SettingsEditor::new(server.settings());
    editor.load().await.unwrap();

    assert_eq!(editor.visibility(SectionKey::Training), Visibility::Hidden);
    assert!(editor.flags().is_complete());
    assert_eq!(editor.status(), EditorStatus::Idle);
}

#[tokio::test]
async fn failed_load_keeps_previous_flags() {
    let editor = SettingsEditor::new(SettingsClient::new(ApiClient::new(dead_base())));
    editor.set_flag(SectionKey::Hero, Visibility::Hidden);

    let err = editor.load().await.unwrap_err();
    assert!(matches!(err, ClientError::Network { .. }));
    assert_eq!(editor.visibility(SectionKey::Hero), Visibility::Hidden);

    let notices = editor.take_notices();
    assert_eq!(notices.len(), 1);
    assert!(notices[0].is_error());
    assert_eq!(editor.status(), EditorStatus::Idle);
}

#[tokio::test]
async fn failed_save_is_reported_and_not_rolled_back() {
    let router = axum::Router::new().route(
        "/settings",
        get(|| async { Json(json!([])) })
            .post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "disk full") }),
    );
    let editor = SettingsEditor::new(SettingsClient::new(ApiClient::new(serve(router).await)));
    editor.set_flag(SectionKey::Reviews, Visibility::Hidden);

    let err = editor.save().await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert_eq!(editor.visibility(SectionKey::Reviews), Visibility::Hidden);
    assert!(editor.take_notices()[0].message.contains("disk full"));
}

#[tokio::test]
async fn concurrent_save_is_refused() {
    let router = axum::Router::new().route(
        "/settings",
        get(|| async { Json(json!([])) }).post(|| async {
            tokio::time::sleep(Duration::from_millis(300)).await;
            Json(json!({}))
        }),
    );
    let editor = SettingsEditor::new(SettingsClient::new(ApiClient::new(serve(router).await)));

    let first = tokio::spawn({
        let editor = editor.clone();
        async move { editor.save().await }
    });
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(editor.status(), EditorStatus::Saving);

    let second = editor.load().await;
    assert!(matches!(second, Err(ClientError::Busy { .. })));

    first.await.unwrap().unwrap();
    assert_eq!(editor.status(), EditorStatus::Idle);
}

#[tokio::test]
async fn homepage_reads_registry_leniently() {
    let router = axum::Router::new().route(
        "/settings",
        get(|| async {
            Json(json!([{
                "_id": "64f0c0ffee",
                "heroVisibility": "HIDDEN",
                "aboutVisibility": "hidden ",
                "galleryVisibility": null,
                "reviewsVisibility": 0,
                "gallery": "hidden",
                "leadershipVisibility": "hidden"
            }]))
        }),
    );
    let mut page = HomePage::mount(SettingsClient::new(ApiClient::new(serve(router).await)));

    let PageState::Ready(sections) = page.settled().await else {
        panic!("homepage did not load");
    };
    assert!(!sections.contains(&HomeSection::Leadership));
    assert_eq!(sections.len(), HomeSection::ORDER.len() - 1);
}

#[tokio::test]
async fn homepage_failure_renders_nothing() {
    let router = axum::Router::new()
        .route("/settings", get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "maintenance") }));
    let mut page = HomePage::mount(SettingsClient::new(ApiClient::new(serve(router).await)));

    match page.settled().await {
        PageState::Failed(notice) => assert!(notice.message.contains("maintenance")),
        other => panic!("expected failure, got {other:?}"),
    }
    assert!(page.sections().is_empty());
}

#[tokio::test]
async fn homepage_shows_nothing_while_loading() {
    let router = axum::Router::new().route(
        "/settings",
        get(|| async {
            tokio::time::sleep(Duration::from_millis(300)).await;
            Json(json!([]))
        }),
    );
    let mut page = HomePage::mount(SettingsClient::new(ApiClient::new(serve(router).await)));

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(page.state(), PageState::Loading);
    assert!(page.sections().is_empty());

    assert_eq!(page.settled().await, PageState::Ready(HomeSection::ORDER.to_vec()));
}

#[tokio::test]
async fn unmounted_page_never_leaves_loading() {
    let router = axum::Router::new().route(
        "/settings",
        get(|| async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Json(json!([{ "galleryVisibility": "hidden" }]))
        }),
    );
    let mut page = HomePage::mount(SettingsClient::new(ApiClient::new(serve(router).await)));

    tokio::time::sleep(Duration::from_millis(20)).await;
    page.unmount();
    assert!(!page.is_mounted());

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(page.settled().await, PageState::Loading);
}

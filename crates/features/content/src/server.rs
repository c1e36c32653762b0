//! REST resources for the portfolio sections.
//!
//! Every [`ContentResource`] is served under its own path segment with the same five
//! operations. Records are schemaless JSON objects; the server only owns `_id` and
//! `createdAt` and checks that the resource's required fields are non-blank strings.

use crate::error::{ContentError, ContentErrorExt};
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::{SecondsFormat, Utc};
use folio_derive::api_handler;
use folio_domain::constants::{CONTENT_TAG, CREATED_AT_FIELD, ID_FIELD};
use folio_domain::content::ContentResource;
use folio_kernel::domain::registry::InitializedSlice;
use folio_kernel::safe_nanoid;
use folio_kernel::server::error::ApiErrorBody;
use folio_kernel::server::state::ApiState;
use folio_store::{Collection, DocumentId, Store};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::{debug, info};
use utoipa::ToSchema;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

pub type Record = Map<String, Value>;

/// A stored record: a JSON object carrying `_id` and `createdAt` next to its own fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct ContentRecord(pub Record);

/// Content collections, one per resource.
#[folio_derive::folio_slice]
pub struct Content {
    collections: BTreeMap<ContentResource, Collection>,
}

impl Content {
    fn collection(&self, resource: ContentResource) -> Result<&Collection, ContentError> {
        self.collections.get(&resource).ok_or_else(|| ContentError::Internal {
            message: "collection not opened".into(),
            context: Some(resource.path().into()),
        })
    }

    /// Every record, oldest first; ties broken by id.
    pub async fn list(&self, resource: ContentResource) -> Result<Vec<Record>, ContentError> {
        let mut records: Vec<Record> =
            self.collection(resource)?.list().await.context(resource.path())?;
        records.sort_by(|a, b| sort_key(a).cmp(&sort_key(b)));
        debug!(resource = resource.path(), count = records.len(), "Records listed");
        Ok(records)
    }

    pub async fn get(&self, resource: ContentResource, id: &str) -> Result<Record, ContentError> {
        let document = document_id(resource, id)?;
        self.collection(resource)?
            .find(&document)
            .await
            .context(resource.path())?
            .ok_or_else(|| not_found(resource, id))
    }

    /// Stores a new record under a fresh id. Client-supplied `_id`/`createdAt` are dropped.
    pub async fn create(
        &self,
        resource: ContentResource,
        mut record: Record,
    ) -> Result<Record, ContentError> {
        record.remove(ID_FIELD);
        record.remove(CREATED_AT_FIELD);
        validate(resource, &record)?;

        let collection = self.collection(resource)?;
        let _guard = collection.lock().await;

        if resource.is_singleton() && !collection.ids().await.context(resource.path())?.is_empty() {
            return Err(ContentError::Conflict {
                message: format!("{} already has its record; update it instead", resource.path())
                    .into(),
                context: None,
            });
        }

        let id = safe_nanoid!();
        let document = document_id(resource, &id)?;
        record.insert(ID_FIELD.to_owned(), Value::String(id.clone()));
        record.insert(CREATED_AT_FIELD.to_owned(), Value::String(now()));

        collection.write(&document, &record).await.context(resource.path())?;
        info!(resource = resource.path(), %id, "Record created");
        Ok(record)
    }

    /// Shallow merge of `patch` into the stored record. `_id` and `createdAt` never change.
    pub async fn update(
        &self,
        resource: ContentResource,
        id: &str,
        patch: Record,
    ) -> Result<Record, ContentError> {
        let document = document_id(resource, id)?;
        let collection = self.collection(resource)?;
        let _guard = collection.lock().await;

        let mut record: Record = collection
            .find(&document)
            .await
            .context(resource.path())?
            .ok_or_else(|| not_found(resource, id))?;

        for (field, value) in patch {
            if field != ID_FIELD && field != CREATED_AT_FIELD {
                record.insert(field, value);
            }
        }
        validate(resource, &record)?;

        collection.write(&document, &record).await.context(resource.path())?;
        info!(resource = resource.path(), %id, "Record updated");
        Ok(record)
    }

    pub async fn delete(&self, resource: ContentResource, id: &str) -> Result<(), ContentError> {
        let document = document_id(resource, id)?;
        let collection = self.collection(resource)?;
        let _guard = collection.lock().await;

        if collection.remove(&document).await.context(resource.path())? {
            info!(resource = resource.path(), %id, "Record deleted");
            Ok(())
        } else {
            Err(not_found(resource, id))
        }
    }
}

/// Opens one collection per resource and builds the slice.
pub fn init(store: &Store) -> Result<InitializedSlice, ContentError> {
    let collections = ContentResource::ALL
        .into_iter()
        .map(|resource| {
            store
                .collection(resource.path())
                .map(|collection| (resource, collection))
                .context(resource.path())
        })
        .collect::<Result<BTreeMap<_, _>, _>>()?;

    info!(collections = collections.len(), "Content server slice initialized");

    Ok(InitializedSlice::new(Content::new(ContentInner { collections })))
}

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(list_records, create_record))
        .routes(routes!(read_record, update_record, delete_record))
}

fn parse_resource(segment: &str) -> Result<ContentResource, ContentError> {
    segment.parse().map_err(|_| ContentError::UnknownResource {
        message: format!("/{segment}").into(),
        context: None,
    })
}

/// Ids outside the store alphabet cannot exist, so they read as missing.
fn document_id(resource: ContentResource, id: &str) -> Result<DocumentId, ContentError> {
    DocumentId::try_from(id).map_err(|_| not_found(resource, id))
}

fn not_found(resource: ContentResource, id: &str) -> ContentError {
    ContentError::NotFound { message: format!("{}/{id}", resource.path()).into(), context: None }
}

fn validate(resource: ContentResource, record: &Record) -> Result<(), ContentError> {
    let missing = resource.missing_fields(record);
    if missing.is_empty() { Ok(()) } else { Err(ContentError::missing(resource.path(), missing)) }
}

fn sort_key(record: &Record) -> (&str, &str) {
    (str_field(record, CREATED_AT_FIELD), str_field(record, ID_FIELD))
}

fn str_field<'a>(record: &'a Record, name: &str) -> &'a str {
    record.get(name).and_then(Value::as_str).unwrap_or_default()
}

/// Fixed-width RFC 3339 so timestamps order lexicographically.
fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn rejected(rejection: JsonRejection) -> ContentError {
    ContentError::Validation { message: rejection.body_text().into(), fields: Vec::new(), context: None }
}

#[api_handler(
    get,
    path = "/{resource}",
    params(("resource" = String, Path, description = "Section collection, e.g. `gallery`")),
    responses(
        (status = OK, description = "Records, oldest first", body = [ContentRecord]),
        (status = NOT_FOUND, description = "Unknown resource", body = ApiErrorBody),
    ),
    tag = CONTENT_TAG,
)]
pub async fn list_records(
    State(state): State<ApiState>,
    Path(resource): Path<String>,
) -> Result<Json<Vec<ContentRecord>>, ApiErrorBody> {
    let resource = parse_resource(&resource)?;
    let content = state.try_get_slice::<Content>()?;
    let records = content.list(resource).await?;

    Ok(Json(records.into_iter().map(ContentRecord).collect()))
}

#[api_handler(
    post,
    path = "/{resource}",
    params(("resource" = String, Path, description = "Section collection")),
    request_body = ContentRecord,
    responses(
        (status = CREATED, description = "Record stored", body = ContentRecord),
        (status = NOT_FOUND, description = "Unknown resource", body = ApiErrorBody),
        (status = CONFLICT, description = "Singleton already exists", body = ApiErrorBody),
        (status = UNPROCESSABLE_ENTITY, description = "Missing required fields", body = ApiErrorBody),
    ),
    tag = CONTENT_TAG,
)]
pub async fn create_record(
    State(state): State<ApiState>,
    Path(resource): Path<String>,
    payload: Result<Json<ContentRecord>, JsonRejection>,
) -> Result<(StatusCode, Json<ContentRecord>), ApiErrorBody> {
    let resource = parse_resource(&resource)?;
    let Json(ContentRecord(record)) = payload.map_err(rejected)?;
    let content = state.try_get_slice::<Content>()?;
    let created = content.create(resource, record).await?;

    Ok((StatusCode::CREATED, Json(ContentRecord(created))))
}

#[api_handler(
    get,
    path = "/{resource}/{id}",
    params(
        ("resource" = String, Path, description = "Section collection"),
        ("id" = String, Path, description = "Record id"),
    ),
    responses(
        (status = OK, description = "The record", body = ContentRecord),
        (status = NOT_FOUND, description = "Unknown resource or id", body = ApiErrorBody),
    ),
    tag = CONTENT_TAG,
)]
pub async fn read_record(
    State(state): State<ApiState>,
    Path((resource, id)): Path<(String, String)>,
) -> Result<Json<ContentRecord>, ApiErrorBody> {
    let resource = parse_resource(&resource)?;
    let content = state.try_get_slice::<Content>()?;

    Ok(Json(ContentRecord(content.get(resource, &id).await?)))
}

#[api_handler(
    patch,
    path = "/{resource}/{id}",
    params(
        ("resource" = String, Path, description = "Section collection"),
        ("id" = String, Path, description = "Record id"),
    ),
    request_body = ContentRecord,
    responses(
        (status = OK, description = "Merged record", body = ContentRecord),
        (status = NOT_FOUND, description = "Unknown resource or id", body = ApiErrorBody),
        (status = UNPROCESSABLE_ENTITY, description = "Merged record misses required fields", body = ApiErrorBody),
    ),
    tag = CONTENT_TAG,
)]
pub async fn update_record(
    State(state): State<ApiState>,
    Path((resource, id)): Path<(String, String)>,
    payload: Result<Json<ContentRecord>, JsonRejection>,
) -> Result<Json<ContentRecord>, ApiErrorBody> {
    let resource = parse_resource(&resource)?;
    let Json(ContentRecord(patch)) = payload.map_err(rejected)?;
    let content = state.try_get_slice::<Content>()?;

    Ok(Json(ContentRecord(content.update(resource, &id, patch).await?)))
}

#[api_handler(
    delete,
    path = "/{resource}/{id}",
    params(
        ("resource" = String, Path, description = "Section collection"),
        ("id" = String, Path, description = "Record id"),
    ),
    responses(
        (status = NO_CONTENT, description = "Record deleted"),
        (status = NOT_FOUND, description = "Unknown resource or id", body = ApiErrorBody),
    ),
    tag = CONTENT_TAG,
)]
pub async fn delete_record(
    State(state): State<ApiState>,
    Path((resource, id)): Path<(String, String)>,
) -> Result<StatusCode, ApiErrorBody> {
    let resource = parse_resource(&resource)?;
    let content = state.try_get_slice::<Content>()?;
    content.delete(resource, &id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn unknown_segments_are_not_resources() {
        assert!(matches!(parse_resource("settings"), Err(ContentError::UnknownResource { .. })));
        assert_eq!(parse_resource("hero-section").unwrap(), ContentResource::Hero);
    }

    #[test]
    fn records_sort_by_creation_then_id() {
        let mut records = vec![
            record(json!({ "_id": "b", "createdAt": "2024-01-02T00:00:00.000000Z" })),
            record(json!({ "_id": "c", "createdAt": "2024-01-01T00:00:00.000000Z" })),
            record(json!({ "_id": "a", "createdAt": "2024-01-02T00:00:00.000000Z" })),
        ];
        records.sort_by(|a, b| sort_key(a).cmp(&sort_key(b)));

        let ids: Vec<_> = records.iter().map(|r| r[ID_FIELD].as_str().unwrap()).collect();
        assert_eq!(ids, ["c", "a", "b"]);
    }

    #[test]
    fn validation_lists_missing_fields() {
        let err = validate(ContentResource::Gallery, &record(json!({ "title": " " }))).unwrap_err();
        match err {
            ContentError::Validation { fields, .. } => assert_eq!(fields, ["title", "image"]),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn timestamps_have_fixed_width() {
        let a = now();
        let b = now();
        assert_eq!(a.len(), b.len());
        assert!(a.ends_with('Z'));
    }

    #[test]
    fn records_are_documented_as_objects() {
        let (_, openapi) = router().split_for_parts();
        let doc = serde_json::to_value(&openapi).unwrap();
        assert_eq!(doc["components"]["schemas"]["ContentRecord"]["type"], "object");
    }
}

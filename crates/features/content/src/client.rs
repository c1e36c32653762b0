//! Typed access to the content resources for the admin screens and the public pages.

use folio_domain::content::{ContentEntry, ContentResource};
use folio_kernel::client::{ApiClient, ClientError};
use serde_json::{Map, Value};
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct ContentClient {
    api: ApiClient,
}

impl ContentClient {
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list<T: ContentEntry>(&self) -> Result<Vec<T>, ClientError> {
        let entries: Vec<T> = self.api.get_json(&collection_path(T::RESOURCE)).await?;
        debug!(resource = T::RESOURCE.path(), count = entries.len(), "Records fetched");
        Ok(entries)
    }

    pub async fn get<T: ContentEntry>(&self, id: &str) -> Result<T, ClientError> {
        self.api.get_json(&record_path(T::RESOURCE, id)).await
    }

    /// Rejects the entry locally when a required field is absent or blank.
    pub async fn create<T: ContentEntry>(&self, entry: &T) -> Result<T, ClientError> {
        check_required(T::RESOURCE, entry)?;
        let created: T = self.api.post_json(&collection_path(T::RESOURCE), entry).await?;
        info!(resource = T::RESOURCE.path(), id = ?created.id(), "Record created");
        Ok(created)
    }

    /// Sends the entry as a patch; fields left `None` keep their stored values. Required
    /// fields sent blank are rejected locally; the server validates the merged record.
    pub async fn update<T: ContentEntry>(&self, id: &str, entry: &T) -> Result<T, ClientError> {
        check_patch(T::RESOURCE, entry)?;
        let updated = self.api.patch_json(&record_path(T::RESOURCE, id), entry).await?;
        info!(resource = T::RESOURCE.path(), id, "Record updated");
        Ok(updated)
    }

    pub async fn delete<T: ContentEntry>(&self, id: &str) -> Result<(), ClientError> {
        self.delete_in(T::RESOURCE, id).await
    }

    /// Edits the one record of a singleton resource, creating it on first use.
    pub async fn upsert_singleton<T: ContentEntry>(&self, entry: &T) -> Result<T, ClientError> {
        if !T::RESOURCE.is_singleton() {
            return Err(ClientError::validation(format!(
                "{} holds many records; use create or update",
                T::RESOURCE.path()
            )));
        }

        let existing = self.list::<T>().await?;
        match existing.first().and_then(|entry| entry.id()) {
            Some(id) => self.update(id, entry).await,
            None => self.create(entry).await,
        }
    }

    /// Untyped listing, for tools that work on any resource.
    pub async fn list_raw(
        &self,
        resource: ContentResource,
    ) -> Result<Vec<Map<String, Value>>, ClientError> {
        self.api.get_json(&collection_path(resource)).await
    }

    pub async fn delete_in(&self, resource: ContentResource, id: &str) -> Result<(), ClientError> {
        self.api.delete(&record_path(resource, id)).await?;
        info!(resource = resource.path(), id, "Record deleted");
        Ok(())
    }
}

fn collection_path(resource: ContentResource) -> String {
    format!("/{}", resource.path())
}

fn record_path(resource: ContentResource, id: &str) -> String {
    format!("/{}/{id}", resource.path())
}

fn check_required<T: ContentEntry>(resource: ContentResource, entry: &T) -> Result<(), ClientError> {
    let record = encode(entry)?;
    reject_fields(resource, &resource.missing_fields(&record))
}

fn check_patch<T: ContentEntry>(resource: ContentResource, entry: &T) -> Result<(), ClientError> {
    let record = encode(entry)?;
    reject_fields(resource, &resource.blank_fields(&record))
}

fn encode<T: ContentEntry>(entry: &T) -> Result<Map<String, Value>, ClientError> {
    let value = serde_json::to_value(entry).map_err(|source| ClientError::Decode {
        source,
        context: Some("encoding record".into()),
    })?;

    match value {
        Value::Object(record) => Ok(record),
        _ => Ok(Map::new()),
    }
}

fn reject_fields(resource: ContentResource, fields: &[&'static str]) -> Result<(), ClientError> {
    if fields.is_empty() {
        Ok(())
    } else {
        Err(ClientError::validation(format!(
            "{}: missing required fields: {}",
            resource.path(),
            fields.join(", ")
        )))
    }
}

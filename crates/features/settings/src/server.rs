//! `GET /settings` and `POST /settings`.
//!
//! The registry is one document in the `settings` collection. Writes replace it whole
//! (upsert); keys the admin omitted are simply absent afterwards. The request body is read
//! strictly, so a document that drifts from the `<section>Visibility` naming is refused
//! instead of being stored and silently ignored by the homepage.

use crate::error::{SettingsError, SettingsErrorExt};
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use folio_derive::{api_handler, api_model};
use folio_domain::constants::{SETTINGS_COLLECTION, SETTINGS_DOCUMENT, SETTINGS_TAG};
use folio_domain::sections::{SectionFlags, SectionKey, Visibility};
use folio_kernel::domain::registry::InitializedSlice;
use folio_kernel::server::error::ApiErrorBody;
use folio_kernel::server::state::ApiState;
use folio_store::{Collection, DocumentId, Store};
use tracing::{debug, info};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// Visibility registry state.
#[folio_derive::folio_slice]
pub struct Settings {
    collection: Collection,
    document: DocumentId,
}

impl Settings {
    /// The stored document, `None` until the first save.
    pub async fn load(&self) -> Result<Option<SettingsDocument>, SettingsError> {
        let found = self.collection.find(&self.document).await.context("reading section flags")?;
        debug!(present = found.is_some(), "Section flags read");
        Ok(found)
    }

    /// Replaces the stored document.
    pub async fn replace(&self, document: &SettingsDocument) -> Result<(), SettingsError> {
        self.collection.write(&self.document, document).await.context("writing section flags")?;
        info!(hidden = ?SectionFlags::from(document).hidden().collect::<Vec<_>>(), "Section flags saved");
        Ok(())
    }
}

/// Opens the registry collection and builds the slice.
pub fn init(store: &Store) -> Result<InitializedSlice, SettingsError> {
    let collection = store.collection(SETTINGS_COLLECTION).context("opening settings collection")?;
    let document = DocumentId::try_from(SETTINGS_DOCUMENT).context("settings document id")?;

    info!(collection = collection.name(), "Settings server slice initialized");

    Ok(InitializedSlice::new(Settings::new(SettingsInner { collection, document })))
}

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new().routes(routes!(read_settings, save_settings))
}

/// The registry document as it travels over HTTP.
///
/// Every key is optional; values must be exactly `"visible"` or `"hidden"`, and keys outside
/// the naming contract are rejected.
#[api_model]
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SettingsDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, example = "visible")]
    pub hero_visibility: Option<Visibility>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub about_visibility: Option<Visibility>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub publications_visibility: Option<Visibility>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub training_visibility: Option<Visibility>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub activities_visibility: Option<Visibility>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub experiences_visibility: Option<Visibility>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub appointments_visibility: Option<Visibility>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, example = "hidden")]
    pub gallery_visibility: Option<Visibility>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub leadership_visibility: Option<Visibility>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub reviews_visibility: Option<Visibility>,
}

impl SettingsDocument {
    const fn slot(&self, key: SectionKey) -> Option<Visibility> {
        match key {
            SectionKey::Hero => self.hero_visibility,
            SectionKey::About => self.about_visibility,
            SectionKey::Publications => self.publications_visibility,
            SectionKey::Training => self.training_visibility,
            SectionKey::Activities => self.activities_visibility,
            SectionKey::Experiences => self.experiences_visibility,
            SectionKey::Appointments => self.appointments_visibility,
            SectionKey::Gallery => self.gallery_visibility,
            SectionKey::Leadership => self.leadership_visibility,
            SectionKey::Reviews => self.reviews_visibility,
        }
    }

    const fn slot_mut(&mut self, key: SectionKey) -> &mut Option<Visibility> {
        match key {
            SectionKey::Hero => &mut self.hero_visibility,
            SectionKey::About => &mut self.about_visibility,
            SectionKey::Publications => &mut self.publications_visibility,
            SectionKey::Training => &mut self.training_visibility,
            SectionKey::Activities => &mut self.activities_visibility,
            SectionKey::Experiences => &mut self.experiences_visibility,
            SectionKey::Appointments => &mut self.appointments_visibility,
            SectionKey::Gallery => &mut self.gallery_visibility,
            SectionKey::Leadership => &mut self.leadership_visibility,
            SectionKey::Reviews => &mut self.reviews_visibility,
        }
    }
}

impl From<&SettingsDocument> for SectionFlags {
    fn from(document: &SettingsDocument) -> Self {
        SectionKey::ALL
            .into_iter()
            .filter_map(|key| document.slot(key).map(|visibility| (key, visibility)))
            .collect()
    }
}

impl From<&SectionFlags> for SettingsDocument {
    fn from(flags: &SectionFlags) -> Self {
        let mut document = Self::default();
        for (key, visibility) in flags.iter() {
            *document.slot_mut(key) = Some(visibility);
        }
        document
    }
}

#[api_handler(
    get,
    path = "/settings",
    responses(
        (status = OK, description = "Zero or one registry documents", body = [SettingsDocument]),
        (status = INTERNAL_SERVER_ERROR, description = "Storage failure", body = ApiErrorBody),
    ),
    tag = SETTINGS_TAG,
)]
pub async fn read_settings(
    State(state): State<ApiState>,
) -> Result<Json<Vec<SettingsDocument>>, ApiErrorBody> {
    let settings = state.try_get_slice::<Settings>()?;
    let stored = settings.load().await?;

    Ok(Json(stored.into_iter().collect()))
}

#[api_handler(
    post,
    path = "/settings",
    request_body = SettingsDocument,
    responses(
        (status = OK, description = "Registry replaced", body = SettingsDocument),
        (status = UNPROCESSABLE_ENTITY, description = "Unknown key or value", body = ApiErrorBody),
        (status = INTERNAL_SERVER_ERROR, description = "Storage failure", body = ApiErrorBody),
    ),
    tag = SETTINGS_TAG,
)]
pub async fn save_settings(
    State(state): State<ApiState>,
    payload: Result<Json<SettingsDocument>, JsonRejection>,
) -> Result<Json<SettingsDocument>, ApiErrorBody> {
    let Json(document) = payload.map_err(|rejection| SettingsError::Rejected {
        message: rejection.body_text().into(),
        context: None,
    })?;

    let settings = state.try_get_slice::<Settings>()?;
    settings.replace(&document).await?;

    Ok(Json(document))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_names_follow_the_contract() {
        let flags = SectionFlags::all_visible().with(SectionKey::Gallery, Visibility::Hidden);
        let document = SettingsDocument::from(&flags);
        let value = serde_json::to_value(&document).unwrap();

        for key in SectionKey::ALL {
            assert!(value.get(key.wire_key()).is_some(), "missing {}", key.wire_key());
        }
        assert_eq!(value["galleryVisibility"], "hidden");
        assert_eq!(SectionFlags::from(&document), flags);
    }

    #[test]
    fn bare_keys_are_refused() {
        let result = serde_json::from_value::<SettingsDocument>(json!({ "hero": "hidden" }));
        assert!(result.is_err());
    }

    #[test]
    fn values_must_be_exact() {
        for bad in [json!("HIDDEN"), json!("hidden "), json!(0), json!(true)] {
            let result =
                serde_json::from_value::<SettingsDocument>(json!({ "heroVisibility": bad }));
            assert!(result.is_err(), "accepted {bad}");
        }
    }

    #[test]
    fn partial_documents_stay_partial() {
        let document: SettingsDocument =
            serde_json::from_value(json!({ "aboutVisibility": "hidden" })).unwrap();
        assert_eq!(serde_json::to_value(&document).unwrap(), json!({ "aboutVisibility": "hidden" }));
        assert_eq!(SectionFlags::from(&document).len(), 1);
    }
}

//! Admin side of the visibility registry.
//!
//! [`SettingsClient`] is the stateless HTTP binding. [`SettingsEditor`] is the one place
//! the admin screen keeps its flags: it loads them, applies local toggles and writes the
//! whole mapping back.

use folio_domain::constants::SETTINGS_PATH;
use folio_domain::sections::{SectionFlags, SectionKey, UnknownSection, Visibility};
use folio_kernel::client::{ApiClient, ClientError, Notice};
use std::borrow::Cow;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct SettingsClient {
    api: ApiClient,
}

impl SettingsClient {
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Reads the registry. The first returned document wins; keys it lacks are visible.
    pub async fn load_flags(&self) -> Result<SectionFlags, ClientError> {
        let documents: Vec<SectionFlags> = self.api.get_json(SETTINGS_PATH).await?;
        debug!(documents = documents.len(), "Section flags fetched");

        Ok(documents.into_iter().next().unwrap_or_default().with_defaults())
    }

    /// Replaces the registry with `flags`, completed to every known section.
    pub async fn save_flags(&self, flags: &SectionFlags) -> Result<(), ClientError> {
        let full = flags.clone().with_defaults();
        let request = self.api.http().post(self.api.url(SETTINGS_PATH)).json(&full);

        self.api.send(request, SETTINGS_PATH).await?;
        info!(hidden = ?full.hidden().collect::<Vec<_>>(), "Section flags sent");
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EditorStatus {
    #[default]
    Idle,
    Loading,
    Saving,
}

#[derive(Debug, Default)]
struct EditorState {
    flags: SectionFlags,
    status: EditorStatus,
    notices: Vec<Notice>,
}

/// State container behind the admin "section visibility" screen.
///
/// Clones share state, so a UI can hand one to a spawned save and keep reading flags and
/// status from another. Only one load or save runs at a time; a second one fails with
/// [`ClientError::Busy`] without touching the network.
#[derive(Debug, Clone)]
pub struct SettingsEditor {
    client: SettingsClient,
    state: Arc<Mutex<EditorState>>,
}

impl SettingsEditor {
    /// Starts with every section visible, as the screen shows before the first load.
    #[must_use]
    pub fn new(client: SettingsClient) -> Self {
        let state = EditorState { flags: SectionFlags::all_visible(), ..EditorState::default() };
        Self { client, state: Arc::new(Mutex::new(state)) }
    }

    #[must_use]
    pub fn flags(&self) -> SectionFlags {
        self.lock().flags.clone()
    }

    #[must_use]
    pub fn visibility(&self, key: SectionKey) -> Visibility {
        self.lock().flags.get(key)
    }

    #[must_use]
    pub fn status(&self) -> EditorStatus {
        self.lock().status
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.status() != EditorStatus::Idle
    }

    /// Drains pending notices, oldest first.
    #[must_use]
    pub fn take_notices(&self) -> Vec<Notice> {
        std::mem::take(&mut self.lock().notices)
    }

    /// Local edit; nothing is sent until [`SettingsEditor::save`].
    pub fn set_flag(&self, key: SectionKey, visibility: Visibility) {
        self.lock().flags.set(key, visibility);
    }

    /// [`SettingsEditor::set_flag`] for keys typed by a user (`gallery` or `galleryVisibility`).
    pub fn set_flag_str(&self, key: &str, visibility: Visibility) -> Result<(), UnknownSection> {
        let key = key.parse::<SectionKey>()?;
        self.set_flag(key, visibility);
        Ok(())
    }

    /// Replaces the local flags with the stored ones. On failure the local flags stay.
    pub async fn load(&self) -> Result<(), ClientError> {
        let _busy = self.begin(EditorStatus::Loading)?;

        match self.client.load_flags().await {
            Ok(flags) => {
                self.lock().flags = flags;
                Ok(())
            },
            Err(err) => {
                warn!(error = %err, "Loading section flags failed");
                self.push(Notice::failure("Failed to load section settings", &err));
                Err(err)
            },
        }
    }

    /// Sends the full local mapping. Nothing is rolled back or retried on failure.
    pub async fn save(&self) -> Result<(), ClientError> {
        let _busy = self.begin(EditorStatus::Saving)?;
        let flags = self.flags();

        match self.client.save_flags(&flags).await {
            Ok(()) => {
                self.push(Notice::success("Section visibility saved"));
                Ok(())
            },
            Err(err) => {
                warn!(error = %err, "Saving section flags failed");
                self.push(Notice::failure("Failed to save section settings", &err));
                Err(err)
            },
        }
    }

    fn begin(&self, status: EditorStatus) -> Result<BusyGuard, ClientError> {
        let mut state = self.lock();
        if state.status != EditorStatus::Idle {
            let message: Cow<'static, str> = match state.status {
                EditorStatus::Saving => "a save is in progress".into(),
                _ => "a load is in progress".into(),
            };
            return Err(ClientError::Busy { message, context: None });
        }
        state.status = status;
        Ok(BusyGuard { state: Arc::clone(&self.state) })
    }

    fn push(&self, notice: Notice) {
        self.lock().notices.push(notice);
    }

    fn lock(&self) -> MutexGuard<'_, EditorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Returns the editor to idle, also when the owning future is dropped mid-request.
struct BusyGuard {
    state: Arc<Mutex<EditorState>>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).status = EditorStatus::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor() -> SettingsEditor {
        SettingsEditor::new(SettingsClient::new(ApiClient::new("http://127.0.0.1:9")))
    }

    #[test]
    fn starts_idle_and_visible() {
        let editor = editor();
        assert_eq!(editor.status(), EditorStatus::Idle);
        assert_eq!(editor.flags(), SectionFlags::all_visible());
    }

    #[test]
    fn toggles_are_local() {
        let editor = editor();
        editor.set_flag(SectionKey::Gallery, Visibility::Hidden);
        editor.set_flag_str("aboutVisibility", Visibility::Hidden).unwrap();

        assert_eq!(editor.visibility(SectionKey::Gallery), Visibility::Hidden);
        assert_eq!(editor.visibility(SectionKey::About), Visibility::Hidden);
        assert!(editor.take_notices().is_empty());
    }

    #[test]
    fn unknown_keys_are_refused() {
        let editor = editor();
        let err = editor.set_flag_str("skills", Visibility::Hidden).unwrap_err();
        assert_eq!(err.key, "skills");
        assert_eq!(editor.flags(), SectionFlags::all_visible());
    }

    #[test]
    fn second_operation_is_busy() {
        let editor = editor();
        let guard = editor.begin(EditorStatus::Saving).unwrap();
        assert!(editor.is_busy());
        assert!(matches!(editor.begin(EditorStatus::Loading), Err(ClientError::Busy { .. })));

        drop(guard);
        assert_eq!(editor.status(), EditorStatus::Idle);
    }
}

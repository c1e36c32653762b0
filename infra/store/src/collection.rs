use crate::engine::Store;
use crate::error::{StoreError, StoreErrorExt};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;
use tokio::sync::{Mutex, OwnedMutexGuard};

const MAX_NAME_LEN: usize = 64;

fn check_name(kind: &'static str, value: &str) -> Result<(), StoreError> {
    if value.is_empty() || value.len() > MAX_NAME_LEN {
        return Err(StoreError::InvalidName {
            message: format!("{kind} must be 1..={MAX_NAME_LEN} characters").into(),
            context: Some(value.to_owned().into()),
        });
    }
    if !value.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
        return Err(StoreError::InvalidName {
            message: format!("{kind} may only use ASCII letters, digits, `_` and `-`").into(),
            context: Some(value.to_owned().into()),
        });
    }
    Ok(())
}

/// Validated collection directory name (lowercase).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionName(String);

impl TryFrom<&str> for CollectionName {
    type Error = StoreError;

    fn try_from(value: &str) -> Result<Self, StoreError> {
        let name = value.to_ascii_lowercase();
        check_name("collection name", &name)?;
        Ok(Self(name))
    }
}

impl TryFrom<String> for CollectionName {
    type Error = StoreError;

    fn try_from(value: String) -> Result<Self, StoreError> {
        Self::try_from(value.as_str())
    }
}

impl AsRef<str> for CollectionName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validated document id; doubles as the file stem. Case is preserved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(String);

impl DocumentId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for DocumentId {
    type Error = StoreError;

    fn try_from(value: &str) -> Result<Self, StoreError> {
        check_name("document id", value)?;
        Ok(Self(value.to_owned()))
    }
}

impl TryFrom<String> for DocumentId {
    type Error = StoreError;

    fn try_from(value: String) -> Result<Self, StoreError> {
        check_name("document id", &value)?;
        Ok(Self(value))
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A directory of JSON documents inside a [`Store`].
///
/// Single operations are atomic on their own. Callers that read, decide and then write
/// (uniqueness checks, read-modify-write) hold [`Collection::lock`] across the sequence.
#[derive(Debug, Clone)]
pub struct Collection {
    store: Store,
    name: Arc<CollectionName>,
    lock: Arc<Mutex<()>>,
}

impl Collection {
    pub(crate) fn new(store: Store, name: CollectionName, lock: Arc<Mutex<()>>) -> Self {
        Self { store, name: Arc::new(name), lock }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name.0
    }

    /// Serializes writers of this collection across every handle of the same store.
    pub async fn lock(&self) -> OwnedMutexGuard<()> {
        Arc::clone(&self.lock).lock_owned().await
    }

    fn document_path(&self, id: &DocumentId) -> Result<PathBuf, StoreError> {
        let file = format!("{id}.{}", self.store.compression().extension());
        self.store.resolve(PathBuf::from(self.name()).join(file))
    }

    /// `Ok(None)` when the document does not exist.
    pub async fn find<T: DeserializeOwned>(&self, id: &DocumentId) -> Result<Option<T>, StoreError> {
        let path = self.document_path(id)?;
        match self.store.read_bytes(&path).await? {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .context(format!("{}/{id}", self.name())),
            None => Ok(None),
        }
    }

    pub async fn read<T: DeserializeOwned>(&self, id: &DocumentId) -> Result<T, StoreError> {
        self.find(id).await?.ok_or_else(|| StoreError::NotFound {
            message: format!("{}/{id}", self.name()).into(),
            context: None,
        })
    }

    /// Creates or replaces the document atomically.
    pub async fn write<T: Serialize + ?Sized>(
        &self,
        id: &DocumentId,
        document: &T,
    ) -> Result<(), StoreError> {
        let path = self.document_path(id)?;
        let bytes = serde_json::to_vec(document).context(format!("{}/{id}", self.name()))?;
        self.store.write_atomic(&path, bytes).await
    }

    /// Returns `false` when the document was already absent.
    pub async fn remove(&self, id: &DocumentId) -> Result<bool, StoreError> {
        let path = self.document_path(id)?;
        self.store.remove_file(&path).await
    }

    pub async fn exists(&self, id: &DocumentId) -> Result<bool, StoreError> {
        let path = self.document_path(id)?;
        fs::try_exists(&path).await.context(format!("probing {}", path.display()))
    }

    /// Ids of every stored document, sorted.
    pub async fn ids(&self) -> Result<Vec<DocumentId>, StoreError> {
        let dir = self.store.resolve(self.name())?;
        let suffix = format!(".{}", self.store.compression().extension());

        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    source,
                    context: Some(format!("listing {}", dir.display()).into()),
                });
            },
        };

        let mut ids = Vec::new();
        while let Some(entry) = entries.next_entry().await.context(format!("listing {}", dir.display()))? {
            let file_name = entry.file_name();
            let Some(stem) = file_name.to_str().and_then(|name| name.strip_suffix(&suffix)) else {
                continue;
            };
            if let Ok(id) = DocumentId::try_from(stem) {
                ids.push(id);
            }
        }
        ids.sort();
        Ok(ids)
    }

    /// Every document in id order. Documents deleted mid-listing are skipped.
    pub async fn list<T: DeserializeOwned>(&self) -> Result<Vec<T>, StoreError> {
        let mut documents = Vec::new();
        for id in self.ids().await? {
            if let Some(document) = self.find(&id).await? {
                documents.push(document);
            }
        }
        Ok(documents)
    }
}

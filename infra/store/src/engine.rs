//! Store handle: sandboxed root, atomic writes, transparent compression.

use crate::builder::StoreBuilder;
use crate::collection::{Collection, CollectionName};
use crate::error::{StoreError, StoreErrorExt};
use crate::maintenance::{self, TMP_MARKER};
use crate::security;
use fxhash::FxHashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Compression {
    #[default]
    None,
    Lz4,
}

impl Compression {
    /// File extension of documents written with this setting.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::None => "json",
            Self::Lz4 => "json.lz4",
        }
    }

    fn encode(self, bytes: Vec<u8>) -> Vec<u8> {
        match self {
            Self::None => bytes,
            Self::Lz4 => lz4_flex::compress_prepend_size(&bytes),
        }
    }

    fn decode(self, bytes: Vec<u8>) -> Result<Vec<u8>, StoreError> {
        match self {
            Self::None => Ok(bytes),
            Self::Lz4 => lz4_flex::decompress_size_prepended(&bytes).context("lz4 block"),
        }
    }
}

#[derive(Debug)]
pub(crate) struct StoreInner {
    pub(crate) root: PathBuf,
    pub(crate) compression: Compression,
    pub(crate) tmp_counter: AtomicU64,
    pub(crate) locks: Mutex<FxHashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

/// Cheap-to-clone handle on a document store rooted at one directory.
///
/// Documents live at `<root>/<collection>/<id>.json` (`.json.lz4` when compressed).
///
/// ```rust
/// use folio_store::{Compression, Store, StoreError};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), StoreError> {
/// # let tmp = tempfile::tempdir().unwrap();
/// let store = Store::builder().root(tmp.path()).compression(Compression::Lz4).connect().await?;
/// let skills = store.collection("skills")?;
///
/// skills.write(&"rust".try_into()?, &serde_json::json!({ "skill": "Rust" })).await?;
/// let all: Vec<serde_json::Value> = skills.list().await?;
/// assert_eq!(all.len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Store {
    pub(crate) inner: Arc<StoreInner>,
}

impl Store {
    pub fn builder() -> StoreBuilder {
        StoreBuilder::new()
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.inner.root
    }

    #[must_use]
    pub fn compression(&self) -> Compression {
        self.inner.compression
    }

    /// Opens a collection handle. Names are lowercased; allowed characters are
    /// `a-z`, `0-9`, `_` and `-`.
    pub fn collection<N>(&self, name: N) -> Result<Collection, StoreError>
    where
        N: TryInto<CollectionName, Error = StoreError>,
    {
        let name = name.try_into()?;
        let lock = self.collection_lock(name.as_ref());
        Ok(Collection::new(self.clone(), name, lock))
    }

    /// Removes stale temp files; returns how many were deleted.
    pub async fn purge_tmp(&self) -> usize {
        maintenance::purge_tmp(&self.inner.root).await
    }

    fn collection_lock(&self, name: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.inner.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(name.to_owned()).or_default())
    }

    pub(crate) fn resolve(&self, relative: impl AsRef<Path>) -> Result<PathBuf, StoreError> {
        security::resolve_path(&self.inner.root, relative)
    }

    pub(crate) async fn read_bytes(&self, path: &Path) -> Result<Option<Vec<u8>>, StoreError> {
        match fs::read(path).await {
            Ok(bytes) => self.inner.compression.decode(bytes).map(Some),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io {
                source,
                context: Some(format!("reading {}", path.display()).into()),
            }),
        }
    }

    /// Temp file, `fsync`, rename over the target, then `fsync` the directory.
    pub(crate) async fn write_atomic(&self, path: &Path, bytes: Vec<u8>) -> Result<(), StoreError> {
        let parent = path.parent().ok_or_else(|| StoreError::Internal {
            message: format!("{} has no parent directory", path.display()).into(),
            context: None,
        })?;
        fs::create_dir_all(parent).await.context(format!("creating {}", parent.display()))?;

        let tmp = self.tmp_path(path);
        let payload = self.inner.compression.encode(bytes);

        let written = async {
            let mut file = fs::OpenOptions::new().create_new(true).write(true).open(&tmp).await?;
            file.write_all(&payload).await?;
            file.sync_all().await
        }
        .await;
        if let Err(source) = written {
            let _ = fs::remove_file(&tmp).await;
            return Err(StoreError::Io {
                source,
                context: Some(format!("writing {}", tmp.display()).into()),
            });
        }

        if let Err(source) = fs::rename(&tmp, path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(StoreError::Io {
                source,
                context: Some(format!("replacing {}", path.display()).into()),
            });
        }

        sync_dir(parent).await;
        debug!(path = %path.display(), "Document written");
        Ok(())
    }

    /// Returns `false` when there was nothing to delete.
    pub(crate) async fn remove_file(&self, path: &Path) -> Result<bool, StoreError> {
        match fs::remove_file(path).await {
            Ok(()) => {
                debug!(path = %path.display(), "Document removed");
                Ok(true)
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(StoreError::Io {
                source,
                context: Some(format!("removing {}", path.display()).into()),
            }),
        }
    }

    fn tmp_path(&self, target: &Path) -> PathBuf {
        let n = self.inner.tmp_counter.fetch_add(1, Ordering::Relaxed);
        let name = target.file_name().and_then(|name| name.to_str()).unwrap_or("document");
        target.with_file_name(format!("{name}{TMP_MARKER}{}.{n}", std::process::id()))
    }
}

async fn sync_dir(dir: &Path) {
    match fs::File::open(dir).await {
        Ok(handle) => {
            if let Err(err) = handle.sync_all().await {
                warn!(path = %dir.display(), error = %err, "Directory fsync failed");
            }
        },
        Err(err) => warn!(path = %dir.display(), error = %err, "Directory open failed"),
    }
}

use crate::engine::{Compression, Store, StoreInner};
use crate::error::{StoreError, StoreErrorExt};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use tokio::fs;
use tracing::info;

#[derive(Debug, Clone, Copy)]
struct Options {
    compression: Compression,
    create: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self { compression: Compression::None, create: true }
    }
}

#[derive(Debug, Default)]
pub struct NoRoot;
#[derive(Debug)]
pub struct WithRoot(PathBuf);

mod private {
    pub(super) trait Sealed {}
}
impl private::Sealed for NoRoot {}
impl private::Sealed for WithRoot {}

/// Typestate builder; `connect` only exists once a root is set.
#[allow(private_bounds)]
#[derive(Debug, Default)]
#[must_use = "the store is not opened until .connect() is awaited"]
pub struct StoreBuilder<S: private::Sealed = NoRoot> {
    state: S,
    options: Options,
}

#[allow(private_bounds)]
impl<S: private::Sealed> StoreBuilder<S> {
    pub const fn compression(mut self, compression: Compression) -> Self {
        self.options.compression = compression;
        self
    }

    /// Create the root directory when missing (default `true`).
    pub const fn create(mut self, create: bool) -> Self {
        self.options.create = create;
        self
    }
}

impl StoreBuilder<NoRoot> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(self, path: impl Into<PathBuf>) -> StoreBuilder<WithRoot> {
        StoreBuilder { state: WithRoot(path.into()), options: self.options }
    }
}

impl StoreBuilder<WithRoot> {
    /// Opens the store: creates and canonicalizes the root, then purges temp files
    /// left behind by interrupted writes.
    pub async fn connect(self) -> Result<Store, StoreError> {
        let root = self.state.0;

        if self.options.create {
            fs::create_dir_all(&root)
                .await
                .context(format!("creating store root {}", root.display()))?;
        }

        let canonical = fs::canonicalize(&root)
            .await
            .context(format!("opening store root {}", root.display()))?;

        let store = Store {
            inner: Arc::new(StoreInner {
                root: canonical,
                compression: self.options.compression,
                tmp_counter: AtomicU64::new(1),
                locks: std::sync::Mutex::default(),
            }),
        };

        store.purge_tmp().await;
        info!(root = %store.root().display(), compression = ?store.compression(), "Store opened");

        Ok(store)
    }
}

//! # Store
//!
//! A small document store on the local filesystem, used by the Folio server for the
//! visibility registry and every content collection.
//!
//! * **Sandboxed**: every path is resolved against the canonical root; `..`, absolute
//!   paths and symlinks leading outside are rejected.
//! * **Atomic**: documents are written to a unique temp file, synced, then renamed, so a
//!   reader sees either the old or the new document.
//! * **Compressed on demand**: [`Compression::Lz4`] stores `.json.lz4` blocks.
//! * **Self-cleaning**: temp files orphaned by a crash are purged on connect.

mod builder;
mod collection;
mod engine;
mod error;
mod maintenance;
mod security;

pub use builder::StoreBuilder;
pub use collection::{Collection, CollectionName, DocumentId};
pub use engine::{Compression, Store};
pub use error::{StoreError, StoreErrorExt};

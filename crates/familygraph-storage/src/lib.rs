//! FamilyGraph Storage - Storage backends for the kinship engine
//!
//! Every backend implements the store traits from `familygraph-core`
//! and enforces one edge per ordered person pair.

#![allow(clippy::result_large_err)]

pub mod error;
pub mod memory;
pub mod migration;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use error::{StorageError, StorageResult};
pub use memory::MemoryStorage;
pub use migration::{Migratable, SchemaVersion, CURRENT_VERSION, MIGRATIONS};

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStorage;

//! Schema versions for persistent backends
//!
//! Each version carries the DDL that brings a store from the previous
//! version to it. Backends record the applied version and replay whatever
//! is missing on open.

use crate::StorageResult;

/// One schema step
#[derive(Debug, Clone, Copy)]
pub struct SchemaVersion {
    pub version: u32,
    pub description: &'static str,
    pub sql: &'static str,
}

pub const MIGRATIONS: &[SchemaVersion] = &[
    SchemaVersion {
        version: 1,
        description: "Families, persons and relationships",
        sql: r#"
            CREATE TABLE IF NOT EXISTS families (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                data TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS persons (
                id TEXT PRIMARY KEY,
                family_id TEXT NOT NULL,
                created_at TEXT NOT NULL,
                data TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS relationships (
                id TEXT PRIMARY KEY,
                family_id TEXT NOT NULL,
                from_id TEXT NOT NULL,
                to_id TEXT NOT NULL,
                relation_type TEXT NOT NULL,
                data TEXT NOT NULL,
                UNIQUE (family_id, from_id, to_id)
            );

            CREATE INDEX IF NOT EXISTS idx_persons_family ON persons(family_id);
            CREATE INDEX IF NOT EXISTS idx_relationships_family ON relationships(family_id);
            CREATE INDEX IF NOT EXISTS idx_relationships_from ON relationships(from_id);
            CREATE INDEX IF NOT EXISTS idx_relationships_to ON relationships(to_id);
        "#,
    },
    SchemaVersion {
        version: 2,
        description: "Custom title maps",
        sql: r#"
            CREATE TABLE IF NOT EXISTS title_maps (
                id TEXT PRIMARY KEY,
                family_id TEXT NOT NULL,
                created_at TEXT NOT NULL,
                data TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_title_maps_family ON title_maps(family_id);
        "#,
    },
];

pub const CURRENT_VERSION: u32 = MIGRATIONS.len() as u32;

/// A store with a versioned schema
pub trait Migratable {
    /// Applied version, 0 for a fresh store
    fn schema_version(&self) -> StorageResult<u32>;

    /// Apply one step and record its version
    fn apply(&self, migration: &SchemaVersion) -> StorageResult<()>;

    /// Apply every step newer than the stored version; returns the version reached
    fn migrate_to_latest(&self) -> StorageResult<u32> {
        let current = self.schema_version()?;
        if current > CURRENT_VERSION {
            tracing::warn!(
                "Schema version {} is newer than this build ({}); leaving it alone",
                current,
                CURRENT_VERSION
            );
            return Ok(current);
        }

        for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
            tracing::debug!("Applying schema v{}: {}", migration.version, migration.description);
            self.apply(migration)?;
        }
        if current < CURRENT_VERSION {
            tracing::info!("Schema upgraded from v{} to v{}", current, CURRENT_VERSION);
        }
        Ok(CURRENT_VERSION)
    }
}

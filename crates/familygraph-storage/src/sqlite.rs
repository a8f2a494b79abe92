//! SQLite storage backend
//!
//! Records are stored as JSON in a `data` column next to the key columns the
//! queries filter on. The `relationships` table carries the ordered-pair
//! uniqueness constraint, so `INSERT OR IGNORE` implements pair dedup.

use crate::error::{StorageError, StorageResult};
use crate::migration::{Migratable, SchemaVersion};
use async_trait::async_trait;
use familygraph_core::{
    EdgeId, EdgeStore, Family, FamilyId, FamilyStore, Person, PersonDirectory, PersonId,
    RelationEdge, RelationType, Result, TitleMap, TitleMapId, TitleMapStore,
};
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Open or create a SQLite database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let conn = Connection::open(path.as_ref())?;
        tracing::debug!("Opened SQLite database at {}", path.as_ref().display());
        Self::init(conn)
    }

    /// Create an in-memory SQLite database (for testing)
    pub fn in_memory() -> StorageResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> StorageResult<Self> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER NOT NULL
            );
            "#,
        )?;

        let storage = Self {
            conn: Mutex::new(conn),
        };
        storage.migrate_to_latest()?;
        Ok(storage)
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))
    }

    fn query_records<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> StorageResult<Vec<T>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(params, |row| row.get::<_, String>(0))?;

        let mut records = Vec::new();
        for row in rows {
            records.push(serde_json::from_str(&row?)?);
        }
        Ok(records)
    }

    fn query_record<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> StorageResult<Option<T>> {
        let conn = self.lock()?;
        let data: Option<String> = conn
            .query_row(sql, params, |row| row.get(0))
            .optional()?;
        data.map(|d| serde_json::from_str(&d).map_err(StorageError::from))
            .transpose()
    }

    fn execute(&self, sql: &str, params: impl rusqlite::Params) -> StorageResult<usize> {
        Ok(self.lock()?.execute(sql, params)?)
    }

    fn insert_edge_tx(tx: &Transaction<'_>, edge: &RelationEdge) -> StorageResult<bool> {
        let data = serde_json::to_string(edge)?;
        let changed = tx.execute(
            "INSERT OR IGNORE INTO relationships
                 (id, family_id, from_id, to_id, relation_type, data)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                edge.id.to_string(),
                edge.family_id.to_string(),
                edge.from_id.to_string(),
                edge.to_id.to_string(),
                edge.relation_type.as_str(),
                data
            ],
        )?;
        Ok(changed > 0)
    }

    fn insert_edges(&self, edges: &[RelationEdge]) -> StorageResult<Vec<bool>> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let mut inserted = Vec::with_capacity(edges.len());
        for edge in edges {
            inserted.push(Self::insert_edge_tx(&tx, edge)?);
        }
        tx.commit()?;
        Ok(inserted)
    }

    fn edges_where(
        &self,
        column: &str,
        person: &PersonId,
        types: Option<&[RelationType]>,
    ) -> StorageResult<Vec<RelationEdge>> {
        let edges: Vec<RelationEdge> = self.query_records(
            &format!("SELECT data FROM relationships WHERE {} = ?1 ORDER BY rowid", column),
            params![person.to_string()],
        )?;
        Ok(match types {
            Some(types) => edges
                .into_iter()
                .filter(|e| types.contains(&e.relation_type))
                .collect(),
            None => edges,
        })
    }

    fn remove_person(&self, id: &PersonId) -> StorageResult<Option<usize>> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let removed = tx.execute("DELETE FROM persons WHERE id = ?1", params![id.to_string()])?;
        if removed == 0 {
            return Ok(None);
        }
        let edges = tx.execute(
            "DELETE FROM relationships WHERE from_id = ?1 OR to_id = ?1",
            params![id.to_string()],
        )?;
        tx.commit()?;
        Ok(Some(edges))
    }

    fn remove_family(&self, id: &FamilyId) -> StorageResult<bool> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let family = id.to_string();
        if tx.execute("DELETE FROM families WHERE id = ?1", params![family])? == 0 {
            return Ok(false);
        }
        tx.execute("DELETE FROM relationships WHERE family_id = ?1", params![family])?;
        tx.execute("DELETE FROM persons WHERE family_id = ?1", params![family])?;
        tx.execute("DELETE FROM title_maps WHERE family_id = ?1", params![family])?;
        tx.commit()?;
        Ok(true)
    }
}

impl Migratable for SqliteStorage {
    fn schema_version(&self) -> StorageResult<u32> {
        let conn = self.lock()?;
        let version: Option<u32> = conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))
            .optional()?
            .flatten();
        Ok(version.unwrap_or(0))
    }

    fn apply(&self, migration: &SchemaVersion) -> StorageResult<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        tx.execute_batch(migration.sql)
            .map_err(|e| StorageError::Migration(format!("v{}: {}", migration.version, e)))?;
        tx.execute("DELETE FROM schema_version", [])?;
        tx.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            params![migration.version],
        )?;
        tx.commit()?;
        Ok(())
    }
}

#[async_trait]
impl PersonDirectory for SqliteStorage {
    async fn get_person(&self, id: &PersonId) -> Result<Option<Person>> {
        Ok(self.query_record(
            "SELECT data FROM persons WHERE id = ?1",
            params![id.to_string()],
        )?)
    }

    async fn list_persons(&self, family: &FamilyId) -> Result<Vec<Person>> {
        Ok(self.query_records(
            "SELECT data FROM persons WHERE family_id = ?1 ORDER BY created_at, id",
            params![family.to_string()],
        )?)
    }

    async fn save_person(&self, person: &Person) -> Result<()> {
        let data = serde_json::to_string(person)?;
        self.execute(
            "INSERT OR REPLACE INTO persons (id, family_id, created_at, data) VALUES (?1, ?2, ?3, ?4)",
            params![
                person.id.to_string(),
                person.family_id.to_string(),
                person.created_at.to_rfc3339(),
                data
            ],
        )?;
        Ok(())
    }

    async fn delete_person(&self, id: &PersonId) -> Result<Option<usize>> {
        Ok(self.remove_person(id)?)
    }
}

#[async_trait]
impl EdgeStore for SqliteStorage {
    async fn insert_edge(&self, edge: &RelationEdge) -> Result<bool> {
        let mut inserted = self.insert_edges(std::slice::from_ref(edge))?;
        Ok(inserted.pop().unwrap_or(false))
    }

    async fn insert_edges_atomic(&self, edges: &[RelationEdge]) -> Result<Vec<bool>> {
        Ok(self.insert_edges(edges)?)
    }

    async fn edges_from(
        &self,
        person: &PersonId,
        types: Option<&[RelationType]>,
    ) -> Result<Vec<RelationEdge>> {
        Ok(self.edges_where("from_id", person, types)?)
    }

    async fn edges_to(
        &self,
        person: &PersonId,
        types: Option<&[RelationType]>,
    ) -> Result<Vec<RelationEdge>> {
        Ok(self.edges_where("to_id", person, types)?)
    }

    async fn edge_between(&self, from: &PersonId, to: &PersonId) -> Result<Option<RelationEdge>> {
        Ok(self.query_record(
            "SELECT data FROM relationships WHERE from_id = ?1 AND to_id = ?2 LIMIT 1",
            params![from.to_string(), to.to_string()],
        )?)
    }

    async fn get_edge(&self, id: &EdgeId) -> Result<Option<RelationEdge>> {
        Ok(self.query_record(
            "SELECT data FROM relationships WHERE id = ?1",
            params![id.to_string()],
        )?)
    }

    async fn delete_edge(&self, id: &EdgeId) -> Result<bool> {
        let removed = self.execute(
            "DELETE FROM relationships WHERE id = ?1",
            params![id.to_string()],
        )?;
        Ok(removed > 0)
    }

    async fn all_edges(&self, family: &FamilyId) -> Result<Vec<RelationEdge>> {
        Ok(self.query_records(
            "SELECT data FROM relationships WHERE family_id = ?1 ORDER BY rowid",
            params![family.to_string()],
        )?)
    }
}

#[async_trait]
impl FamilyStore for SqliteStorage {
    async fn save_family(&self, family: &Family) -> Result<()> {
        let data = serde_json::to_string(family)?;
        self.execute(
            "INSERT OR REPLACE INTO families (id, name, data) VALUES (?1, ?2, ?3)",
            params![family.id.to_string(), family.name, data],
        )?;
        Ok(())
    }

    async fn get_family(&self, id: &FamilyId) -> Result<Option<Family>> {
        Ok(self.query_record(
            "SELECT data FROM families WHERE id = ?1",
            params![id.to_string()],
        )?)
    }

    async fn list_families(&self) -> Result<Vec<Family>> {
        Ok(self.query_records("SELECT data FROM families ORDER BY name", [])?)
    }

    async fn delete_family(&self, id: &FamilyId) -> Result<bool> {
        Ok(self.remove_family(id)?)
    }
}

#[async_trait]
impl TitleMapStore for SqliteStorage {
    async fn save_title_map(&self, map: &TitleMap) -> Result<()> {
        let data = serde_json::to_string(map)?;
        self.execute(
            "INSERT OR REPLACE INTO title_maps (id, family_id, created_at, data) VALUES (?1, ?2, ?3, ?4)",
            params![
                map.id.to_string(),
                map.family_id.to_string(),
                map.created_at.to_rfc3339(),
                data
            ],
        )?;
        Ok(())
    }

    async fn get_title_map(&self, id: &TitleMapId) -> Result<Option<TitleMap>> {
        Ok(self.query_record(
            "SELECT data FROM title_maps WHERE id = ?1",
            params![id.to_string()],
        )?)
    }

    async fn list_title_maps(&self, family: &FamilyId) -> Result<Vec<TitleMap>> {
        Ok(self.query_records(
            "SELECT data FROM title_maps WHERE family_id = ?1 ORDER BY created_at, id",
            params![family.to_string()],
        )?)
    }

    async fn delete_title_map(&self, id: &TitleMapId) -> Result<bool> {
        let removed = self.execute(
            "DELETE FROM title_maps WHERE id = ?1",
            params![id.to_string()],
        )?;
        Ok(removed > 0)
    }
}

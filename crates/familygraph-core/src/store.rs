//! Store traits consumed by the engine
//!
//! Every storage backend implements these traits. They are split by concern
//! so the engine only depends on what it reads; [`KinshipStore`] bundles them.

use crate::error::Result;
use crate::family::{Family, FamilyId};
use crate::overrides::{TitleMap, TitleMapId};
use crate::person::{Gender, Person, PersonId};
use crate::relation::{EdgeId, RelationEdge, RelationType};
use async_trait::async_trait;

/// Person lookups and persistence
#[async_trait]
pub trait PersonDirectory: Send + Sync {
    /// Get a person by ID
    async fn get_person(&self, id: &PersonId) -> Result<Option<Person>>;

    /// List all persons in a family
    async fn list_persons(&self, family: &FamilyId) -> Result<Vec<Person>>;

    /// Insert or replace a person
    async fn save_person(&self, person: &Person) -> Result<()>;

    /// Delete a person and every edge touching them.
    ///
    /// Returns the number of edges removed, or None if the person did not exist.
    async fn delete_person(&self, id: &PersonId) -> Result<Option<usize>>;

    async fn gender(&self, id: &PersonId) -> Result<Option<Gender>> {
        Ok(self.get_person(id).await?.map(|p| p.gender))
    }

    async fn family_of(&self, id: &PersonId) -> Result<Option<FamilyId>> {
        Ok(self.get_person(id).await?.map(|p| p.family_id))
    }
}

/// Relation edge persistence.
///
/// Backends enforce at most one edge per ordered `(from, to)` pair: inserting
/// into a populated pair is skipped, never overwritten.
#[async_trait]
pub trait EdgeStore: Send + Sync {
    /// Insert one edge. Returns false if the ordered pair was already populated.
    async fn insert_edge(&self, edge: &RelationEdge) -> Result<bool>;

    /// Insert edges as one all-or-nothing unit.
    ///
    /// Pair deduplication still applies per edge (including between edges of
    /// the same batch); the returned flags say which edges were written.
    async fn insert_edges_atomic(&self, edges: &[RelationEdge]) -> Result<Vec<bool>>;

    /// Edges `person -t-> *`, optionally restricted to `types`
    async fn edges_from(
        &self,
        person: &PersonId,
        types: Option<&[RelationType]>,
    ) -> Result<Vec<RelationEdge>>;

    /// Edges `* -t-> person`, optionally restricted to `types`
    async fn edges_to(
        &self,
        person: &PersonId,
        types: Option<&[RelationType]>,
    ) -> Result<Vec<RelationEdge>>;

    /// The edge stored for the ordered pair, if any
    async fn edge_between(&self, from: &PersonId, to: &PersonId) -> Result<Option<RelationEdge>>;

    async fn exists_pair(&self, from: &PersonId, to: &PersonId) -> Result<bool> {
        Ok(self.edge_between(from, to).await?.is_some())
    }

    async fn get_edge(&self, id: &EdgeId) -> Result<Option<RelationEdge>>;

    /// Delete an edge. Returns false if it did not exist.
    async fn delete_edge(&self, id: &EdgeId) -> Result<bool>;

    /// Every edge of a family
    async fn all_edges(&self, family: &FamilyId) -> Result<Vec<RelationEdge>>;
}

/// Family persistence
#[async_trait]
pub trait FamilyStore: Send + Sync {
    async fn save_family(&self, family: &Family) -> Result<()>;

    async fn get_family(&self, id: &FamilyId) -> Result<Option<Family>>;

    async fn list_families(&self) -> Result<Vec<Family>>;

    /// Delete a family with its persons, edges and title maps.
    /// Returns false if it did not exist.
    async fn delete_family(&self, id: &FamilyId) -> Result<bool>;
}

/// Custom title map persistence
#[async_trait]
pub trait TitleMapStore: Send + Sync {
    async fn save_title_map(&self, map: &TitleMap) -> Result<()>;

    async fn get_title_map(&self, id: &TitleMapId) -> Result<Option<TitleMap>>;

    async fn list_title_maps(&self, family: &FamilyId) -> Result<Vec<TitleMap>>;

    /// Returns false if the map did not exist
    async fn delete_title_map(&self, id: &TitleMapId) -> Result<bool>;
}

/// Everything the engine needs from a backend
pub trait KinshipStore: PersonDirectory + EdgeStore + FamilyStore + TitleMapStore {}

impl<T> KinshipStore for T where T: PersonDirectory + EdgeStore + FamilyStore + TitleMapStore {}

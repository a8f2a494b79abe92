//! In-memory storage backend
//!
//! Useful for testing and temporary storage. All state lives behind one lock,
//! so a batch insert is trivially all-or-nothing.

use crate::error::{StorageError, StorageResult};
use async_trait::async_trait;
use familygraph_core::{
    EdgeId, EdgeStore, Family, FamilyId, FamilyStore, Person, PersonDirectory, PersonId,
    RelationEdge, RelationType, Result, TitleMap, TitleMapId, TitleMapStore,
};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

type PairKey = (FamilyId, PersonId, PersonId);

#[derive(Default)]
struct MemoryState {
    families: HashMap<FamilyId, Family>,
    persons: HashMap<PersonId, Person>,
    /// Insertion order is preserved so traversals are repeatable
    edges: Vec<RelationEdge>,
    pairs: HashMap<PairKey, EdgeId>,
    title_maps: HashMap<TitleMapId, TitleMap>,
}

impl MemoryState {
    fn insert_edge(&mut self, edge: &RelationEdge) -> bool {
        let key = (edge.family_id.clone(), edge.from_id.clone(), edge.to_id.clone());
        if self.pairs.contains_key(&key) {
            return false;
        }
        self.pairs.insert(key, edge.id.clone());
        self.edges.push(edge.clone());
        true
    }

    /// Remove every edge matching `pred`, keeping the pair index in sync
    fn remove_edges(&mut self, pred: impl Fn(&RelationEdge) -> bool) -> usize {
        let before = self.edges.len();
        let pairs = &mut self.pairs;
        self.edges.retain(|edge| {
            if pred(edge) {
                pairs.remove(&(edge.family_id.clone(), edge.from_id.clone(), edge.to_id.clone()));
                false
            } else {
                true
            }
        });
        before - self.edges.len()
    }
}

/// In-memory storage backend
pub struct MemoryStorage {
    state: RwLock<MemoryState>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(MemoryState::default()),
        }
    }

    fn read(&self) -> StorageResult<RwLockReadGuard<'_, MemoryState>> {
        self.state
            .read()
            .map_err(|e| StorageError::Lock(e.to_string()))
    }

    fn write(&self) -> StorageResult<RwLockWriteGuard<'_, MemoryState>> {
        self.state
            .write()
            .map_err(|e| StorageError::Lock(e.to_string()))
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

fn type_matches(edge: &RelationEdge, types: Option<&[RelationType]>) -> bool {
    types.map_or(true, |types| types.contains(&edge.relation_type))
}

#[async_trait]
impl PersonDirectory for MemoryStorage {
    async fn get_person(&self, id: &PersonId) -> Result<Option<Person>> {
        Ok(self.read()?.persons.get(id).cloned())
    }

    async fn list_persons(&self, family: &FamilyId) -> Result<Vec<Person>> {
        let state = self.read()?;
        let mut persons: Vec<Person> = state
            .persons
            .values()
            .filter(|p| &p.family_id == family)
            .cloned()
            .collect();
        persons.sort_by(|a, b| (a.created_at, &a.id).cmp(&(b.created_at, &b.id)));
        Ok(persons)
    }

    async fn save_person(&self, person: &Person) -> Result<()> {
        self.write()?.persons.insert(person.id.clone(), person.clone());
        Ok(())
    }

    async fn delete_person(&self, id: &PersonId) -> Result<Option<usize>> {
        let mut state = self.write()?;
        if state.persons.remove(id).is_none() {
            return Ok(None);
        }
        let removed = state.remove_edges(|e| &e.from_id == id || &e.to_id == id);
        Ok(Some(removed))
    }
}

#[async_trait]
impl EdgeStore for MemoryStorage {
    async fn insert_edge(&self, edge: &RelationEdge) -> Result<bool> {
        Ok(self.write()?.insert_edge(edge))
    }

    async fn insert_edges_atomic(&self, edges: &[RelationEdge]) -> Result<Vec<bool>> {
        let mut state = self.write()?;
        Ok(edges.iter().map(|edge| state.insert_edge(edge)).collect())
    }

    async fn edges_from(
        &self,
        person: &PersonId,
        types: Option<&[RelationType]>,
    ) -> Result<Vec<RelationEdge>> {
        let state = self.read()?;
        Ok(state
            .edges
            .iter()
            .filter(|e| &e.from_id == person && type_matches(e, types))
            .cloned()
            .collect())
    }

    async fn edges_to(
        &self,
        person: &PersonId,
        types: Option<&[RelationType]>,
    ) -> Result<Vec<RelationEdge>> {
        let state = self.read()?;
        Ok(state
            .edges
            .iter()
            .filter(|e| &e.to_id == person && type_matches(e, types))
            .cloned()
            .collect())
    }

    async fn edge_between(&self, from: &PersonId, to: &PersonId) -> Result<Option<RelationEdge>> {
        let state = self.read()?;
        Ok(state.edges.iter().find(|e| e.connects(from, to)).cloned())
    }

    async fn get_edge(&self, id: &EdgeId) -> Result<Option<RelationEdge>> {
        let state = self.read()?;
        Ok(state.edges.iter().find(|e| &e.id == id).cloned())
    }

    async fn delete_edge(&self, id: &EdgeId) -> Result<bool> {
        Ok(self.write()?.remove_edges(|e| &e.id == id) > 0)
    }

    async fn all_edges(&self, family: &FamilyId) -> Result<Vec<RelationEdge>> {
        let state = self.read()?;
        Ok(state
            .edges
            .iter()
            .filter(|e| &e.family_id == family)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl FamilyStore for MemoryStorage {
    async fn save_family(&self, family: &Family) -> Result<()> {
        self.write()?.families.insert(family.id.clone(), family.clone());
        Ok(())
    }

    async fn get_family(&self, id: &FamilyId) -> Result<Option<Family>> {
        Ok(self.read()?.families.get(id).cloned())
    }

    async fn list_families(&self) -> Result<Vec<Family>> {
        let mut families: Vec<Family> = self.read()?.families.values().cloned().collect();
        families.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(families)
    }

    async fn delete_family(&self, id: &FamilyId) -> Result<bool> {
        let mut state = self.write()?;
        if state.families.remove(id).is_none() {
            return Ok(false);
        }
        state.persons.retain(|_, p| &p.family_id != id);
        state.title_maps.retain(|_, m| &m.family_id != id);
        state.remove_edges(|e| &e.family_id == id);
        Ok(true)
    }
}

#[async_trait]
impl TitleMapStore for MemoryStorage {
    async fn save_title_map(&self, map: &TitleMap) -> Result<()> {
        self.write()?.title_maps.insert(map.id.clone(), map.clone());
        Ok(())
    }

    async fn get_title_map(&self, id: &TitleMapId) -> Result<Option<TitleMap>> {
        Ok(self.read()?.title_maps.get(id).cloned())
    }

    async fn list_title_maps(&self, family: &FamilyId) -> Result<Vec<TitleMap>> {
        let state = self.read()?;
        let mut maps: Vec<TitleMap> = state
            .title_maps
            .values()
            .filter(|m| &m.family_id == family)
            .cloned()
            .collect();
        maps.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(maps)
    }

    async fn delete_title_map(&self, id: &TitleMapId) -> Result<bool> {
        Ok(self.write()?.title_maps.remove(id).is_some())
    }
}

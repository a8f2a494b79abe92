//! End-to-end engine tests against the storage backends

use async_trait::async_trait;
use familygraph_core::{
    EdgeId, EdgeStore, EngineConfig, Error, Family, FamilyId, FamilyStore, Gender,
    InferenceMode, InferenceRule, KinshipEngine, KinshipStore, NewPerson, NoOverrides, Person,
    PersonDirectory, PersonId, RelationEdge, RelationType, Result, TitleMap, TitleMapId,
    TitleMapStore, TitleSource,
};
use familygraph_storage::{MemoryStorage, SqliteStorage};
use std::sync::{Arc, Mutex};

fn memory_engine() -> KinshipEngine<MemoryStorage> {
    KinshipEngine::new(Arc::new(MemoryStorage::new()))
}

async fn first_member<S: KinshipStore>(
    engine: &KinshipEngine<S>,
    family: &FamilyId,
    name: &str,
    gender: Gender,
) -> Person {
    engine
        .create_person(family, NewPerson::new(name, gender))
        .await
        .unwrap()
        .person
}

async fn relative<S: KinshipStore>(
    engine: &KinshipEngine<S>,
    family: &FamilyId,
    name: &str,
    gender: Gender,
    of: &PersonId,
    relation_type: RelationType,
) -> Person {
    engine
        .create_person(family, NewPerson::new(name, gender).related_to(of.clone(), relation_type))
        .await
        .unwrap()
        .person
}

async fn edge_type<S: KinshipStore>(
    engine: &KinshipEngine<S>,
    from: &PersonId,
    to: &PersonId,
) -> Option<RelationType> {
    engine
        .store()
        .edge_between(from, to)
        .await
        .unwrap()
        .map(|e| e.relation_type)
}

/// `F` is the father of `R`; `P` joins as `R`'s older brother.
async fn sibling_inherits_father<S: KinshipStore>(engine: KinshipEngine<S>) {
    let family = engine.create_family("Zhang").await.unwrap();
    let r = first_member(&engine, &family.id, "R", Gender::Male).await;
    let f = relative(&engine, &family.id, "F", Gender::Male, &r.id, RelationType::Father).await;

    let created = engine
        .create_person(
            &family.id,
            NewPerson::new("P", Gender::Male).related_to(r.id.clone(), RelationType::OlderBrother),
        )
        .await
        .unwrap();
    let p = created.person;
    let link = created.link.unwrap();

    assert_eq!(link.explicit.len(), 2);
    assert_eq!(link.inference.created_by(InferenceRule::SiblingParents), 2);
    assert_eq!(edge_type(&engine, &p.id, &r.id).await, Some(RelationType::OlderBrother));
    assert_eq!(edge_type(&engine, &r.id, &p.id).await, Some(RelationType::YoungerBrother));
    assert_eq!(edge_type(&engine, &f.id, &p.id).await, Some(RelationType::Father));
    assert_eq!(edge_type(&engine, &p.id, &f.id).await, Some(RelationType::Son));
    assert_eq!(p.generation, 0);
    assert_eq!(f.generation, -1);
}

#[tokio::test]
async fn test_sibling_inherits_father_in_memory() {
    sibling_inherits_father(memory_engine()).await;
}

#[tokio::test]
async fn test_sibling_inherits_father_in_sqlite() {
    let storage = SqliteStorage::in_memory().unwrap();
    sibling_inherits_father(KinshipEngine::new(Arc::new(storage))).await;
}

#[tokio::test]
async fn test_every_explicit_edge_has_its_reverse() {
    let engine = memory_engine();
    let family = engine.create_family("Pairs").await.unwrap();

    for relation_type in RelationType::ALL {
        for to_gender in [Gender::Male, Gender::Female] {
            let from = first_member(&engine, &family.id, "from", Gender::Female).await;
            let to = first_member(&engine, &family.id, "to", to_gender).await;

            let pair = engine
                .create_explicit_relationship(&family.id, &from.id, &to.id, relation_type)
                .await
                .unwrap();

            assert_eq!(pair.forward.relation_type, relation_type);
            assert_eq!(pair.reverse.from_id, to.id);
            assert_eq!(pair.reverse.to_id, from.id);
            assert_eq!(
                pair.reverse.relation_type,
                engine.catalog().reverse_of(relation_type, to_gender)
            );
            assert_eq!(
                edge_type(&engine, &to.id, &from.id).await,
                Some(pair.reverse.relation_type)
            );
        }
    }
}

#[tokio::test]
async fn test_populated_pair_keeps_existing_edge() {
    let engine = memory_engine();
    let family = engine.create_family("Li").await.unwrap();
    let a = first_member(&engine, &family.id, "a", Gender::Male).await;
    let b = first_member(&engine, &family.id, "b", Gender::Male).await;

    engine
        .create_explicit_relationship(&family.id, &a.id, &b.id, RelationType::Father)
        .await
        .unwrap();
    let again = engine
        .create_explicit_relationship(&family.id, &a.id, &b.id, RelationType::OlderBrother)
        .await
        .unwrap();

    assert_eq!(again.forward.relation_type, RelationType::Father);
    assert_eq!(again.reverse.relation_type, RelationType::Son);
    assert_eq!(engine.store().all_edges(&family.id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_linking_twice_adds_nothing() {
    let engine = memory_engine();
    let family = engine.create_family("Zhou").await.unwrap();
    let r = first_member(&engine, &family.id, "R", Gender::Female).await;
    relative(&engine, &family.id, "F", Gender::Male, &r.id, RelationType::Father).await;
    relative(&engine, &family.id, "M", Gender::Female, &r.id, RelationType::Mother).await;
    let p = relative(&engine, &family.id, "P", Gender::Female, &r.id, RelationType::YoungerSister).await;
    let before = engine.store().all_edges(&family.id).await.unwrap().len();

    let link = engine
        .on_person_created(&family.id, &p.id, p.gender, &r.id, RelationType::YoungerSister)
        .await
        .unwrap();

    assert!(link.explicit.is_empty());
    assert!(link.inference.created.is_empty());
    assert_eq!(engine.store().all_edges(&family.id).await.unwrap().len(), before);
}

#[tokio::test]
async fn test_second_parent_becomes_spouse() {
    let engine = memory_engine();
    let family = engine.create_family("Wu").await.unwrap();
    let a = first_member(&engine, &family.id, "A", Gender::Male).await;
    let f = relative(&engine, &family.id, "F", Gender::Male, &a.id, RelationType::Father).await;
    let m = relative(&engine, &family.id, "M", Gender::Female, &a.id, RelationType::Mother).await;

    assert_eq!(edge_type(&engine, &m.id, &f.id).await, Some(RelationType::Wife));
    assert_eq!(edge_type(&engine, &f.id, &m.id).await, Some(RelationType::Husband));
}

#[tokio::test]
async fn test_spouse_inherits_children() {
    let engine = memory_engine();
    let family = engine.create_family("Zheng").await.unwrap();
    let a = first_member(&engine, &family.id, "A", Gender::Male).await;
    let f = relative(&engine, &family.id, "F", Gender::Male, &a.id, RelationType::Father).await;

    let created = engine
        .create_person(
            &family.id,
            NewPerson::new("M", Gender::Female).related_to(f.id.clone(), RelationType::Wife),
        )
        .await
        .unwrap();
    let m = created.person;

    assert_eq!(m.generation, f.generation);
    assert_eq!(created.link.unwrap().inference.created_by(InferenceRule::SpouseChildren), 2);
    assert_eq!(edge_type(&engine, &m.id, &a.id).await, Some(RelationType::Mother));
    assert_eq!(edge_type(&engine, &a.id, &m.id).await, Some(RelationType::Son));

    let title = engine
        .resolve_title_for(&family.id, &a.id, &m.id, &NoOverrides)
        .await
        .unwrap();
    assert_eq!(title.title, "母亲");
    assert_eq!(title.hops, 1);
}

#[tokio::test]
async fn test_generation_follows_reference() {
    let engine = memory_engine();
    let family = engine.create_family("Gen").await.unwrap();
    let a = first_member(&engine, &family.id, "A", Gender::Male).await;
    let f = relative(&engine, &family.id, "F", Gender::Male, &a.id, RelationType::Father).await;
    let g = relative(&engine, &family.id, "G", Gender::Male, &f.id, RelationType::Father).await;
    let s = relative(&engine, &family.id, "S", Gender::Female, &a.id, RelationType::Daughter).await;
    let w = relative(&engine, &family.id, "W", Gender::Female, &a.id, RelationType::Wife).await;

    assert_eq!(a.generation, 0);
    assert_eq!(f.generation, -1);
    assert_eq!(g.generation, -2);
    assert_eq!(s.generation, 1);
    assert_eq!(w.generation, 0);
}

#[tokio::test]
async fn test_titles_along_paternal_chain() {
    let engine = memory_engine();
    let family = engine.create_family("Chen").await.unwrap();
    let a = first_member(&engine, &family.id, "A", Gender::Male).await;
    let b = relative(&engine, &family.id, "B", Gender::Male, &a.id, RelationType::Father).await;
    let c = relative(&engine, &family.id, "C", Gender::Male, &b.id, RelationType::Father).await;
    let u = relative(&engine, &family.id, "U", Gender::Male, &b.id, RelationType::OlderBrother).await;

    let grandfather = engine
        .resolve_title_for(&family.id, &a.id, &c.id, &NoOverrides)
        .await
        .unwrap();
    assert_eq!(grandfather.title, "祖父");
    assert_eq!(grandfather.path_key.as_deref(), Some("FATHER>FATHER|male"));
    assert_eq!(grandfather.source, TitleSource::Catalog);

    let uncle = engine
        .resolve_title_for(&family.id, &a.id, &u.id, &NoOverrides)
        .await
        .unwrap();
    assert_eq!(uncle.title, "伯父");

    let graph = engine
        .resolve_graph_titles(&family.id, &a.id, &NoOverrides)
        .await
        .unwrap();
    assert_eq!(graph.title_of(&a.id), Some("本人"));
    assert_eq!(graph.title_of(&b.id), Some("父亲"));
    assert_eq!(graph.title_of(&c.id), Some("祖父"));
    assert_eq!(graph.title_of(&u.id), Some("伯父"));
}

#[tokio::test]
async fn test_title_map_overrides_catalog() {
    let engine = memory_engine();
    let family = engine.create_family("Huang").await.unwrap();
    let a = first_member(&engine, &family.id, "A", Gender::Female).await;
    let b = relative(&engine, &family.id, "B", Gender::Male, &a.id, RelationType::Father).await;
    let c = relative(&engine, &family.id, "C", Gender::Male, &b.id, RelationType::Father).await;

    let map = engine
        .create_title_map(
            TitleMap::new(family.id.clone(), "Cantonese").with_override("FATHER>FATHER|male", "阿爷"),
        )
        .await
        .unwrap();
    let overrides = engine.title_map_in_family(&family.id, &map.id).await.unwrap();

    let title = engine
        .resolve_title_for(&family.id, &a.id, &c.id, &overrides)
        .await
        .unwrap();
    assert_eq!(title.title, "阿爷");
    assert_eq!(title.source, TitleSource::Override);

    let father = engine
        .resolve_title_for(&family.id, &a.id, &b.id, &overrides)
        .await
        .unwrap();
    assert_eq!(father.title, "父亲");

    let other = engine.create_family("Other").await.unwrap();
    let err = engine.title_map_in_family(&other.id, &map.id).await.unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn test_invalid_title_map_is_rejected() {
    let engine = memory_engine();
    let family = engine.create_family("Xu").await.unwrap();

    let err = engine
        .create_title_map(TitleMap::new(family.id.clone(), "bad").with_override("UNCLE|male", "x"))
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert!(engine.list_title_maps(&family.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_explicit_relationship_removes_both_directions() {
    let engine = memory_engine();
    let family = engine.create_family("Lin").await.unwrap();
    let a = first_member(&engine, &family.id, "a", Gender::Male).await;
    let b = first_member(&engine, &family.id, "b", Gender::Female).await;
    let pair = engine
        .create_explicit_relationship(&family.id, &a.id, &b.id, RelationType::Husband)
        .await
        .unwrap();

    let deleted = engine
        .delete_explicit_relationship(&family.id, &pair.forward.id)
        .await
        .unwrap();
    assert_eq!(deleted.deleted_forward, pair.forward.id);
    assert_eq!(deleted.deleted_reverse, Some(pair.reverse.id));
    assert!(engine.store().all_edges(&family.id).await.unwrap().is_empty());

    let err = engine
        .delete_explicit_relationship(&family.id, &pair.forward.id)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::RelationNotFound(_)));
}

#[tokio::test]
async fn test_delete_relationship_from_other_family_is_rejected() {
    let engine = memory_engine();
    let family = engine.create_family("Ma").await.unwrap();
    let other = engine.create_family("Niu").await.unwrap();
    let a = first_member(&engine, &family.id, "a", Gender::Male).await;
    let b = first_member(&engine, &family.id, "b", Gender::Male).await;
    let pair = engine
        .create_explicit_relationship(&family.id, &a.id, &b.id, RelationType::OlderBrother)
        .await
        .unwrap();

    let err = engine
        .delete_explicit_relationship(&other.id, &pair.forward.id)
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(engine.store().all_edges(&family.id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_delete_person_cascades() {
    let engine = memory_engine();
    let family = engine.create_family("He").await.unwrap();
    let a = first_member(&engine, &family.id, "A", Gender::Male).await;
    let f = relative(&engine, &family.id, "F", Gender::Male, &a.id, RelationType::Father).await;
    relative(&engine, &family.id, "M", Gender::Female, &a.id, RelationType::Mother).await;

    // A-F, A-M and F-M pairs, two edges each
    assert_eq!(engine.store().all_edges(&family.id).await.unwrap().len(), 6);
    assert_eq!(engine.delete_person(&family.id, &f.id).await.unwrap(), 4);
    assert_eq!(engine.store().all_edges(&family.id).await.unwrap().len(), 2);

    let err = engine.delete_person(&family.id, &f.id).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_invalid_endpoints_are_rejected() {
    let engine = memory_engine();
    let family = engine.create_family("Guo").await.unwrap();
    let other = engine.create_family("Luo").await.unwrap();
    let a = first_member(&engine, &family.id, "a", Gender::Male).await;
    let stranger = first_member(&engine, &other.id, "s", Gender::Female).await;

    let err = engine
        .create_explicit_relationship(&family.id, &a.id, &a.id, RelationType::Father)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::SelfRelation(_)));

    let err = engine
        .create_explicit_relationship(&family.id, &a.id, &stranger.id, RelationType::Husband)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::CrossFamily { .. }));

    let err = engine
        .create_person(
            &family.id,
            NewPerson::new("x", Gender::Male).related_to(stranger.id.clone(), RelationType::Son),
        )
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(engine.list_persons(&family.id).await.unwrap().len(), 1);

    let err = engine
        .create_person(&family.id, NewPerson::new("   ", Gender::Male))
        .await
        .unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn test_delete_family_removes_members() {
    let engine = memory_engine();
    let family = engine.create_family("Gao").await.unwrap();
    let a = first_member(&engine, &family.id, "A", Gender::Male).await;
    relative(&engine, &family.id, "B", Gender::Female, &a.id, RelationType::Wife).await;

    engine.delete_family(&family.id).await.unwrap();
    assert!(engine.get_person(&a.id).await.unwrap_err().is_not_found());
    assert!(engine.get_family(&family.id).await.unwrap_err().is_not_found());
}

/// Delegates to [`MemoryStorage`] but fails any insert of `fail_type` once armed.
struct FlakyStore {
    inner: MemoryStorage,
    fail_type: Mutex<Option<RelationType>>,
}

impl FlakyStore {
    fn new() -> Self {
        Self {
            inner: MemoryStorage::new(),
            fail_type: Mutex::new(None),
        }
    }

    fn arm(&self, relation_type: RelationType) {
        *self.fail_type.lock().unwrap() = Some(relation_type);
    }

    fn check(&self, edge: &RelationEdge) -> Result<()> {
        if *self.fail_type.lock().unwrap() == Some(edge.relation_type) {
            return Err(Error::Storage(format!("refusing {}", edge.relation_type)));
        }
        Ok(())
    }
}

#[async_trait]
impl PersonDirectory for FlakyStore {
    async fn get_person(&self, id: &PersonId) -> Result<Option<Person>> {
        self.inner.get_person(id).await
    }

    async fn list_persons(&self, family: &FamilyId) -> Result<Vec<Person>> {
        self.inner.list_persons(family).await
    }

    async fn save_person(&self, person: &Person) -> Result<()> {
        self.inner.save_person(person).await
    }

    async fn delete_person(&self, id: &PersonId) -> Result<Option<usize>> {
        self.inner.delete_person(id).await
    }
}

#[async_trait]
impl EdgeStore for FlakyStore {
    async fn insert_edge(&self, edge: &RelationEdge) -> Result<bool> {
        self.check(edge)?;
        self.inner.insert_edge(edge).await
    }

    async fn insert_edges_atomic(&self, edges: &[RelationEdge]) -> Result<Vec<bool>> {
        for edge in edges {
            self.check(edge)?;
        }
        self.inner.insert_edges_atomic(edges).await
    }

    async fn edges_from(
        &self,
        person: &PersonId,
        types: Option<&[RelationType]>,
    ) -> Result<Vec<RelationEdge>> {
        self.inner.edges_from(person, types).await
    }

    async fn edges_to(
        &self,
        person: &PersonId,
        types: Option<&[RelationType]>,
    ) -> Result<Vec<RelationEdge>> {
        self.inner.edges_to(person, types).await
    }

    async fn edge_between(&self, from: &PersonId, to: &PersonId) -> Result<Option<RelationEdge>> {
        self.inner.edge_between(from, to).await
    }

    async fn get_edge(&self, id: &EdgeId) -> Result<Option<RelationEdge>> {
        self.inner.get_edge(id).await
    }

    async fn delete_edge(&self, id: &EdgeId) -> Result<bool> {
        self.inner.delete_edge(id).await
    }

    async fn all_edges(&self, family: &FamilyId) -> Result<Vec<RelationEdge>> {
        self.inner.all_edges(family).await
    }
}

#[async_trait]
impl FamilyStore for FlakyStore {
    async fn save_family(&self, family: &Family) -> Result<()> {
        self.inner.save_family(family).await
    }

    async fn get_family(&self, id: &FamilyId) -> Result<Option<Family>> {
        self.inner.get_family(id).await
    }

    async fn list_families(&self) -> Result<Vec<Family>> {
        self.inner.list_families().await
    }

    async fn delete_family(&self, id: &FamilyId) -> Result<bool> {
        self.inner.delete_family(id).await
    }
}

#[async_trait]
impl TitleMapStore for FlakyStore {
    async fn save_title_map(&self, map: &TitleMap) -> Result<()> {
        self.inner.save_title_map(map).await
    }

    async fn get_title_map(&self, id: &TitleMapId) -> Result<Option<TitleMap>> {
        self.inner.get_title_map(id).await
    }

    async fn list_title_maps(&self, family: &FamilyId) -> Result<Vec<TitleMap>> {
        self.inner.list_title_maps(family).await
    }

    async fn delete_title_map(&self, id: &TitleMapId) -> Result<bool> {
        self.inner.delete_title_map(id).await
    }
}

/// `F` is the father of `R`; returns the engine, family, `R` and `F`.
async fn flaky_family(mode: InferenceMode) -> (KinshipEngine<FlakyStore>, FamilyId, Person, Person) {
    let engine = KinshipEngine::new(Arc::new(FlakyStore::new())).with_config(EngineConfig {
        inference_mode: mode,
        ..Default::default()
    });
    let family = engine.create_family("Flaky").await.unwrap();
    let r = first_member(&engine, &family.id, "R", Gender::Male).await;
    let f = relative(&engine, &family.id, "F", Gender::Male, &r.id, RelationType::Father).await;
    (engine, family.id, r, f)
}

#[tokio::test]
async fn test_best_effort_skips_failed_inferred_edge() {
    let (engine, family, r, f) = flaky_family(InferenceMode::BestEffort).await;
    // Rule 1 would write F -FATHER-> P and P -SON-> F.
    engine.store().arm(RelationType::Son);

    let created = engine
        .create_person(
            &family,
            NewPerson::new("P", Gender::Male).related_to(r.id.clone(), RelationType::YoungerBrother),
        )
        .await
        .unwrap();
    let p = created.person;
    let link = created.link.unwrap();

    assert_eq!(link.explicit.len(), 2);
    assert_eq!(link.inference.created.len(), 1);
    assert_eq!(link.inference.failed, 1);
    assert_eq!(edge_type(&engine, &f.id, &p.id).await, Some(RelationType::Father));
    assert_eq!(edge_type(&engine, &p.id, &f.id).await, None);
}

#[tokio::test]
async fn test_atomic_mode_writes_nothing_on_failure() {
    let (engine, family, r, _f) = flaky_family(InferenceMode::Atomic).await;
    engine.store().arm(RelationType::Son);

    let err = engine
        .create_person(
            &family,
            NewPerson::new("P", Gender::Male).related_to(r.id.clone(), RelationType::YoungerBrother),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Storage(_)));
    assert_eq!(engine.list_persons(&family).await.unwrap().len(), 2);
    assert_eq!(engine.store().all_edges(&family).await.unwrap().len(), 2);
}

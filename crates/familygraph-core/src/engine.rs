//! Kinship engine
//!
//! Ties the catalogs, the inference rules and the title resolver to a store.
//! Every mutation validates its inputs before writing anything.

use crate::catalog::RelationCatalog;
use crate::error::{Error, Result};
use crate::family::{Family, FamilyId};
use crate::graph::FamilyGraph;
use crate::inference::{InferenceContext, InferenceEngine, InferenceReport};
use crate::invariants::EdgeInvariants;
use crate::limits;
use crate::overrides::{TitleMap, TitleMapId, TitleMapUpdate, TitleOverrides};
use crate::person::{Gender, NewPerson, Person, PersonId};
use crate::relation::{DeletedEdges, EdgeId, EdgePair, RelationEdge, RelationType};
use crate::resolver::{GraphTitles, TitleResolution, TitleResolver};
use crate::store::KinshipStore;
use crate::title_catalog::TitleCatalog;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// How inferred edges are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InferenceMode {
    /// Explicit pair and inferred edges in one all-or-nothing write
    #[default]
    Atomic,
    /// Explicit pair first, then each inferred edge on its own; failures are logged and skipped
    BestEffort,
}

impl InferenceMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Atomic => "atomic",
            Self::BestEffort => "best_effort",
        }
    }
}

impl std::fmt::Display for InferenceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for InferenceMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "atomic" => Ok(Self::Atomic),
            "best_effort" | "best-effort" => Ok(Self::BestEffort),
            _ => Err(Error::Validation(format!("unknown inference mode: {}", s))),
        }
    }
}

/// Engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub inference_mode: InferenceMode,

    /// Hop bound for title resolution (1..=5)
    #[serde(default = "default_title_max_depth")]
    pub title_max_depth: usize,
}

fn default_title_max_depth() -> usize {
    limits::BFS_MAX_DEPTH
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            inference_mode: InferenceMode::default(),
            title_max_depth: default_title_max_depth(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        limits::validate_traversal_depth(self.title_max_depth)?;
        Ok(())
    }
}

/// Edges written when a person is attached to the tree
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkReport {
    /// The explicit pair edges that were actually inserted
    pub explicit: Vec<RelationEdge>,

    pub inference: InferenceReport,
}

impl LinkReport {
    pub fn edges_created(&self) -> usize {
        self.explicit.len() + self.inference.created.len()
    }
}

/// Result of creating a person
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonCreated {
    pub person: Person,

    /// None for the first member of a family
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<LinkReport>,
}

/// Engine façade over a [`KinshipStore`]
pub struct KinshipEngine<S> {
    store: Arc<S>,
    catalog: Arc<RelationCatalog>,
    titles: Arc<TitleCatalog>,
    config: EngineConfig,
}

impl<S> Clone for KinshipEngine<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            catalog: Arc::clone(&self.catalog),
            titles: Arc::clone(&self.titles),
            config: self.config.clone(),
        }
    }
}

impl<S: KinshipStore> KinshipEngine<S> {
    /// Create an engine with the standard catalogs and default settings
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            catalog: Arc::new(RelationCatalog::standard()),
            titles: Arc::new(TitleCatalog::standard()),
            config: EngineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_title_catalog(mut self, titles: Arc<TitleCatalog>) -> Self {
        self.titles = titles;
        self
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn catalog(&self) -> &RelationCatalog {
        &self.catalog
    }

    pub fn title_catalog(&self) -> &TitleCatalog {
        &self.titles
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn resolver(&self) -> TitleResolver<'_> {
        TitleResolver::new(&self.catalog, &self.titles).with_max_depth(self.config.title_max_depth)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Families
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn create_family(&self, name: &str) -> Result<Family> {
        limits::validate_family_name(name)?;
        let family = Family::new(name.trim());
        self.store.save_family(&family).await?;
        tracing::info!("Created family {} ({})", family.name, family.id);
        Ok(family)
    }

    pub async fn get_family(&self, id: &FamilyId) -> Result<Family> {
        self.store
            .get_family(id)
            .await?
            .ok_or_else(|| Error::FamilyNotFound(id.to_string()))
    }

    pub async fn list_families(&self) -> Result<Vec<Family>> {
        self.store.list_families().await
    }

    pub async fn delete_family(&self, id: &FamilyId) -> Result<()> {
        if !self.store.delete_family(id).await? {
            return Err(Error::FamilyNotFound(id.to_string()));
        }
        tracing::info!("Deleted family {}", id);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Persons
    // ─────────────────────────────────────────────────────────────────────────

    /// Create a person, attaching them through `new.reference` when given.
    ///
    /// The generation is the reference's generation shifted by the relation's
    /// delta (0 for a first member). Attaching writes the explicit pair and
    /// runs inference.
    pub async fn create_person(&self, family: &FamilyId, new: NewPerson) -> Result<PersonCreated> {
        limits::validate_person_name(&new.name)?;
        self.get_family(family).await?;

        let mut person = Person::new(family.clone(), new.name.trim(), new.gender);
        if let Some(year) = new.birth_year {
            person = person.with_birth_year(year);
        }

        let Some(reference) = new.reference else {
            self.store.save_person(&person).await?;
            tracing::info!("Created person {} ({}) in family {}", person.name, person.id, family);
            return Ok(PersonCreated { person, link: None });
        };

        let reference_person = self.person_in_family(family, &reference.person_id).await?;
        person = person.with_generation(
            reference_person.generation + self.catalog.generation_delta(reference.relation_type),
        );
        self.store.save_person(&person).await?;
        tracing::info!(
            "Created person {} ({}) as {} of {}",
            person.name,
            person.id,
            reference.relation_type,
            reference.person_id
        );

        match self
            .on_person_created(
                family,
                &person.id,
                person.gender,
                &reference.person_id,
                reference.relation_type,
            )
            .await
        {
            Ok(link) => Ok(PersonCreated {
                person,
                link: Some(link),
            }),
            Err(err) => {
                // A person who could not be attached is removed again.
                if let Err(cleanup) = self.store.delete_person(&person.id).await {
                    tracing::warn!("Failed to remove person {} after error: {}", person.id, cleanup);
                }
                Err(err)
            }
        }
    }

    /// Attach `new_person` as `relation_type` of `reference`: write the
    /// explicit pair, then the edges derived by the inference rules.
    pub async fn on_person_created(
        &self,
        family: &FamilyId,
        new_person: &PersonId,
        new_gender: Gender,
        reference: &PersonId,
        relation_type: RelationType,
    ) -> Result<LinkReport> {
        let new = self.person_in_family(family, new_person).await?;
        let reference_person = self.person_in_family(family, reference).await?;

        let now = Utc::now();
        let pair = EdgeInvariants::new(&self.catalog).pair(
            family,
            &new,
            &reference_person,
            relation_type,
            now,
        )?;

        let mut snapshot = self.snapshot(family).await?;
        snapshot.add_person(new_person.clone(), new_gender);
        for edge in [&pair.forward, &pair.reverse] {
            snapshot.add_edge(&edge.from_id, &edge.to_id, edge.relation_type);
        }

        let ctx = InferenceContext::new(
            family.clone(),
            new_person.clone(),
            new_gender,
            reference.clone(),
            relation_type,
        )
        .at(now);
        let plan = InferenceEngine::new(&self.catalog).plan(&snapshot, &ctx);

        let report = match self.config.inference_mode {
            InferenceMode::Atomic => self.persist_atomic(pair, plan).await?,
            InferenceMode::BestEffort => self.persist_best_effort(pair, plan).await?,
        };

        tracing::info!(
            "Linked {} to {}: {} explicit, {} inferred, {} skipped, {} failed",
            new_person,
            reference,
            report.explicit.len(),
            report.inference.created.len(),
            report.inference.skipped,
            report.inference.failed
        );
        Ok(report)
    }

    async fn persist_atomic(&self, pair: EdgePair, plan: InferenceReport) -> Result<LinkReport> {
        let mut batch = Vec::with_capacity(plan.created.len() + 2);
        batch.push(pair.forward);
        batch.push(pair.reverse);
        batch.extend(plan.created.iter().map(|e| e.edge.clone()));

        let inserted = self.store.insert_edges_atomic(&batch).await?;

        let mut report = LinkReport::default();
        report.inference.skipped = plan.skipped;
        let mut flags = inserted.into_iter();
        for edge in batch.drain(..2) {
            if flags.next().unwrap_or(false) {
                report.explicit.push(edge);
            }
        }
        for (inferred, written) in plan.created.into_iter().zip(flags) {
            if written {
                report.inference.created.push(inferred);
            } else {
                report.inference.skipped += 1;
            }
        }
        Ok(report)
    }

    async fn persist_best_effort(&self, pair: EdgePair, plan: InferenceReport) -> Result<LinkReport> {
        let mut report = LinkReport::default();
        report.inference.skipped = plan.skipped;

        for edge in [pair.forward, pair.reverse] {
            if self.store.insert_edge(&edge).await? {
                report.explicit.push(edge);
            }
        }

        for inferred in plan.created {
            match self.store.insert_edge(&inferred.edge).await {
                Ok(true) => report.inference.created.push(inferred),
                Ok(false) => report.inference.skipped += 1,
                Err(err) => {
                    tracing::warn!(
                        "{}: failed to insert {} -{}-> {}: {}",
                        inferred.rule,
                        inferred.edge.from_id,
                        inferred.edge.relation_type,
                        inferred.edge.to_id,
                        err
                    );
                    report.inference.failed += 1;
                }
            }
        }
        Ok(report)
    }

    pub async fn get_person(&self, id: &PersonId) -> Result<Person> {
        self.store
            .get_person(id)
            .await?
            .ok_or_else(|| Error::PersonNotFound(id.to_string()))
    }

    pub async fn list_persons(&self, family: &FamilyId) -> Result<Vec<Person>> {
        self.get_family(family).await?;
        self.store.list_persons(family).await
    }

    /// Delete a person and cascade their edges. Returns the number of edges removed.
    pub async fn delete_person(&self, family: &FamilyId, id: &PersonId) -> Result<usize> {
        self.person_in_family(family, id).await?;
        let removed = self
            .store
            .delete_person(id)
            .await?
            .ok_or_else(|| Error::PersonNotFound(id.to_string()))?;
        tracing::info!("Deleted person {} and {} edges", id, removed);
        Ok(removed)
    }

    async fn person_in_family(&self, family: &FamilyId, id: &PersonId) -> Result<Person> {
        let person = self.get_person(id).await?;
        if &person.family_id != family {
            return Err(Error::CrossFamily {
                person: id.to_string(),
                family: family.to_string(),
            });
        }
        Ok(person)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Explicit relationships
    // ─────────────────────────────────────────────────────────────────────────

    /// Store `from -relation_type-> to` and its reverse.
    ///
    /// If an ordered pair is already populated the existing edge is kept and
    /// returned in place of the new one.
    pub async fn create_explicit_relationship(
        &self,
        family: &FamilyId,
        from: &PersonId,
        to: &PersonId,
        relation_type: RelationType,
    ) -> Result<EdgePair> {
        if from == to {
            return Err(Error::SelfRelation(from.to_string()));
        }
        let from_person = self.get_person(from).await?;
        let to_person = self.get_person(to).await?;

        let pair = EdgeInvariants::new(&self.catalog).pair(
            family,
            &from_person,
            &to_person,
            relation_type,
            Utc::now(),
        )?;

        let inserted = match self.config.inference_mode {
            InferenceMode::Atomic => {
                self.store
                    .insert_edges_atomic(&[pair.forward.clone(), pair.reverse.clone()])
                    .await?
            }
            InferenceMode::BestEffort => vec![
                self.store.insert_edge(&pair.forward).await?,
                self.store.insert_edge(&pair.reverse).await?,
            ],
        };

        let forward = self.stored_edge(pair.forward, inserted.first().copied()).await?;
        let reverse = self.stored_edge(pair.reverse, inserted.get(1).copied()).await?;

        tracing::info!(
            "Created relationship {} -{}-> {} (reverse {})",
            from,
            forward.relation_type,
            to,
            reverse.relation_type
        );
        Ok(EdgePair { forward, reverse })
    }

    /// The edge now stored for `edge`'s pair: `edge` itself if it was written
    async fn stored_edge(&self, edge: RelationEdge, written: Option<bool>) -> Result<RelationEdge> {
        if written == Some(true) {
            return Ok(edge);
        }
        tracing::debug!(
            "Pair {} -> {} already populated, keeping existing edge",
            edge.from_id,
            edge.to_id
        );
        self.store
            .edge_between(&edge.from_id, &edge.to_id)
            .await?
            .ok_or_else(|| Error::Internal(format!("edge {} was neither written nor found", edge.id)))
    }

    /// Delete an edge and the edge stored for the opposite direction, if any
    pub async fn delete_explicit_relationship(
        &self,
        family: &FamilyId,
        edge_id: &EdgeId,
    ) -> Result<DeletedEdges> {
        let edge = self
            .store
            .get_edge(edge_id)
            .await?
            .ok_or_else(|| Error::RelationNotFound(edge_id.to_string()))?;
        if &edge.family_id != family {
            return Err(Error::Validation(format!(
                "relation {} does not belong to family {}",
                edge_id, family
            )));
        }

        let reverse = self
            .store
            .edge_between(&edge.to_id, &edge.from_id)
            .await?
            .filter(|r| &r.family_id == family);

        self.store.delete_edge(&edge.id).await?;
        let deleted_reverse = match reverse {
            Some(reverse) if self.store.delete_edge(&reverse.id).await? => Some(reverse.id),
            _ => None,
        };

        tracing::info!(
            "Deleted relationship {} (reverse: {:?})",
            edge.id,
            deleted_reverse.as_ref().map(|id| id.to_string())
        );
        Ok(DeletedEdges {
            deleted_forward: edge.id,
            deleted_reverse,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Titles
    // ─────────────────────────────────────────────────────────────────────────

    /// Snapshot of one family partition
    pub async fn snapshot(&self, family: &FamilyId) -> Result<FamilyGraph> {
        let (persons, edges) = futures::try_join!(
            self.store.list_persons(family),
            self.store.all_edges(family)
        )?;
        Ok(FamilyGraph::from_records(family.clone(), &persons, &edges))
    }

    /// Title of `target` as seen by `viewer`, keyed with `target_gender`
    pub async fn resolve_title(
        &self,
        family: &FamilyId,
        viewer: &PersonId,
        target: &PersonId,
        target_gender: Gender,
        overrides: &(dyn TitleOverrides + Sync),
    ) -> Result<TitleResolution> {
        let resolver = self.resolver();
        if viewer == target {
            return Ok(resolver.resolve_title(
                &FamilyGraph::new(family.clone()),
                viewer,
                target,
                target_gender,
                overrides,
            ));
        }
        let snapshot = self.snapshot(family).await?;
        Ok(resolver.resolve_title(&snapshot, viewer, target, target_gender, overrides))
    }

    /// Like [`resolve_title`](Self::resolve_title), with the target's gender
    /// read from the directory
    pub async fn resolve_title_for(
        &self,
        family: &FamilyId,
        viewer: &PersonId,
        target: &PersonId,
        overrides: &(dyn TitleOverrides + Sync),
    ) -> Result<TitleResolution> {
        let target_person = self.person_in_family(family, target).await?;
        self.resolve_title(family, viewer, target, target_person.gender, overrides)
            .await
    }

    /// Titles for every person of `family` as seen by `viewer`
    pub async fn resolve_graph_titles(
        &self,
        family: &FamilyId,
        viewer: &PersonId,
        overrides: &(dyn TitleOverrides + Sync),
    ) -> Result<GraphTitles> {
        self.person_in_family(family, viewer).await?;
        let snapshot = self.snapshot(family).await?;
        Ok(self.resolver().resolve_graph_titles(&snapshot, viewer, overrides))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Title maps
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn create_title_map(&self, map: TitleMap) -> Result<TitleMap> {
        map.validate()?;
        self.get_family(&map.family_id).await?;
        self.store.save_title_map(&map).await?;
        tracing::info!(
            "Created title map {} ({}) with {} overrides",
            map.name,
            map.id,
            map.overrides.len()
        );
        Ok(map)
    }

    pub async fn update_title_map(&self, id: &TitleMapId, update: TitleMapUpdate) -> Result<TitleMap> {
        let mut map = self.get_title_map(id).await?;
        update.apply(&mut map);
        map.validate()?;
        self.store.save_title_map(&map).await?;
        tracing::info!("Updated title map {}", id);
        Ok(map)
    }

    pub async fn get_title_map(&self, id: &TitleMapId) -> Result<TitleMap> {
        self.store
            .get_title_map(id)
            .await?
            .ok_or_else(|| Error::TitleMapNotFound(id.to_string()))
    }

    /// Load a title map for use as overrides, checking it belongs to `family`
    pub async fn title_map_in_family(&self, family: &FamilyId, id: &TitleMapId) -> Result<TitleMap> {
        let map = self.get_title_map(id).await?;
        if &map.family_id != family {
            return Err(Error::Validation(format!(
                "title map {} does not belong to family {}",
                id, family
            )));
        }
        Ok(map)
    }

    pub async fn list_title_maps(&self, family: &FamilyId) -> Result<Vec<TitleMap>> {
        self.store.list_title_maps(family).await
    }

    pub async fn delete_title_map(&self, id: &TitleMapId) -> Result<()> {
        if !self.store.delete_title_map(id).await? {
            return Err(Error::TitleMapNotFound(id.to_string()));
        }
        tracing::info!("Deleted title map {}", id);
        Ok(())
    }
}

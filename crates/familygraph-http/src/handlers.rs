//! Request handlers
//!
//! Ids arrive as strings and are parsed here so malformed ids are reported
//! through the envelope like any other validation error.

use crate::error::{ApiError, ApiResult};
use crate::response::ok;
use crate::server::AppState;
use axum::extract::{Path, Query, State};
use axum::Json;
use familygraph_core::{
    DeletedEdges, EdgeId, EdgePair, Family, FamilyId, Gender, KinshipStore, NewPerson, Person,
    PersonCreated, PersonId, RelationEdge, RelationType, TitleMap, TitleMapId, TitleMapUpdate,
    TitleSource,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

type AppStateRef<S> = State<Arc<AppState<S>>>;

fn required<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str, ApiError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::BadRequest(format!("missing required parameter: {}", field)))
}

/// Load the title map named by `id`, if any, for use as overrides
async fn load_overrides<S: KinshipStore>(
    state: &AppState<S>,
    family: &FamilyId,
    id: Option<&str>,
) -> Result<Option<TitleMap>, ApiError> {
    match id.filter(|id| !id.is_empty()) {
        Some(id) => Ok(Some(
            state.engine.title_map_in_family(family, &id.parse()?).await?,
        )),
        None => Ok(None),
    }
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "server": "familygraph-http",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

// ─────────────────────────────────────────────────────────────────────────────
// Families
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateFamilyRequest {
    pub name: String,
}

pub async fn create_family<S: KinshipStore>(
    State(state): AppStateRef<S>,
    Json(req): Json<CreateFamilyRequest>,
) -> ApiResult<Family> {
    Ok(ok(state.engine.create_family(&req.name).await?))
}

pub async fn list_families<S: KinshipStore>(State(state): AppStateRef<S>) -> ApiResult<Vec<Family>> {
    Ok(ok(state.engine.list_families().await?))
}

pub async fn get_family<S: KinshipStore>(
    State(state): AppStateRef<S>,
    Path(id): Path<String>,
) -> ApiResult<Family> {
    Ok(ok(state.engine.get_family(&id.parse()?).await?))
}

pub async fn delete_family<S: KinshipStore>(
    State(state): AppStateRef<S>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    state.engine.delete_family(&id.parse()?).await?;
    Ok(ok(()))
}

// ─────────────────────────────────────────────────────────────────────────────
// Persons
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreatePersonRequest {
    pub family_id: Option<String>,
    pub name: String,
    pub gender: String,
    #[serde(default)]
    pub birth_year: Option<i32>,
    /// Existing person the new one is attached to
    #[serde(default)]
    pub reference_person_id: Option<String>,
    /// The new person is `relation_type` of the reference person
    #[serde(default)]
    pub relation_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FamilyQuery {
    pub family_id: Option<String>,
}

pub async fn create_person<S: KinshipStore>(
    State(state): AppStateRef<S>,
    Json(req): Json<CreatePersonRequest>,
) -> ApiResult<PersonCreated> {
    let family: FamilyId = required(&req.family_id, "family_id")?.parse()?;
    let gender: Gender = req.gender.parse()?;

    let mut new = NewPerson::new(req.name, gender);
    if let Some(year) = req.birth_year {
        new = new.with_birth_year(year);
    }
    match (req.reference_person_id.as_deref(), req.relation_type.as_deref()) {
        (Some(person), Some(relation_type)) => {
            let relation_type: RelationType = relation_type.parse()?;
            new = new.related_to(person.parse()?, relation_type);
        }
        (None, None) => {}
        _ => {
            return Err(ApiError::BadRequest(
                "reference_person_id and relation_type must be given together".to_string(),
            ))
        }
    }

    Ok(ok(state.engine.create_person(&family, new).await?))
}

pub async fn list_persons<S: KinshipStore>(
    State(state): AppStateRef<S>,
    Query(query): Query<FamilyQuery>,
) -> ApiResult<Vec<Person>> {
    let family: FamilyId = required(&query.family_id, "family_id")?.parse()?;
    Ok(ok(state.engine.list_persons(&family).await?))
}

pub async fn get_person<S: KinshipStore>(
    State(state): AppStateRef<S>,
    Path(id): Path<String>,
) -> ApiResult<Person> {
    Ok(ok(state.engine.get_person(&id.parse()?).await?))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PersonDeleted {
    pub deleted_edges: usize,
}

pub async fn delete_person<S: KinshipStore>(
    State(state): AppStateRef<S>,
    Path(id): Path<String>,
    Query(query): Query<FamilyQuery>,
) -> ApiResult<PersonDeleted> {
    let family: FamilyId = required(&query.family_id, "family_id")?.parse()?;
    let person: PersonId = id.parse()?;
    let deleted_edges = state.engine.delete_person(&family, &person).await?;
    Ok(ok(PersonDeleted { deleted_edges }))
}

// ─────────────────────────────────────────────────────────────────────────────
// Relationships
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateRelationshipRequest {
    pub family_id: Option<String>,
    pub from_id: Option<String>,
    pub to_id: Option<String>,
    pub relation_type: Option<String>,
}

pub async fn create_relationship<S: KinshipStore>(
    State(state): AppStateRef<S>,
    Json(req): Json<CreateRelationshipRequest>,
) -> ApiResult<EdgePair> {
    let family: FamilyId = required(&req.family_id, "family_id")?.parse()?;
    let from: PersonId = required(&req.from_id, "from_id")?.parse()?;
    let to: PersonId = required(&req.to_id, "to_id")?.parse()?;
    let relation_type: RelationType = required(&req.relation_type, "relation_type")?.parse()?;

    Ok(ok(state
        .engine
        .create_explicit_relationship(&family, &from, &to, relation_type)
        .await?))
}

pub async fn delete_relationship<S: KinshipStore>(
    State(state): AppStateRef<S>,
    Path(id): Path<String>,
    Query(query): Query<FamilyQuery>,
) -> ApiResult<DeletedEdges> {
    let family: FamilyId = required(&query.family_id, "family_id")?.parse()?;
    let edge: EdgeId = id.parse()?;
    Ok(ok(state.engine.delete_explicit_relationship(&family, &edge).await?))
}

#[derive(Debug, Deserialize)]
pub struct TitleQuery {
    pub family_id: Option<String>,
    pub from_person_id: Option<String>,
    pub to_person_id: Option<String>,
    pub title_map_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TitleResponse {
    pub title: String,
    pub path_key: Option<String>,
    pub source: TitleSource,
}

pub async fn compute_title<S: KinshipStore>(
    State(state): AppStateRef<S>,
    Query(query): Query<TitleQuery>,
) -> ApiResult<TitleResponse> {
    let family: FamilyId = required(&query.family_id, "family_id")?.parse()?;
    let viewer: PersonId = required(&query.from_person_id, "from_person_id")?.parse()?;
    let target: PersonId = required(&query.to_person_id, "to_person_id")?.parse()?;
    let overrides = load_overrides(&state, &family, query.title_map_id.as_deref()).await?;

    let resolution = state
        .engine
        .resolve_title_for(&family, &viewer, &target, &overrides)
        .await?;
    Ok(ok(TitleResponse {
        title: resolution.title,
        path_key: resolution.path_key,
        source: resolution.source,
    }))
}

#[derive(Debug, Deserialize)]
pub struct GraphQuery {
    pub family_id: Option<String>,
    /// Titles are computed relative to this person when given
    pub viewer_id: Option<String>,
    pub title_map_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GraphResponse {
    pub nodes: Vec<Person>,
    pub edges: Vec<RelationEdge>,
    pub titles: BTreeMap<String, String>,
}

pub async fn get_graph<S: KinshipStore>(
    State(state): AppStateRef<S>,
    Query(query): Query<GraphQuery>,
) -> ApiResult<GraphResponse> {
    let family: FamilyId = required(&query.family_id, "family_id")?.parse()?;
    let nodes = state.engine.list_persons(&family).await?;
    let edges = state.engine.store().all_edges(&family).await?;

    let mut titles = BTreeMap::new();
    if let Some(viewer) = query.viewer_id.as_deref().filter(|v| !v.is_empty()) {
        let viewer: PersonId = viewer.parse()?;
        let overrides = load_overrides(&state, &family, query.title_map_id.as_deref()).await?;
        let graph = state
            .engine
            .resolve_graph_titles(&family, &viewer, &overrides)
            .await?;
        titles = graph
            .titles
            .into_iter()
            .map(|(person, resolution)| (person.to_string(), resolution.title))
            .collect();
    }

    Ok(ok(GraphResponse {
        nodes,
        edges,
        titles,
    }))
}

// ─────────────────────────────────────────────────────────────────────────────
// Title maps
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateTitleMapRequest {
    pub family_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub creator: Option<String>,
    #[serde(default)]
    pub overrides: BTreeMap<String, String>,
    #[serde(default)]
    pub is_shared: bool,
}

pub async fn create_title_map<S: KinshipStore>(
    State(state): AppStateRef<S>,
    Json(req): Json<CreateTitleMapRequest>,
) -> ApiResult<TitleMap> {
    let family: FamilyId = required(&req.family_id, "family_id")?.parse()?;

    let mut map = TitleMap::new(family, req.name).shared(req.is_shared);
    map.overrides = req.overrides;
    if let Some(description) = req.description {
        map = map.with_description(description);
    }
    if let Some(creator) = req.creator {
        map = map.with_creator(creator);
    }

    Ok(ok(state.engine.create_title_map(map).await?))
}

pub async fn update_title_map<S: KinshipStore>(
    State(state): AppStateRef<S>,
    Path(id): Path<String>,
    Json(update): Json<TitleMapUpdate>,
) -> ApiResult<TitleMap> {
    let id: TitleMapId = id.parse()?;
    Ok(ok(state.engine.update_title_map(&id, update).await?))
}

pub async fn get_title_map<S: KinshipStore>(
    State(state): AppStateRef<S>,
    Path(id): Path<String>,
) -> ApiResult<TitleMap> {
    Ok(ok(state.engine.get_title_map(&id.parse()?).await?))
}

pub async fn list_title_maps<S: KinshipStore>(
    State(state): AppStateRef<S>,
    Query(query): Query<FamilyQuery>,
) -> ApiResult<Vec<TitleMap>> {
    let family: FamilyId = required(&query.family_id, "family_id")?.parse()?;
    Ok(ok(state.engine.list_title_maps(&family).await?))
}

pub async fn delete_title_map<S: KinshipStore>(
    State(state): AppStateRef<S>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    state.engine.delete_title_map(&id.parse()?).await?;
    Ok(ok(()))
}

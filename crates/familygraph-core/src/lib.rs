//! FamilyGraph Core - Kinship relationship graph engine
//!
//! This crate provides the domain types, the relation and title catalogs,
//! edge inference, title resolution and the store traits that backends
//! implement.

pub mod catalog;
pub mod engine;
pub mod error;
pub mod family;
pub mod graph;
pub mod inference;
pub mod invariants;
pub mod limits;
pub mod overrides;
pub mod path_key;
pub mod person;
pub mod relation;
pub mod resolver;
pub mod store;
pub mod title_catalog;

pub use catalog::RelationCatalog;
pub use engine::{EngineConfig, InferenceMode, KinshipEngine, LinkReport, PersonCreated};
pub use error::{Error, Result};
pub use family::{Family, FamilyId};
pub use graph::{FamilyGraph, GraphEdge, NodeIndex};
pub use inference::{InferenceContext, InferenceEngine, InferenceReport, InferenceRule, InferredEdge};
pub use invariants::EdgeInvariants;
pub use overrides::{NoOverrides, TitleMap, TitleMapId, TitleMapUpdate, TitleOverrides};
pub use path_key::PathKey;
pub use person::{Gender, NewPerson, Person, PersonId, ReferenceRelation};
pub use relation::{DeletedEdges, EdgeId, EdgePair, RelationEdge, RelationKind, RelationType};
pub use resolver::{GraphTitles, TitleResolution, TitleResolver, TitleSource, TraversalStats};
pub use store::{EdgeStore, FamilyStore, KinshipStore, PersonDirectory, TitleMapStore};
pub use title_catalog::{TitleCatalog, DEFAULT_TITLE, SELF_TITLE};

//! Kinship title resolution
//!
//! A bounded breadth-first search from a viewer over outgoing edges. Each
//! traversed edge `u -t-> v` reads "u is t of v"; appending
//! `reverse_of(t, gender(v))` turns it into "v is ... of u", so the path
//! accumulates the target's relation as seen from the viewer. The first path
//! that reaches a node wins, and its key is looked up in the overrides, then
//! the static catalog, then falls back to the default title.

use crate::catalog::RelationCatalog;
use crate::graph::{FamilyGraph, NodeIndex};
use crate::limits::BFS_MAX_DEPTH;
use crate::overrides::TitleOverrides;
use crate::path_key::PathKey;
use crate::person::{Gender, PersonId};
use crate::relation::RelationType;
use crate::title_catalog::{TitleCatalog, DEFAULT_TITLE, SELF_TITLE};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use std::ops::ControlFlow;

/// Where a resolved title came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleSource {
    /// Viewer and target are the same person
    SelfTitle,
    Override,
    Catalog,
    /// Unreachable within the bound, or no entry for the path key
    Default,
}

impl TitleSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TitleSource::SelfTitle => "self_title",
            TitleSource::Override => "override",
            TitleSource::Catalog => "catalog",
            TitleSource::Default => "default",
        }
    }
}

impl std::fmt::Display for TitleSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved title with the path key that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleResolution {
    pub title: String,

    /// None for the self title and for unreachable targets
    pub path_key: Option<String>,

    pub source: TitleSource,

    /// Number of hops on the discovered path
    pub hops: usize,
}

impl TitleResolution {
    fn self_title() -> Self {
        Self {
            title: SELF_TITLE.to_string(),
            path_key: None,
            source: TitleSource::SelfTitle,
            hops: 0,
        }
    }

    fn unreachable() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            path_key: None,
            source: TitleSource::Default,
            hops: 0,
        }
    }
}

/// Traversal statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraversalStats {
    pub nodes_visited: usize,
    pub edges_traversed: usize,
    pub max_depth_reached: usize,
    pub target_found: bool,
}

/// Titles for every person of a family, relative to one viewer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphTitles {
    pub viewer: PersonId,
    pub titles: BTreeMap<PersonId, TitleResolution>,
    pub stats: TraversalStats,
}

impl GraphTitles {
    pub fn title_of(&self, person: &PersonId) -> Option<&str> {
        self.titles.get(person).map(|r| r.title.as_str())
    }
}

/// Bounded BFS title resolver
#[derive(Debug, Clone, Copy)]
pub struct TitleResolver<'a> {
    catalog: &'a RelationCatalog,
    titles: &'a TitleCatalog,
    max_depth: usize,
}

impl<'a> TitleResolver<'a> {
    pub fn new(catalog: &'a RelationCatalog, titles: &'a TitleCatalog) -> Self {
        Self {
            catalog,
            titles,
            max_depth: BFS_MAX_DEPTH,
        }
    }

    /// Lower the hop bound; values outside `1..=5` are clamped
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.clamp(1, BFS_MAX_DEPTH);
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Title of `target` as seen by `viewer`
    pub fn resolve_title(
        &self,
        graph: &FamilyGraph,
        viewer: &PersonId,
        target: &PersonId,
        target_gender: Gender,
        overrides: &dyn TitleOverrides,
    ) -> TitleResolution {
        if viewer == target {
            return TitleResolution::self_title();
        }

        let (Some(start), Some(goal)) = (graph.node(viewer), graph.node(target)) else {
            tracing::debug!("Viewer {} or target {} not in snapshot", viewer, target);
            return TitleResolution::unreachable();
        };

        let mut found = None;
        let stats = self.search(graph, start, |node, path| {
            if node == goal {
                found = Some(self.title_for_path(path, target_gender, overrides));
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });

        tracing::debug!(
            "Resolved {} -> {}: visited {} nodes, {} edges, found={}",
            viewer,
            target,
            stats.nodes_visited,
            stats.edges_traversed,
            stats.target_found
        );

        found.unwrap_or_else(TitleResolution::unreachable)
    }

    /// Titles of every person in `graph` as seen by `viewer`, in one traversal
    pub fn resolve_graph_titles(
        &self,
        graph: &FamilyGraph,
        viewer: &PersonId,
        overrides: &dyn TitleOverrides,
    ) -> GraphTitles {
        let mut titles = BTreeMap::new();
        let mut stats = TraversalStats::default();

        if let Some(start) = graph.node(viewer) {
            stats = self.search(graph, start, |node, path| {
                // Dangling endpoints are never traversed, so every discovered node has a gender.
                if let Some(gender) = graph.gender(node) {
                    titles.insert(
                        graph.person_id(node).clone(),
                        self.title_for_path(path, gender, overrides),
                    );
                }
                ControlFlow::Continue(())
            });
        }

        for node in graph.nodes() {
            // Edge-only endpoints are not family members.
            if graph.gender(node).is_none() {
                continue;
            }
            let person = graph.person_id(node);
            if person == viewer {
                titles.insert(person.clone(), TitleResolution::self_title());
            } else {
                titles
                    .entry(person.clone())
                    .or_insert_with(TitleResolution::unreachable);
            }
        }

        tracing::debug!(
            "Graph titles for {}: {} persons, {} reached",
            viewer,
            titles.len(),
            stats.nodes_visited.saturating_sub(1)
        );

        GraphTitles {
            viewer: viewer.clone(),
            titles,
            stats,
        }
    }

    /// Look up a path key: overrides, then the static catalog, then the default
    pub fn title_for_key(
        &self,
        path_key: &str,
        overrides: &dyn TitleOverrides,
    ) -> (String, TitleSource) {
        if let Some(title) = overrides.lookup(path_key) {
            return (title.to_string(), TitleSource::Override);
        }
        if let Some(title) = self.titles.lookup(path_key) {
            return (title.to_string(), TitleSource::Catalog);
        }
        (DEFAULT_TITLE.to_string(), TitleSource::Default)
    }

    fn title_for_path(
        &self,
        path: &[RelationType],
        gender: Gender,
        overrides: &dyn TitleOverrides,
    ) -> TitleResolution {
        let path_key = PathKey::format(path, gender);
        let (title, source) = self.title_for_key(&path_key, overrides);
        TitleResolution {
            title,
            path_key: Some(path_key),
            source,
            hops: path.len(),
        }
    }

    /// Frontier-ordered BFS from `start`.
    ///
    /// `discover` is called once per node, at first discovery, with the
    /// viewer-relative path to it. Nodes are marked visited on enqueue and
    /// nodes at the depth bound are not expanded.
    fn search<F>(&self, graph: &FamilyGraph, start: NodeIndex, mut discover: F) -> TraversalStats
    where
        F: FnMut(NodeIndex, &[RelationType]) -> ControlFlow<()>,
    {
        let mut stats = TraversalStats::default();
        let mut visited = vec![false; graph.node_count()];
        let mut queue: VecDeque<(NodeIndex, Vec<RelationType>)> = VecDeque::new();

        visited[start.index()] = true;
        queue.push_back((start, Vec::new()));

        while let Some((current, path)) = queue.pop_front() {
            stats.nodes_visited += 1;
            stats.max_depth_reached = stats.max_depth_reached.max(path.len());

            if path.len() >= self.max_depth {
                continue;
            }

            for edge in graph.outgoing(current) {
                stats.edges_traversed += 1;

                if visited[edge.to.index()] {
                    continue;
                }
                let Some(to_gender) = graph.gender(edge.to) else {
                    continue;
                };

                let mut next_path = Vec::with_capacity(path.len() + 1);
                next_path.extend_from_slice(&path);
                next_path.push(self.catalog.reverse_of(edge.relation_type, to_gender));

                visited[edge.to.index()] = true;
                if discover(edge.to, &next_path).is_break() {
                    stats.target_found = true;
                    return stats;
                }
                queue.push_back((edge.to, next_path));
            }
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::family::FamilyId;
    use crate::overrides::NoOverrides;
    use crate::relation::RelationType::*;
    use std::collections::HashMap;

    struct Fixture {
        catalog: RelationCatalog,
        titles: TitleCatalog,
        graph: FamilyGraph,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                catalog: RelationCatalog::standard(),
                titles: TitleCatalog::standard(),
                graph: FamilyGraph::new(FamilyId::new()),
            }
        }

        fn person(&mut self, gender: Gender) -> PersonId {
            let id = PersonId::new();
            self.graph.add_person(id.clone(), gender);
            id
        }

        fn relate(&mut self, from: &PersonId, to: &PersonId, t: RelationType) {
            let to_gender = self.graph.gender_of(to).unwrap();
            self.graph.add_edge(from, to, t);
            self.graph.add_edge(to, from, self.catalog.reverse_of(t, to_gender));
        }

        fn resolver(&self) -> TitleResolver<'_> {
            TitleResolver::new(&self.catalog, &self.titles)
        }

        fn title(&self, viewer: &PersonId, target: &PersonId) -> TitleResolution {
            let gender = self.graph.gender_of(target).unwrap();
            self.resolver()
                .resolve_title(&self.graph, viewer, target, gender, &NoOverrides)
        }
    }

    #[test]
    fn test_self_title() {
        let mut fx = Fixture::new();
        let a = fx.person(Gender::Female);
        let resolution = fx.title(&a, &a);
        assert_eq!(resolution.title, SELF_TITLE);
        assert_eq!(resolution.source, TitleSource::SelfTitle);

        // Even for someone absent from the snapshot.
        let stranger = PersonId::new();
        let resolution = fx
            .resolver()
            .resolve_title(&fx.graph, &stranger, &stranger, Gender::Male, &NoOverrides);
        assert_eq!(resolution.title, SELF_TITLE);
    }

    #[test]
    fn test_grandfather_chain() {
        let mut fx = Fixture::new();
        let a = fx.person(Gender::Male);
        let b = fx.person(Gender::Male);
        let c = fx.person(Gender::Male);
        // B is A's father, C is B's father.
        fx.relate(&b, &a, Father);
        fx.relate(&c, &b, Father);

        let resolution = fx.title(&a, &c);
        assert_eq!(resolution.path_key.as_deref(), Some("FATHER>FATHER|male"));
        assert_eq!(resolution.title, "祖父");
        assert_eq!(resolution.source, TitleSource::Catalog);
        assert_eq!(resolution.hops, 2);
    }

    #[test]
    fn test_wife_sees_father_in_law() {
        let mut fx = Fixture::new();
        let husband = fx.person(Gender::Male);
        let wife = fx.person(Gender::Female);
        let father = fx.person(Gender::Male);
        fx.relate(&husband, &wife, Husband);
        fx.relate(&father, &husband, Father);

        let resolution = fx.title(&wife, &father);
        assert_eq!(resolution.path_key.as_deref(), Some("HUSBAND>FATHER|male"));
    }

    #[test]
    fn test_override_precedence() {
        let mut fx = Fixture::new();
        let a = fx.person(Gender::Male);
        let b = fx.person(Gender::Male);
        let c = fx.person(Gender::Male);
        fx.relate(&b, &a, Father);
        fx.relate(&c, &b, Father);

        let mut overrides = HashMap::new();
        overrides.insert("FATHER>FATHER|male".to_string(), "阿公".to_string());

        let resolution = fx
            .resolver()
            .resolve_title(&fx.graph, &a, &c, Gender::Male, &overrides);
        assert_eq!(resolution.title, "阿公");
        assert_eq!(resolution.source, TitleSource::Override);
    }

    #[test]
    fn test_unknown_path_key_defaults() {
        let mut fx = Fixture::new();
        let a = fx.person(Gender::Male);
        let b = fx.person(Gender::Male);
        fx.relate(&b, &a, Father);

        // Gender on the key disagrees with the catalog entry.
        let resolution = fx
            .resolver()
            .resolve_title(&fx.graph, &a, &b, Gender::Female, &NoOverrides);
        assert_eq!(resolution.path_key.as_deref(), Some("FATHER|female"));
        assert_eq!(resolution.title, DEFAULT_TITLE);
        assert_eq!(resolution.source, TitleSource::Default);
    }

    /// viewer <- a1 <- ... chain of `len` SON edges ending at the returned target
    fn son_chain(fx: &mut Fixture, viewer: &PersonId, len: usize) -> Vec<PersonId> {
        let mut chain = vec![viewer.clone()];
        for _ in 0..len {
            let next = fx.person(Gender::Male);
            let prev = chain.last().unwrap().clone();
            // prev is the son of next
            fx.relate(&prev, &next, Son);
            chain.push(next);
        }
        chain
    }

    #[test]
    fn test_depth_bound() {
        let mut fx = Fixture::new();
        let viewer = fx.person(Gender::Male);
        let chain = son_chain(&mut fx, &viewer, 6);
        let target = chain[6].clone();

        let mut overrides = HashMap::new();
        overrides.insert(
            "FATHER>FATHER>FATHER>FATHER>FATHER>FATHER|male".to_string(),
            "六世祖".to_string(),
        );
        let resolution = fx
            .resolver()
            .resolve_title(&fx.graph, &viewer, &target, Gender::Male, &overrides);
        assert_eq!(resolution.title, DEFAULT_TITLE);
        assert_eq!(resolution.path_key, None);

        // Five-hop shortcut: the target is also an older brother of chain[4].
        fx.relate(&target, &chain[4], OlderBrother);
        let resolution = fx
            .resolver()
            .resolve_title(&fx.graph, &viewer, &target, Gender::Male, &overrides);
        assert_eq!(
            resolution.path_key.as_deref(),
            Some("FATHER>FATHER>FATHER>FATHER>OLDER_BROTHER|male")
        );
        assert_eq!(resolution.hops, 5);
        assert_ne!(resolution.title, DEFAULT_TITLE);
    }

    #[test]
    fn test_lower_max_depth() {
        let mut fx = Fixture::new();
        let viewer = fx.person(Gender::Male);
        let chain = son_chain(&mut fx, &viewer, 3);

        let resolver = fx.resolver().with_max_depth(2);
        let far = resolver.resolve_title(&fx.graph, &viewer, &chain[3], Gender::Male, &NoOverrides);
        let near = resolver.resolve_title(&fx.graph, &viewer, &chain[2], Gender::Male, &NoOverrides);
        assert_eq!(far.title, DEFAULT_TITLE);
        assert_eq!(near.title, "祖父");
        assert_eq!(fx.resolver().with_max_depth(99).max_depth(), BFS_MAX_DEPTH);
    }

    #[test]
    fn test_dangling_edges_are_not_traversed() {
        let mut fx = Fixture::new();
        let viewer = fx.person(Gender::Male);
        let ghost = PersonId::new();
        let beyond = fx.person(Gender::Female);
        fx.graph.add_edge(&ghost, &viewer, Father);
        fx.graph.add_edge(&viewer, &ghost, Son);
        fx.graph.add_edge(&ghost, &beyond, Husband);
        fx.graph.add_edge(&beyond, &ghost, Wife);

        assert_eq!(fx.title(&viewer, &beyond).title, DEFAULT_TITLE);
    }

    #[test]
    fn test_graph_titles_single_pass() {
        let mut fx = Fixture::new();
        let me = fx.person(Gender::Female);
        let dad = fx.person(Gender::Male);
        let mom = fx.person(Gender::Female);
        let loner = fx.person(Gender::Male);
        fx.relate(&dad, &me, Father);
        fx.relate(&mom, &me, Mother);
        fx.relate(&dad, &mom, Husband);

        let graph_titles = fx.resolver().resolve_graph_titles(&fx.graph, &me, &NoOverrides);

        assert_eq!(graph_titles.titles.len(), 4);
        assert_eq!(graph_titles.title_of(&me), Some(SELF_TITLE));
        assert_eq!(graph_titles.title_of(&dad), Some("父亲"));
        assert_eq!(graph_titles.title_of(&mom), Some("母亲"));
        assert_eq!(graph_titles.title_of(&loner), Some(DEFAULT_TITLE));

        // Same answers as per-target resolution.
        for person in [&dad, &mom, &loner] {
            assert_eq!(
                graph_titles.title_of(person),
                Some(fx.title(&me, person).title.as_str())
            );
        }
    }
}

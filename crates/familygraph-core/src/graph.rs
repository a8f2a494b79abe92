//! In-memory family graph snapshot
//!
//! Persons and edges are stored in arenas and addressed by [`NodeIndex`];
//! adjacency lists hold edge indices. A snapshot is built once per request
//! from the store and never observes later writes.

use crate::family::FamilyId;
use crate::person::{Gender, Person, PersonId};
use crate::relation::{RelationEdge, RelationType};
use std::collections::{HashMap, HashSet};

/// Position of a person in a [`FamilyGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(usize);

impl NodeIndex {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Edge between two nodes of a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphEdge {
    pub from: NodeIndex,
    pub to: NodeIndex,
    pub relation_type: RelationType,
}

/// Read-optimised view of one family partition
#[derive(Debug, Clone)]
pub struct FamilyGraph {
    family_id: FamilyId,
    index: HashMap<PersonId, NodeIndex>,
    persons: Vec<PersonId>,
    /// `None` for endpoints that are referenced by edges but unknown to the directory
    genders: Vec<Option<Gender>>,
    edges: Vec<GraphEdge>,
    outgoing: Vec<Vec<usize>>,
    incoming: Vec<Vec<usize>>,
    pairs: HashSet<(NodeIndex, NodeIndex)>,
}

impl FamilyGraph {
    pub fn new(family_id: FamilyId) -> Self {
        Self {
            family_id,
            index: HashMap::new(),
            persons: Vec::new(),
            genders: Vec::new(),
            edges: Vec::new(),
            outgoing: Vec::new(),
            incoming: Vec::new(),
            pairs: HashSet::new(),
        }
    }

    /// Build a snapshot from directory and edge store contents.
    ///
    /// Records belonging to another family are ignored.
    pub fn from_records(family_id: FamilyId, persons: &[Person], edges: &[RelationEdge]) -> Self {
        let mut graph = Self::new(family_id.clone());
        for person in persons.iter().filter(|p| p.family_id == family_id) {
            graph.add_person(person.id.clone(), person.gender);
        }
        for edge in edges.iter().filter(|e| e.family_id == family_id) {
            graph.add_edge(&edge.from_id, &edge.to_id, edge.relation_type);
        }

        tracing::debug!(
            "Built snapshot for family {}: {} persons, {} edges",
            graph.family_id,
            graph.node_count(),
            graph.edge_count()
        );
        graph
    }

    pub fn family_id(&self) -> &FamilyId {
        &self.family_id
    }

    /// Add a person, or record the gender of one already referenced by an edge
    pub fn add_person(&mut self, id: PersonId, gender: Gender) -> NodeIndex {
        let node = self.ensure_node(id);
        self.genders[node.0] = Some(gender);
        node
    }

    fn ensure_node(&mut self, id: PersonId) -> NodeIndex {
        if let Some(node) = self.index.get(&id) {
            return *node;
        }
        let node = NodeIndex(self.persons.len());
        self.index.insert(id.clone(), node);
        self.persons.push(id);
        self.genders.push(None);
        self.outgoing.push(Vec::new());
        self.incoming.push(Vec::new());
        node
    }

    /// Add `from -relation_type-> to`.
    ///
    /// Returns false without touching the graph when the ordered pair is
    /// already populated (any type) or when `from == to`.
    pub fn add_edge(&mut self, from: &PersonId, to: &PersonId, relation_type: RelationType) -> bool {
        if from == to {
            return false;
        }
        let from = self.ensure_node(from.clone());
        let to = self.ensure_node(to.clone());
        if !self.pairs.insert((from, to)) {
            return false;
        }

        let edge_index = self.edges.len();
        self.edges.push(GraphEdge {
            from,
            to,
            relation_type,
        });
        self.outgoing[from.0].push(edge_index);
        self.incoming[to.0].push(edge_index);
        true
    }

    pub fn node(&self, id: &PersonId) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    pub fn person_id(&self, node: NodeIndex) -> &PersonId {
        &self.persons[node.0]
    }

    pub fn gender(&self, node: NodeIndex) -> Option<Gender> {
        self.genders[node.0]
    }

    pub fn gender_of(&self, id: &PersonId) -> Option<Gender> {
        self.node(id).and_then(|node| self.gender(node))
    }

    pub fn contains(&self, id: &PersonId) -> bool {
        self.index.contains_key(id)
    }

    /// True if any edge `from -> to` exists, whatever its type
    pub fn exists_pair(&self, from: &PersonId, to: &PersonId) -> bool {
        match (self.node(from), self.node(to)) {
            (Some(from), Some(to)) => self.pairs.contains(&(from, to)),
            _ => false,
        }
    }

    /// Edges leaving a node, in insertion order
    pub fn outgoing(&self, node: NodeIndex) -> impl Iterator<Item = &GraphEdge> + '_ {
        self.outgoing[node.0].iter().map(move |i| &self.edges[*i])
    }

    /// Edges arriving at a node, in insertion order
    pub fn incoming(&self, node: NodeIndex) -> impl Iterator<Item = &GraphEdge> + '_ {
        self.incoming[node.0].iter().map(move |i| &self.edges[*i])
    }

    /// Edges `person -t-> *` with `t` in `types`
    pub fn edges_from(&self, person: &PersonId, types: &[RelationType]) -> Vec<GraphEdge> {
        match self.node(person) {
            Some(node) => self
                .outgoing(node)
                .filter(|e| types.contains(&e.relation_type))
                .copied()
                .collect(),
            None => Vec::new(),
        }
    }

    /// Edges `* -t-> person` with `t` in `types`
    pub fn edges_to(&self, person: &PersonId, types: &[RelationType]) -> Vec<GraphEdge> {
        match self.node(person) {
            Some(node) => self
                .incoming(node)
                .filter(|e| types.contains(&e.relation_type))
                .copied()
                .collect(),
            None => Vec::new(),
        }
    }

    /// All nodes, in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = NodeIndex> {
        (0..self.persons.len()).map(NodeIndex)
    }

    pub fn node_count(&self) -> usize {
        self.persons.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

//! Edge inference
//!
//! When a new person `P` is attached to an existing reference person `R`
//! through one stated relation `T`, the seven rules below derive the edges a
//! human would expect without typing them in: a new sibling gets R's parents,
//! a new spouse gets R's children, and so on.
//!
//! Each rule is a pure function of a [`FamilyGraph`] snapshot. The
//! [`InferenceEngine`] runs them in order 1 to 7 against a working copy, so
//! edges derived by an earlier rule are visible to a later one. Every rule
//! checks the ordered pair before proposing anything, and the working copy
//! drops proposals for pairs that became populated in the meantime.

use crate::catalog::RelationCatalog;
use crate::family::FamilyId;
use crate::graph::FamilyGraph;
use crate::person::{Gender, PersonId};
use crate::relation::{RelationEdge, RelationKind, RelationType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The newly stated relation that triggers inference: `new_person -relation_type-> reference`
#[derive(Debug, Clone)]
pub struct InferenceContext {
    pub family_id: FamilyId,
    pub new_person: PersonId,
    pub new_gender: Gender,
    pub reference: PersonId,
    pub relation_type: RelationType,
    /// Timestamp stamped on every derived edge
    pub created_at: DateTime<Utc>,
}

impl InferenceContext {
    pub fn new(
        family_id: FamilyId,
        new_person: PersonId,
        new_gender: Gender,
        reference: PersonId,
        relation_type: RelationType,
    ) -> Self {
        Self {
            family_id,
            new_person,
            new_gender,
            reference,
            relation_type,
            created_at: Utc::now(),
        }
    }

    pub fn at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    fn edge(&self, from: &PersonId, to: &PersonId, relation_type: RelationType) -> RelationEdge {
        RelationEdge::new(self.family_id.clone(), from.clone(), to.clone(), relation_type)
            .at(self.created_at)
    }

    fn is_new_person(&self, id: &PersonId) -> bool {
        id == &self.new_person
    }
}

/// The propagation rules, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InferenceRule {
    /// 1: a new sibling shares R's parents
    SiblingParents,
    /// 2: a new child also belongs to R's spouses
    ChildSpouseParent,
    /// 3: a new parent is also the parent of R's siblings
    ParentSiblingChildren,
    /// 4: a new parent is married to R's other parents
    ParentSpouse,
    /// 5: a new sibling is a sibling of R's other siblings
    SiblingSiblings,
    /// 6: a new child is the youngest sibling of R's other children
    ChildSiblings,
    /// 7: a new spouse is a parent of R's children
    SpouseChildren,
}

impl InferenceRule {
    pub const ALL: [InferenceRule; 7] = [
        InferenceRule::SiblingParents,
        InferenceRule::ChildSpouseParent,
        InferenceRule::ParentSiblingChildren,
        InferenceRule::ParentSpouse,
        InferenceRule::SiblingSiblings,
        InferenceRule::ChildSiblings,
        InferenceRule::SpouseChildren,
    ];

    /// 1-based rule number
    pub fn number(self) -> u8 {
        self as u8 + 1
    }

    /// Class of stated relation that fires this rule
    pub fn trigger(self) -> RelationKind {
        match self {
            Self::SiblingParents | Self::SiblingSiblings => RelationKind::Sibling,
            Self::ChildSpouseParent | Self::ChildSiblings => RelationKind::Child,
            Self::ParentSiblingChildren | Self::ParentSpouse => RelationKind::Parent,
            Self::SpouseChildren => RelationKind::Spouse,
        }
    }

    pub fn applies_to(self, catalog: &RelationCatalog, relation_type: RelationType) -> bool {
        catalog.is(relation_type, self.trigger())
    }

    /// Edges this rule proposes against `graph`
    pub fn derive(
        self,
        graph: &FamilyGraph,
        ctx: &InferenceContext,
        catalog: &RelationCatalog,
    ) -> Vec<RelationEdge> {
        match self {
            Self::SiblingParents => sibling_parents(graph, ctx, catalog),
            Self::ChildSpouseParent => child_spouse_parent(graph, ctx, catalog),
            Self::ParentSiblingChildren => parent_sibling_children(graph, ctx, catalog),
            Self::ParentSpouse => parent_spouse(graph, ctx, catalog),
            Self::SiblingSiblings => sibling_siblings(graph, ctx, catalog),
            Self::ChildSiblings => child_siblings(graph, ctx, catalog),
            Self::SpouseChildren => spouse_children(graph, ctx, catalog),
        }
    }
}

impl std::fmt::Display for InferenceRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rule {}", self.number())
    }
}

/// Rule 1: `X -{FATHER,MOTHER}-> R` gives `X -same-> P` and `P -child(gP)-> X`
pub fn sibling_parents(
    graph: &FamilyGraph,
    ctx: &InferenceContext,
    catalog: &RelationCatalog,
) -> Vec<RelationEdge> {
    let child_type = catalog.child_type(ctx.new_gender);
    let mut edges = Vec::new();

    for edge in graph.edges_to(&ctx.reference, catalog.types_of(RelationKind::Parent)) {
        let parent = graph.person_id(edge.from);
        if ctx.is_new_person(parent) || graph.exists_pair(parent, &ctx.new_person) {
            continue;
        }
        edges.push(ctx.edge(parent, &ctx.new_person, edge.relation_type));
        edges.push(ctx.edge(&ctx.new_person, parent, child_type));
    }
    edges
}

/// Rule 2: `R -{HUSBAND,WIFE}-> S` gives `S -parent(gS)-> P` and `P -T-> S`
pub fn child_spouse_parent(
    graph: &FamilyGraph,
    ctx: &InferenceContext,
    catalog: &RelationCatalog,
) -> Vec<RelationEdge> {
    let mut edges = Vec::new();

    for edge in graph.edges_from(&ctx.reference, catalog.types_of(RelationKind::Spouse)) {
        let spouse = graph.person_id(edge.to);
        if ctx.is_new_person(spouse) || graph.exists_pair(spouse, &ctx.new_person) {
            continue;
        }
        let Some(spouse_gender) = graph.gender(edge.to) else {
            tracing::debug!("Rule 2: skipping spouse {} with unknown gender", spouse);
            continue;
        };
        edges.push(ctx.edge(spouse, &ctx.new_person, catalog.parent_type(spouse_gender)));
        edges.push(ctx.edge(&ctx.new_person, spouse, ctx.relation_type));
    }
    edges
}

/// Rule 3: `R -{sibling}-> Sib` gives `P -T-> Sib` and `Sib -child(gSib)-> P`
pub fn parent_sibling_children(
    graph: &FamilyGraph,
    ctx: &InferenceContext,
    catalog: &RelationCatalog,
) -> Vec<RelationEdge> {
    let mut edges = Vec::new();

    for edge in graph.edges_from(&ctx.reference, catalog.types_of(RelationKind::Sibling)) {
        let sibling = graph.person_id(edge.to);
        if ctx.is_new_person(sibling) || graph.exists_pair(&ctx.new_person, sibling) {
            continue;
        }
        let Some(sibling_gender) = graph.gender(edge.to) else {
            tracing::debug!("Rule 3: skipping sibling {} with unknown gender", sibling);
            continue;
        };
        edges.push(ctx.edge(&ctx.new_person, sibling, ctx.relation_type));
        edges.push(ctx.edge(sibling, &ctx.new_person, catalog.child_type(sibling_gender)));
    }
    edges
}

/// Rule 4: `OP -{FATHER,MOTHER}-> R`, `OP != P` gives `P -spouse(gP)-> OP` and its reverse
pub fn parent_spouse(
    graph: &FamilyGraph,
    ctx: &InferenceContext,
    catalog: &RelationCatalog,
) -> Vec<RelationEdge> {
    let spouse_type = catalog.spouse_type(ctx.new_gender);
    // Spouse reverses do not depend on gender.
    let reverse_type = catalog.reverse_of(spouse_type, ctx.new_gender);
    let mut edges = Vec::new();

    for edge in graph.edges_to(&ctx.reference, catalog.types_of(RelationKind::Parent)) {
        let other_parent = graph.person_id(edge.from);
        if ctx.is_new_person(other_parent) || graph.exists_pair(&ctx.new_person, other_parent) {
            continue;
        }
        edges.push(ctx.edge(&ctx.new_person, other_parent, spouse_type));
        edges.push(ctx.edge(other_parent, &ctx.new_person, reverse_type));
    }
    edges
}

/// Rule 5: `R -sib-> Other`, `Other != P` gives `P -sib-> Other` and `Other -reverse(sib, gP)-> P`
pub fn sibling_siblings(
    graph: &FamilyGraph,
    ctx: &InferenceContext,
    catalog: &RelationCatalog,
) -> Vec<RelationEdge> {
    let mut edges = Vec::new();

    for edge in graph.edges_from(&ctx.reference, catalog.types_of(RelationKind::Sibling)) {
        let other = graph.person_id(edge.to);
        if ctx.is_new_person(other) || graph.exists_pair(&ctx.new_person, other) {
            continue;
        }
        let reverse_type = catalog.reverse_of(edge.relation_type, ctx.new_gender);
        edges.push(ctx.edge(&ctx.new_person, other, edge.relation_type));
        edges.push(ctx.edge(other, &ctx.new_person, reverse_type));
    }
    edges
}

/// Rule 6: `Other -{SON,DAUGHTER}-> R`, `Other != P` gives
/// `P -older(gOther)-> Other` and `Other -younger(gP)-> P`
pub fn child_siblings(
    graph: &FamilyGraph,
    ctx: &InferenceContext,
    catalog: &RelationCatalog,
) -> Vec<RelationEdge> {
    let younger_type = catalog.younger_sibling_type(ctx.new_gender);
    let mut edges = Vec::new();

    for edge in graph.edges_to(&ctx.reference, catalog.types_of(RelationKind::Child)) {
        let other = graph.person_id(edge.from);
        if ctx.is_new_person(other) || graph.exists_pair(&ctx.new_person, other) {
            continue;
        }
        let Some(other_gender) = graph.gender(edge.from) else {
            tracing::debug!("Rule 6: skipping child {} with unknown gender", other);
            continue;
        };
        edges.push(ctx.edge(&ctx.new_person, other, catalog.older_sibling_type(other_gender)));
        edges.push(ctx.edge(other, &ctx.new_person, younger_type));
    }
    edges
}

/// Rule 7: `Child -{SON,DAUGHTER}-> R` gives `P -parent(gP)-> Child` and `Child -child(gChild)-> P`
pub fn spouse_children(
    graph: &FamilyGraph,
    ctx: &InferenceContext,
    catalog: &RelationCatalog,
) -> Vec<RelationEdge> {
    let parent_type = catalog.parent_type(ctx.new_gender);
    let mut edges = Vec::new();

    for edge in graph.edges_to(&ctx.reference, catalog.types_of(RelationKind::Child)) {
        let child = graph.person_id(edge.from);
        if ctx.is_new_person(child) || graph.exists_pair(&ctx.new_person, child) {
            continue;
        }
        let Some(child_gender) = graph.gender(edge.from) else {
            tracing::debug!("Rule 7: skipping child {} with unknown gender", child);
            continue;
        };
        edges.push(ctx.edge(&ctx.new_person, child, parent_type));
        edges.push(ctx.edge(child, &ctx.new_person, catalog.child_type(child_gender)));
    }
    edges
}

/// An edge proposed by one rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferredEdge {
    pub rule: InferenceRule,
    pub edge: RelationEdge,
}

/// Outcome of one inference run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InferenceReport {
    /// Edges written (or, before persistence, planned)
    pub created: Vec<InferredEdge>,

    /// Proposals dropped because the ordered pair was already populated
    pub skipped: usize,

    /// Proposals whose insert failed (best-effort mode only)
    pub failed: usize,
}

impl InferenceReport {
    pub fn created_by(&self, rule: InferenceRule) -> usize {
        self.created.iter().filter(|e| e.rule == rule).count()
    }

    pub fn edges(&self) -> impl Iterator<Item = &RelationEdge> {
        self.created.iter().map(|e| &e.edge)
    }

    pub fn is_empty(&self) -> bool {
        self.created.is_empty()
    }
}

/// Runs the rules against a snapshot
#[derive(Debug, Clone, Copy)]
pub struct InferenceEngine<'a> {
    catalog: &'a RelationCatalog,
}

impl<'a> InferenceEngine<'a> {
    pub fn new(catalog: &'a RelationCatalog) -> Self {
        Self { catalog }
    }

    /// Plan the inferred edges for `ctx`.
    ///
    /// `snapshot` must already contain the explicit pair between the new
    /// person and the reference person. It is not modified; rules run against
    /// a private working copy.
    pub fn plan(&self, snapshot: &FamilyGraph, ctx: &InferenceContext) -> InferenceReport {
        let mut working = snapshot.clone();
        let mut report = InferenceReport::default();

        for rule in InferenceRule::ALL {
            if !rule.applies_to(self.catalog, ctx.relation_type) {
                continue;
            }

            let proposed = rule.derive(&working, ctx, self.catalog);
            tracing::debug!(
                "{} proposed {} edges for {} -{}-> {}",
                rule,
                proposed.len(),
                ctx.new_person,
                ctx.relation_type,
                ctx.reference
            );

            for edge in proposed {
                if working.add_edge(&edge.from_id, &edge.to_id, edge.relation_type) {
                    report.created.push(InferredEdge { rule, edge });
                } else {
                    report.skipped += 1;
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relation::RelationType::*;

    struct Fixture {
        catalog: RelationCatalog,
        graph: FamilyGraph,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                catalog: RelationCatalog::standard(),
                graph: FamilyGraph::new(FamilyId::new()),
            }
        }

        fn person(&mut self, gender: Gender) -> PersonId {
            let id = PersonId::new();
            self.graph.add_person(id.clone(), gender);
            id
        }

        /// Store `from -t-> to` plus its reverse
        fn relate(&mut self, from: &PersonId, to: &PersonId, t: RelationType) {
            let to_gender = self.graph.gender_of(to).unwrap();
            self.graph.add_edge(from, to, t);
            self.graph.add_edge(to, from, self.catalog.reverse_of(t, to_gender));
        }

        /// Attach a new person and return the planned inference
        fn attach(
            &mut self,
            reference: &PersonId,
            t: RelationType,
            gender: Gender,
        ) -> (PersonId, InferenceReport) {
            let new_person = self.person(gender);
            self.relate(&new_person, reference, t);
            let ctx = InferenceContext::new(
                self.graph.family_id().clone(),
                new_person.clone(),
                gender,
                reference.clone(),
                t,
            );
            let report = InferenceEngine::new(&self.catalog).plan(&self.graph, &ctx);
            (new_person, report)
        }

        fn has(report: &InferenceReport, from: &PersonId, to: &PersonId, t: RelationType) -> bool {
            report
                .edges()
                .any(|e| e.connects(from, to) && e.relation_type == t)
        }
    }

    #[test]
    fn test_rule_1_sibling_inherits_father() {
        let mut fx = Fixture::new();
        let r = fx.person(Gender::Male);
        let f = fx.person(Gender::Male);
        fx.relate(&f, &r, Father);

        let (p, report) = fx.attach(&r, OlderBrother, Gender::Male);

        assert!(Fixture::has(&report, &f, &p, Father));
        assert!(Fixture::has(&report, &p, &f, Son));
        assert_eq!(report.created_by(InferenceRule::SiblingParents), 2);
    }

    #[test]
    fn test_rule_2_child_gets_spouse_as_parent() {
        let mut fx = Fixture::new();
        let r = fx.person(Gender::Male);
        let s = fx.person(Gender::Female);
        fx.relate(&r, &s, Husband);

        let (p, report) = fx.attach(&r, Daughter, Gender::Female);

        assert!(Fixture::has(&report, &s, &p, Mother));
        assert!(Fixture::has(&report, &p, &s, Daughter));
    }

    #[test]
    fn test_rule_3_and_4_new_parent() {
        let mut fx = Fixture::new();
        let r = fx.person(Gender::Female);
        let sib = fx.person(Gender::Male);
        let mother = fx.person(Gender::Female);
        fx.relate(&r, &sib, YoungerSister);
        fx.relate(&mother, &r, Mother);

        let (p, report) = fx.attach(&r, Father, Gender::Male);

        // rule 3
        assert!(Fixture::has(&report, &p, &sib, Father));
        assert!(Fixture::has(&report, &sib, &p, Son));
        // rule 4
        assert!(Fixture::has(&report, &p, &mother, Husband));
        assert!(Fixture::has(&report, &mother, &p, Wife));
        assert_eq!(report.created_by(InferenceRule::ParentSpouse), 2);
    }

    #[test]
    fn test_rule_5_sibling_of_siblings() {
        let mut fx = Fixture::new();
        let r = fx.person(Gender::Male);
        let other = fx.person(Gender::Female);
        fx.relate(&r, &other, YoungerBrother);

        let (p, report) = fx.attach(&r, OlderSister, Gender::Female);

        assert!(Fixture::has(&report, &p, &other, YoungerBrother));
        assert!(Fixture::has(&report, &other, &p, OlderSister));
        // The reverse pair R -> P is not proposed again.
        assert!(!report.edges().any(|e| e.connects(&r, &p) || e.connects(&p, &r)));
    }

    #[test]
    fn test_rule_6_and_2_new_child() {
        let mut fx = Fixture::new();
        let r = fx.person(Gender::Female);
        let older = fx.person(Gender::Female);
        fx.relate(&older, &r, Daughter);

        let (p, report) = fx.attach(&r, Son, Gender::Male);

        assert!(Fixture::has(&report, &p, &older, OlderSister));
        assert!(Fixture::has(&report, &older, &p, YoungerBrother));
        assert_eq!(report.created_by(InferenceRule::ChildSiblings), 2);
        assert_eq!(report.created_by(InferenceRule::ChildSpouseParent), 0);
    }

    #[test]
    fn test_rule_7_spouse_adopts_children() {
        let mut fx = Fixture::new();
        let r = fx.person(Gender::Male);
        let child = fx.person(Gender::Male);
        fx.relate(&child, &r, Son);

        let (p, report) = fx.attach(&r, Wife, Gender::Female);

        assert!(Fixture::has(&report, &p, &child, Mother));
        assert!(Fixture::has(&report, &child, &p, Son));
    }

    #[test]
    fn test_sibling_rules_combine() {
        // R has a father F and a younger brother B who already shares F.
        // New sibling P: rule 1 links P to F, then rule 5 links P to B.
        let mut fx = Fixture::new();
        let r = fx.person(Gender::Male);
        let f = fx.person(Gender::Male);
        let b = fx.person(Gender::Male);
        fx.relate(&f, &r, Father);
        fx.relate(&f, &b, Father);
        fx.relate(&r, &b, OlderBrother);

        let (p, report) = fx.attach(&r, YoungerBrother, Gender::Male);

        assert!(Fixture::has(&report, &f, &p, Father));
        assert!(Fixture::has(&report, &p, &b, OlderBrother));
        assert!(Fixture::has(&report, &b, &p, YoungerBrother));
        assert_eq!(report.created.len(), 4);
    }

    #[test]
    fn test_existing_pairs_are_skipped() {
        let mut fx = Fixture::new();
        let r = fx.person(Gender::Male);
        let f = fx.person(Gender::Male);
        fx.relate(&f, &r, Father);

        let p = fx.person(Gender::Male);
        fx.relate(&p, &r, OlderBrother);
        fx.relate(&f, &p, Father);

        let ctx = InferenceContext::new(
            fx.graph.family_id().clone(),
            p.clone(),
            Gender::Male,
            r.clone(),
            OlderBrother,
        );
        let report = InferenceEngine::new(&fx.catalog).plan(&fx.graph, &ctx);

        assert!(report.is_empty());
    }

    #[test]
    fn test_unknown_neighbor_gender_is_skipped() {
        let mut fx = Fixture::new();
        let r = fx.person(Gender::Male);
        let ghost = PersonId::new();
        fx.graph.add_edge(&ghost, &r, Son);

        let (_, report) = fx.attach(&r, Wife, Gender::Female);

        assert_eq!(report.created_by(InferenceRule::SpouseChildren), 0);
    }

    #[test]
    fn test_plan_leaves_snapshot_untouched() {
        let mut fx = Fixture::new();
        let r = fx.person(Gender::Male);
        let f = fx.person(Gender::Male);
        fx.relate(&f, &r, Father);
        let before = fx.graph.edge_count();

        let (_, report) = fx.attach(&r, OlderBrother, Gender::Male);

        // Only the explicit pair was added by the fixture.
        assert_eq!(fx.graph.edge_count(), before + 2);
        assert!(!report.is_empty());
    }
}

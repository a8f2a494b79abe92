//! Relation type catalog
//!
//! Static knowledge about the closed set of relation types: the
//! gender-dependent reverse of each type, the generation shift it implies and
//! its classification. Built once at start-up and shared read-only.

use crate::person::Gender;
use crate::relation::{RelationKind, RelationType};

const TYPE_COUNT: usize = RelationType::ALL.len();

/// `(type, reverse when the other person is male, reverse when female)`
const REVERSE_TABLE: [(RelationType, RelationType, RelationType); TYPE_COUNT] = {
    use RelationType::*;
    [
        (Father, Son, Daughter),
        (Mother, Son, Daughter),
        (Son, Father, Mother),
        (Daughter, Father, Mother),
        (Husband, Wife, Wife),
        (Wife, Husband, Husband),
        (OlderBrother, YoungerBrother, YoungerSister),
        (YoungerBrother, OlderBrother, OlderSister),
        (OlderSister, YoungerBrother, YoungerSister),
        (YoungerSister, OlderBrother, OlderSister),
    ]
};

/// Immutable relation-type tables
#[derive(Debug, Clone)]
pub struct RelationCatalog {
    reverse: [[RelationType; 2]; TYPE_COUNT],
    generation_delta: [i32; TYPE_COUNT],
    kinds: [RelationKind; TYPE_COUNT],
    parents: Vec<RelationType>,
    children: Vec<RelationType>,
    siblings: Vec<RelationType>,
    spouses: Vec<RelationType>,
}

fn type_index(t: RelationType) -> usize {
    t as usize
}

fn gender_index(g: Gender) -> usize {
    match g {
        Gender::Male => 0,
        Gender::Female => 1,
    }
}

fn classify(t: RelationType) -> RelationKind {
    use RelationType::*;
    match t {
        Father | Mother => RelationKind::Parent,
        Son | Daughter => RelationKind::Child,
        Husband | Wife => RelationKind::Spouse,
        OlderBrother | YoungerBrother | OlderSister | YoungerSister => RelationKind::Sibling,
    }
}

impl RelationCatalog {
    /// Build the standard catalog
    pub fn standard() -> Self {
        let mut reverse = [[RelationType::Father; 2]; TYPE_COUNT];
        for (t, if_male, if_female) in REVERSE_TABLE {
            reverse[type_index(t)] = [if_male, if_female];
        }

        let mut generation_delta = [0; TYPE_COUNT];
        let mut kinds = [RelationKind::Parent; TYPE_COUNT];
        for t in RelationType::ALL {
            let kind = classify(t);
            kinds[type_index(t)] = kind;
            generation_delta[type_index(t)] = match kind {
                RelationKind::Parent => -1,
                RelationKind::Child => 1,
                RelationKind::Sibling | RelationKind::Spouse => 0,
            };
        }

        let of_kind = |kind: RelationKind| -> Vec<RelationType> {
            RelationType::ALL
                .iter()
                .copied()
                .filter(|t| kinds[type_index(*t)] == kind)
                .collect()
        };

        Self {
            parents: of_kind(RelationKind::Parent),
            children: of_kind(RelationKind::Child),
            siblings: of_kind(RelationKind::Sibling),
            spouses: of_kind(RelationKind::Spouse),
            reverse,
            generation_delta,
            kinds,
        }
    }

    /// Type of the mirrored edge, keyed by the gender of the person the
    /// mirrored edge starts from.
    ///
    /// For `A -t-> B`, the reverse edge is `B -reverse_of(t, gender(B))-> A`.
    pub fn reverse_of(&self, relation_type: RelationType, other: Gender) -> RelationType {
        self.reverse[type_index(relation_type)][gender_index(other)]
    }

    pub fn generation_delta(&self, relation_type: RelationType) -> i32 {
        self.generation_delta[type_index(relation_type)]
    }

    pub fn kind(&self, relation_type: RelationType) -> RelationKind {
        self.kinds[type_index(relation_type)]
    }

    pub fn is(&self, relation_type: RelationType, kind: RelationKind) -> bool {
        self.kind(relation_type) == kind
    }

    /// All types of one classification, in catalog order
    pub fn types_of(&self, kind: RelationKind) -> &[RelationType] {
        match kind {
            RelationKind::Parent => &self.parents,
            RelationKind::Child => &self.children,
            RelationKind::Sibling => &self.siblings,
            RelationKind::Spouse => &self.spouses,
        }
    }

    pub fn contains(&self, token: &str) -> bool {
        RelationType::ALL.iter().any(|t| t.as_str() == token)
    }

    pub fn parent_type(&self, gender: Gender) -> RelationType {
        match gender {
            Gender::Male => RelationType::Father,
            Gender::Female => RelationType::Mother,
        }
    }

    pub fn child_type(&self, gender: Gender) -> RelationType {
        match gender {
            Gender::Male => RelationType::Son,
            Gender::Female => RelationType::Daughter,
        }
    }

    pub fn spouse_type(&self, gender: Gender) -> RelationType {
        match gender {
            Gender::Male => RelationType::Husband,
            Gender::Female => RelationType::Wife,
        }
    }

    pub fn older_sibling_type(&self, gender: Gender) -> RelationType {
        match gender {
            Gender::Male => RelationType::OlderBrother,
            Gender::Female => RelationType::OlderSister,
        }
    }

    pub fn younger_sibling_type(&self, gender: Gender) -> RelationType {
        match gender {
            Gender::Male => RelationType::YoungerBrother,
            Gender::Female => RelationType::YoungerSister,
        }
    }
}

impl Default for RelationCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use RelationType::*;

    #[test]
    fn test_reverse_table() {
        let catalog = RelationCatalog::standard();

        assert_eq!(catalog.reverse_of(Father, Gender::Male), Son);
        assert_eq!(catalog.reverse_of(Mother, Gender::Female), Daughter);
        assert_eq!(catalog.reverse_of(Daughter, Gender::Male), Father);
        assert_eq!(catalog.reverse_of(Son, Gender::Female), Mother);
        assert_eq!(catalog.reverse_of(OlderBrother, Gender::Female), YoungerSister);
        assert_eq!(catalog.reverse_of(YoungerSister, Gender::Male), OlderBrother);
    }

    #[test]
    fn test_spouse_reverse_ignores_gender() {
        let catalog = RelationCatalog::standard();
        for g in Gender::ALL {
            assert_eq!(catalog.reverse_of(Husband, g), Wife);
            assert_eq!(catalog.reverse_of(Wife, g), Husband);
        }
    }

    #[test]
    fn test_reverse_round_trips_for_consistent_genders() {
        // A -t-> B mirrored twice lands on t again when t agrees with A's gender.
        let catalog = RelationCatalog::standard();
        for t in RelationType::ALL {
            let a_gender = match t {
                Father | Son | Husband | OlderBrother | YoungerBrother => Gender::Male,
                _ => Gender::Female,
            };
            for b_gender in Gender::ALL {
                let back = catalog.reverse_of(t, b_gender);
                assert_eq!(catalog.reverse_of(back, a_gender), t, "{} / {}", t, b_gender);
            }
        }
    }

    #[test]
    fn test_generation_delta() {
        let catalog = RelationCatalog::standard();
        assert_eq!(catalog.generation_delta(Father), -1);
        assert_eq!(catalog.generation_delta(Mother), -1);
        assert_eq!(catalog.generation_delta(Son), 1);
        assert_eq!(catalog.generation_delta(Daughter), 1);
        assert_eq!(catalog.generation_delta(Wife), 0);
        assert_eq!(catalog.generation_delta(YoungerSister), 0);
    }

    #[test]
    fn test_classification() {
        let catalog = RelationCatalog::standard();
        assert_eq!(catalog.types_of(RelationKind::Parent), &[Father, Mother]);
        assert_eq!(catalog.types_of(RelationKind::Child), &[Son, Daughter]);
        assert_eq!(catalog.types_of(RelationKind::Spouse), &[Husband, Wife]);
        assert_eq!(
            catalog.types_of(RelationKind::Sibling),
            &[OlderBrother, YoungerBrother, OlderSister, YoungerSister]
        );
        assert!(catalog.is(OlderSister, RelationKind::Sibling));
        assert!(catalog.contains("WIFE"));
        assert!(!catalog.contains("wife"));
    }
}

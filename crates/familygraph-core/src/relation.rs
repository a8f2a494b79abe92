//! Relation (edge) types

use crate::family::FamilyId;
use crate::person::PersonId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Unique identifier for a relation edge
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeId(pub Ulid);

impl EdgeId {
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    pub fn from_string(s: &str) -> Result<Self, ulid::DecodeError> {
        Ok(Self(Ulid::from_string(s)?))
    }
}

impl Default for EdgeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EdgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for EdgeId {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s).map_err(|_| crate::Error::Validation(format!("malformed relation id: {}", s)))
    }
}

/// The closed set of relation types.
///
/// Wire form is the uppercase token (`FATHER`, `OLDER_SISTER`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationType {
    Father,
    Mother,
    Son,
    Daughter,
    Husband,
    Wife,
    OlderBrother,
    YoungerBrother,
    OlderSister,
    YoungerSister,
}

impl RelationType {
    pub const ALL: [RelationType; 10] = [
        RelationType::Father,
        RelationType::Mother,
        RelationType::Son,
        RelationType::Daughter,
        RelationType::Husband,
        RelationType::Wife,
        RelationType::OlderBrother,
        RelationType::YoungerBrother,
        RelationType::OlderSister,
        RelationType::YoungerSister,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Father => "FATHER",
            Self::Mother => "MOTHER",
            Self::Son => "SON",
            Self::Daughter => "DAUGHTER",
            Self::Husband => "HUSBAND",
            Self::Wife => "WIFE",
            Self::OlderBrother => "OLDER_BROTHER",
            Self::YoungerBrother => "YOUNGER_BROTHER",
            Self::OlderSister => "OLDER_SISTER",
            Self::YoungerSister => "YOUNGER_SISTER",
        }
    }
}

impl std::fmt::Display for RelationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RelationType {
    type Err = crate::Error;

    /// Tokens are case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| crate::Error::InvalidRelationType(s.to_string()))
    }
}

/// Classification of relation types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationKind {
    Parent,
    Child,
    Sibling,
    Spouse,
}

/// A directed, labelled kinship statement: `from` is `relation_type` of `to`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationEdge {
    /// Unique identifier
    pub id: EdgeId,

    /// Family this edge belongs to
    pub family_id: FamilyId,

    pub from_id: PersonId,

    pub to_id: PersonId,

    pub relation_type: RelationType,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl RelationEdge {
    pub fn new(
        family_id: FamilyId,
        from_id: PersonId,
        to_id: PersonId,
        relation_type: RelationType,
    ) -> Self {
        Self {
            id: EdgeId::new(),
            family_id,
            from_id,
            to_id,
            relation_type,
            created_at: Utc::now(),
        }
    }

    /// Share a timestamp across edges created by one operation
    pub fn at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn connects(&self, from: &PersonId, to: &PersonId) -> bool {
        &self.from_id == from && &self.to_id == to
    }
}

/// A forward edge and its mirrored reverse
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgePair {
    pub forward: RelationEdge,
    pub reverse: RelationEdge,
}

/// Outcome of deleting an explicit relationship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeletedEdges {
    pub deleted_forward: EdgeId,
    pub deleted_reverse: Option<EdgeId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relation_type_tokens() {
        for t in RelationType::ALL {
            assert_eq!(t.as_str().parse::<RelationType>().unwrap(), t);
            assert_eq!(
                serde_json::to_string(&t).unwrap(),
                format!("\"{}\"", t.as_str())
            );
        }
        assert!("father".parse::<RelationType>().is_err());
        assert!("COUSIN".parse::<RelationType>().is_err());
    }

    #[test]
    fn test_edge_creation() {
        let family = FamilyId::new();
        let from = PersonId::new();
        let to = PersonId::new();
        let edge = RelationEdge::new(family, from.clone(), to.clone(), RelationType::Father);

        assert!(edge.connects(&from, &to));
        assert!(!edge.connects(&to, &from));
        assert_eq!(edge.relation_type, RelationType::Father);
    }
}

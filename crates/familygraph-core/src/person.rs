//! Person (node) types

use crate::family::FamilyId;
use crate::relation::RelationType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Unique identifier for a person
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PersonId(pub Ulid);

impl PersonId {
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    pub fn from_string(s: &str) -> Result<Self, ulid::DecodeError> {
        Ok(Self(Ulid::from_string(s)?))
    }
}

impl Default for PersonId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PersonId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PersonId {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s).map_err(|_| crate::Error::Validation(format!("malformed person id: {}", s)))
    }
}

/// Gender of a person.
///
/// Reverse-relation and title lookups are keyed on exactly these two values;
/// the lowercase token is what appears after the `|` of a path key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Gender {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Self::Male),
            "female" | "f" => Ok(Self::Female),
            _ => Err(crate::Error::InvalidGender(s.to_string())),
        }
    }
}

/// A member of a family tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    /// Unique identifier
    pub id: PersonId,

    /// Family this person belongs to
    pub family_id: FamilyId,

    /// Display name
    pub name: String,

    pub gender: Gender,

    /// Generation offset from the family's first member (parents are -1, children +1)
    pub generation: i32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_year: Option<i32>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Person {
    /// Create a new person at generation 0
    pub fn new(family_id: FamilyId, name: impl Into<String>, gender: Gender) -> Self {
        let now = Utc::now();
        Self {
            id: PersonId::new(),
            family_id,
            name: name.into(),
            gender,
            generation: 0,
            birth_year: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_generation(mut self, generation: i32) -> Self {
        self.generation = generation;
        self
    }

    pub fn with_birth_year(mut self, year: i32) -> Self {
        self.birth_year = Some(year);
        self
    }
}

/// How a new person attaches to someone already in the tree:
/// the new person is `relation_type` of `person_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceRelation {
    pub person_id: PersonId,
    pub relation_type: RelationType,
}

/// Data for creating a new person
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPerson {
    pub name: String,
    pub gender: Gender,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_year: Option<i32>,
    /// None for the first member of a family
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<ReferenceRelation>,
}

impl NewPerson {
    pub fn new(name: impl Into<String>, gender: Gender) -> Self {
        Self {
            name: name.into(),
            gender,
            birth_year: None,
            reference: None,
        }
    }

    /// Attach the new person as `relation_type` of `person_id`
    pub fn related_to(mut self, person_id: PersonId, relation_type: RelationType) -> Self {
        self.reference = Some(ReferenceRelation {
            person_id,
            relation_type,
        });
        self
    }

    pub fn with_birth_year(mut self, year: i32) -> Self {
        self.birth_year = Some(year);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_tokens() {
        assert_eq!(Gender::Male.to_string(), "male");
        assert_eq!(Gender::Female.to_string(), "female");
        assert_eq!("Female".parse::<Gender>().unwrap(), Gender::Female);
        assert!("other".parse::<Gender>().is_err());
        assert_eq!(serde_json::to_string(&Gender::Male).unwrap(), "\"male\"");
    }

    #[test]
    fn test_new_person_builder() {
        let father = PersonId::new();
        let new_person = NewPerson::new("Wei", Gender::Male)
            .with_birth_year(1990)
            .related_to(father.clone(), RelationType::Son);

        let reference = new_person.reference.unwrap();
        assert_eq!(reference.person_id, father);
        assert_eq!(reference.relation_type, RelationType::Son);
        assert_eq!(new_person.birth_year, Some(1990));
    }
}

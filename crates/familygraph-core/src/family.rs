//! Family (partition) types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Unique identifier for a family
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FamilyId(pub Ulid);

impl FamilyId {
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    pub fn from_string(s: &str) -> Result<Self, ulid::DecodeError> {
        Ok(Self(Ulid::from_string(s)?))
    }
}

impl Default for FamilyId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for FamilyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for FamilyId {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s).map_err(|_| crate::Error::Validation(format!("malformed family id: {}", s)))
    }
}

/// A family tree. Every person, edge and title map lives in exactly one family.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Family {
    /// Unique identifier
    pub id: FamilyId,

    /// Display name
    pub name: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Family {
    /// Create a new family
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: FamilyId::new(),
            name: name.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_creation() {
        let family = Family::new("Zhang");
        assert_eq!(family.name, "Zhang");
        assert_eq!(family.created_at, family.updated_at);
    }

    #[test]
    fn test_family_id_parse() {
        let id = FamilyId::new();
        let parsed: FamilyId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-a-ulid".parse::<FamilyId>().is_err());
    }
}

//! Custom kinship naming
//!
//! Overrides are consulted before the static title catalog. Anything that can
//! answer "which title does this path key map to" can act as an override
//! source; a persisted [`TitleMap`] is the usual one.

use crate::family::FamilyId;
use crate::limits;
use crate::path_key::PathKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use ulid::Ulid;

/// Lookup of custom titles by path key
pub trait TitleOverrides {
    fn lookup(&self, path_key: &str) -> Option<&str>;
}

/// Override source that never matches
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOverrides;

impl TitleOverrides for NoOverrides {
    fn lookup(&self, _path_key: &str) -> Option<&str> {
        None
    }
}

impl TitleOverrides for HashMap<String, String> {
    fn lookup(&self, path_key: &str) -> Option<&str> {
        self.get(path_key).map(String::as_str)
    }
}

impl TitleOverrides for BTreeMap<String, String> {
    fn lookup(&self, path_key: &str) -> Option<&str> {
        self.get(path_key).map(String::as_str)
    }
}

impl<T: TitleOverrides + ?Sized> TitleOverrides for &T {
    fn lookup(&self, path_key: &str) -> Option<&str> {
        (**self).lookup(path_key)
    }
}

impl<T: TitleOverrides> TitleOverrides for Option<T> {
    fn lookup(&self, path_key: &str) -> Option<&str> {
        self.as_ref().and_then(|o| o.lookup(path_key))
    }
}

/// Unique identifier for a title map
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TitleMapId(pub Ulid);

impl TitleMapId {
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    pub fn from_string(s: &str) -> Result<Self, ulid::DecodeError> {
        Ok(Self(Ulid::from_string(s)?))
    }
}

impl Default for TitleMapId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TitleMapId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TitleMapId {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s)
            .map_err(|_| crate::Error::Validation(format!("malformed title map id: {}", s)))
    }
}

/// A named, per-family set of title overrides
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitleMap {
    pub id: TitleMapId,

    pub family_id: FamilyId,

    /// Opaque identifier of whoever created the map
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Path key to custom title
    #[serde(default)]
    pub overrides: BTreeMap<String, String>,

    /// Visible to every member of the family, not just the creator
    #[serde(default)]
    pub is_shared: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl TitleMap {
    pub fn new(family_id: FamilyId, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: TitleMapId::new(),
            family_id,
            creator: None,
            name: name.into().trim().to_string(),
            description: None,
            overrides: BTreeMap::new(),
            is_shared: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = Some(creator.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_override(mut self, path_key: impl Into<String>, title: impl Into<String>) -> Self {
        self.overrides.insert(path_key.into(), title.into());
        self
    }

    pub fn shared(mut self, is_shared: bool) -> Self {
        self.is_shared = is_shared;
        self
    }

    /// Check name, override keys and override values
    pub fn validate(&self) -> crate::Result<()> {
        limits::validate_title_map_name(&self.name)?;
        limits::validate_override_count(self.overrides.len())?;
        for (key, title) in &self.overrides {
            key.parse::<PathKey>()?;
            limits::validate_title(key, title)?;
        }
        Ok(())
    }

    /// Mark the map as modified now
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl TitleOverrides for TitleMap {
    fn lookup(&self, path_key: &str) -> Option<&str> {
        self.overrides.lookup(path_key)
    }
}

/// Partial update of a title map
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TitleMapUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Replaces the whole override set when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overrides: Option<BTreeMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_shared: Option<bool>,
}

impl TitleMapUpdate {
    pub fn apply(self, map: &mut TitleMap) {
        if let Some(name) = self.name {
            map.name = name.trim().to_string();
        }
        if let Some(description) = self.description {
            map.description = Some(description);
        }
        if let Some(overrides) = self.overrides {
            map.overrides = overrides;
        }
        if let Some(is_shared) = self.is_shared {
            map.is_shared = is_shared;
        }
        map.touch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_map_lookup() {
        let map = TitleMap::new(FamilyId::new(), "南方叫法")
            .with_override("FATHER>FATHER|male", "阿公");

        assert_eq!(map.lookup("FATHER>FATHER|male"), Some("阿公"));
        assert_eq!(map.lookup("MOTHER>MOTHER|female"), None);
        assert!(map.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_keys_and_titles() {
        let family = FamilyId::new();

        let bad_key = TitleMap::new(family.clone(), "m").with_override("FATHER|Male", "爸");
        assert!(bad_key.validate().unwrap_err().is_validation());

        let long_title =
            TitleMap::new(family.clone(), "m").with_override("FATHER|male", "爸".repeat(21));
        assert!(long_title.validate().is_err());

        let blank_name = TitleMap::new(family, "   ");
        assert!(blank_name.validate().is_err());
    }

    #[test]
    fn test_update_replaces_overrides() {
        let mut map = TitleMap::new(FamilyId::new(), "old").with_override("WIFE|female", "老婆");
        let mut overrides = BTreeMap::new();
        overrides.insert("HUSBAND|male".to_string(), "老公".to_string());

        TitleMapUpdate {
            name: Some("  new ".into()),
            overrides: Some(overrides),
            ..Default::default()
        }
        .apply(&mut map);

        assert_eq!(map.name, "new");
        assert_eq!(map.lookup("WIFE|female"), None);
        assert_eq!(map.lookup("HUSBAND|male"), Some("老公"));
    }

    #[test]
    fn test_blanket_impls() {
        let mut overrides = HashMap::new();
        overrides.insert("SON|male".to_string(), "崽".to_string());
        assert_eq!((&overrides).lookup("SON|male"), Some("崽"));
        assert_eq!(NoOverrides.lookup("SON|male"), None);
        assert_eq!(None::<NoOverrides>.lookup("SON|male"), None);
    }
}

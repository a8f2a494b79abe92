//! Path keys: the join key between a traversal and a kinship title
//!
//! Format is exactly `REL1>REL2>...>RELn|gender`, case-sensitive, no
//! whitespace. Both the static title catalog and override maps are keyed by
//! this string.

use crate::person::Gender;
use crate::relation::RelationType;
use serde::{Deserialize, Serialize};

const HOP_SEPARATOR: char = '>';
const GENDER_SEPARATOR: char = '|';

/// A viewer-relative relation path plus the target's gender
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PathKey {
    hops: Vec<RelationType>,
    gender: Gender,
}

impl PathKey {
    pub fn new(hops: Vec<RelationType>, gender: Gender) -> Self {
        Self { hops, gender }
    }

    pub fn hops(&self) -> &[RelationType] {
        &self.hops
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn len(&self) -> usize {
        self.hops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }

    /// Render a key without building a `PathKey`
    pub fn format(hops: &[RelationType], gender: Gender) -> String {
        let mut key = String::with_capacity(hops.len() * 12 + 8);
        for (i, hop) in hops.iter().enumerate() {
            if i > 0 {
                key.push(HOP_SEPARATOR);
            }
            key.push_str(hop.as_str());
        }
        key.push(GENDER_SEPARATOR);
        key.push_str(gender.as_str());
        key
    }
}

impl std::fmt::Display for PathKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&Self::format(&self.hops, self.gender))
    }
}

impl std::str::FromStr for PathKey {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || crate::Error::Validation(format!("malformed path key: {:?}", s));

        let (path, gender) = s.split_once(GENDER_SEPARATOR).ok_or_else(invalid)?;
        // Gender must be the exact lowercase token, unlike user input elsewhere.
        let gender = match gender {
            "male" => Gender::Male,
            "female" => Gender::Female,
            _ => return Err(invalid()),
        };
        if path.is_empty() {
            return Err(invalid());
        }

        let hops = path
            .split(HOP_SEPARATOR)
            .map(|hop| hop.parse::<RelationType>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { hops, gender })
    }
}

impl TryFrom<String> for PathKey {
    type Error = crate::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PathKey> for String {
    fn from(key: PathKey) -> Self {
        key.to_string()
    }
}

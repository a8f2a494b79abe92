//! Forward/reverse edge pairing
//!
//! Every explicitly stated relation is stored twice: `from -t-> to` and the
//! mirrored `to -reverse-> from`, where the reverse type depends on the gender
//! of `to`. These helpers validate the endpoints and build both edges; writing
//! them is left to the engine.

use crate::catalog::RelationCatalog;
use crate::error::{Error, Result};
use crate::family::FamilyId;
use crate::person::Person;
use crate::relation::{EdgePair, RelationEdge, RelationType};
use chrono::{DateTime, Utc};

/// Validates and builds explicit edge pairs
#[derive(Debug, Clone, Copy)]
pub struct EdgeInvariants<'a> {
    catalog: &'a RelationCatalog,
}

impl<'a> EdgeInvariants<'a> {
    pub fn new(catalog: &'a RelationCatalog) -> Self {
        Self { catalog }
    }

    /// Reject self-relations and endpoints outside `family`
    pub fn check_endpoints(&self, family: &FamilyId, from: &Person, to: &Person) -> Result<()> {
        if from.id == to.id {
            return Err(Error::SelfRelation(from.id.to_string()));
        }
        for person in [from, to] {
            if &person.family_id != family {
                return Err(Error::CrossFamily {
                    person: person.id.to_string(),
                    family: family.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Build `from -t-> to` and its reverse, after validating the endpoints
    pub fn pair(
        &self,
        family: &FamilyId,
        from: &Person,
        to: &Person,
        relation_type: RelationType,
        created_at: DateTime<Utc>,
    ) -> Result<EdgePair> {
        self.check_endpoints(family, from, to)?;

        let reverse_type = self.catalog.reverse_of(relation_type, to.gender);
        let forward = RelationEdge::new(family.clone(), from.id.clone(), to.id.clone(), relation_type)
            .at(created_at);
        let reverse = RelationEdge::new(family.clone(), to.id.clone(), from.id.clone(), reverse_type)
            .at(created_at);

        Ok(EdgePair { forward, reverse })
    }
}

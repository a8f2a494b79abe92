//! Error types for FamilyGraph Core

use thiserror::Error;

/// Result type alias using FamilyGraph's Error
pub type Result<T> = std::result::Result<T, Error>;

/// FamilyGraph error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid relation type: {0}")]
    InvalidRelationType(String),

    #[error("Invalid gender: {0}")]
    InvalidGender(String),

    #[error("Cannot relate a person to themselves: {0}")]
    SelfRelation(String),

    #[error("Person {person} does not belong to family {family}")]
    CrossFamily { person: String, family: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Family not found: {0}")]
    FamilyNotFound(String),

    #[error("Person not found: {0}")]
    PersonNotFound(String),

    #[error("Relation not found: {0}")]
    RelationNotFound(String),

    #[error("Title map not found: {0}")]
    TitleMapNotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Input was rejected before any mutation took place
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidRelationType(_)
                | Self::InvalidGender(_)
                | Self::SelfRelation(_)
                | Self::CrossFamily { .. }
                | Self::Validation(_)
        )
    }

    /// A referenced family, person, relation or title map does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::FamilyNotFound(_)
                | Self::PersonNotFound(_)
                | Self::RelationNotFound(_)
                | Self::TitleMapNotFound(_)
        )
    }
}

impl From<crate::limits::ValidationError> for Error {
    fn from(err: crate::limits::ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

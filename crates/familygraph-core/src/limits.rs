//! Input validation limits

/// Maximum hops the title resolver traverses (5)
pub const BFS_MAX_DEPTH: usize = 5;

/// Maximum length for person names (64 chars)
pub const MAX_PERSON_NAME_LEN: usize = 64;

/// Maximum length for family names (64 chars)
pub const MAX_FAMILY_NAME_LEN: usize = 64;

/// Maximum length for title map names (64 chars)
pub const MAX_TITLE_MAP_NAME_LEN: usize = 64;

/// Maximum length of a custom title (20 chars)
pub const MAX_TITLE_LEN: usize = 20;

/// Maximum overrides in a single title map (1000)
pub const MAX_OVERRIDES_PER_MAP: usize = 1000;

/// Validation error type
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    EmptyPersonName,
    PersonNameTooLong { len: usize, max: usize },
    EmptyFamilyName,
    FamilyNameTooLong { len: usize, max: usize },
    EmptyTitleMapName,
    TitleMapNameTooLong { len: usize, max: usize },
    EmptyTitle { key: String },
    TitleTooLong { key: String, len: usize, max: usize },
    TooManyOverrides { count: usize, max: usize },
    TraversalDepthOutOfRange { depth: usize, max: usize },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyPersonName => write!(f, "Person name cannot be empty"),
            Self::PersonNameTooLong { len, max } => {
                write!(f, "Person name too long: {} chars (max {})", len, max)
            }
            Self::EmptyFamilyName => write!(f, "Family name cannot be empty"),
            Self::FamilyNameTooLong { len, max } => {
                write!(f, "Family name too long: {} chars (max {})", len, max)
            }
            Self::EmptyTitleMapName => write!(f, "Title map name cannot be empty"),
            Self::TitleMapNameTooLong { len, max } => {
                write!(f, "Title map name too long: {} chars (max {})", len, max)
            }
            Self::EmptyTitle { key } => write!(f, "Title for {} cannot be empty", key),
            Self::TitleTooLong { key, len, max } => {
                write!(f, "Title for {} too long: {} chars (max {})", key, len, max)
            }
            Self::TooManyOverrides { count, max } => {
                write!(f, "Too many title overrides: {} (max {})", count, max)
            }
            Self::TraversalDepthOutOfRange { depth, max } => {
                write!(f, "Traversal depth {} out of range (1..={})", depth, max)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Validate person name
pub fn validate_person_name(name: &str) -> Result<(), ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyPersonName);
    }
    if char_len(name) > MAX_PERSON_NAME_LEN {
        return Err(ValidationError::PersonNameTooLong {
            len: char_len(name),
            max: MAX_PERSON_NAME_LEN,
        });
    }
    Ok(())
}

/// Validate family name
pub fn validate_family_name(name: &str) -> Result<(), ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyFamilyName);
    }
    if char_len(name) > MAX_FAMILY_NAME_LEN {
        return Err(ValidationError::FamilyNameTooLong {
            len: char_len(name),
            max: MAX_FAMILY_NAME_LEN,
        });
    }
    Ok(())
}

/// Validate title map name
pub fn validate_title_map_name(name: &str) -> Result<(), ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyTitleMapName);
    }
    if char_len(name) > MAX_TITLE_MAP_NAME_LEN {
        return Err(ValidationError::TitleMapNameTooLong {
            len: char_len(name),
            max: MAX_TITLE_MAP_NAME_LEN,
        });
    }
    Ok(())
}

/// Validate a custom title (counted in characters, not bytes)
pub fn validate_title(key: &str, title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle { key: key.to_string() });
    }
    if char_len(title) > MAX_TITLE_LEN {
        return Err(ValidationError::TitleTooLong {
            key: key.to_string(),
            len: char_len(title),
            max: MAX_TITLE_LEN,
        });
    }
    Ok(())
}

/// Validate override count
pub fn validate_override_count(count: usize) -> Result<(), ValidationError> {
    if count > MAX_OVERRIDES_PER_MAP {
        return Err(ValidationError::TooManyOverrides {
            count,
            max: MAX_OVERRIDES_PER_MAP,
        });
    }
    Ok(())
}

/// Validate a configured traversal depth
pub fn validate_traversal_depth(depth: usize) -> Result<(), ValidationError> {
    if depth == 0 || depth > BFS_MAX_DEPTH {
        return Err(ValidationError::TraversalDepthOutOfRange {
            depth,
            max: BFS_MAX_DEPTH,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_person_name() {
        assert!(validate_person_name("张三").is_ok());
        assert!(validate_person_name("   ").is_err());
        assert!(validate_person_name(&"x".repeat(100)).is_err());
    }

    #[test]
    fn test_validate_title_counts_chars() {
        // 20 CJK characters are 60 bytes but still within the limit
        assert!(validate_title("FATHER|male", &"爸".repeat(20)).is_ok());
        assert!(validate_title("FATHER|male", &"爸".repeat(21)).is_err());
        assert!(validate_title("FATHER|male", "").is_err());
    }

    #[test]
    fn test_validate_traversal_depth() {
        assert!(validate_traversal_depth(5).is_ok());
        assert!(validate_traversal_depth(1).is_ok());
        assert!(validate_traversal_depth(0).is_err());
        assert!(validate_traversal_depth(6).is_err());
    }
}

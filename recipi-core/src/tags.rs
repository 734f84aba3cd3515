//! Tag rules. A recipe carries between one and [`MAX_TAGS`] unique tags of at
//! most [`MAX_TAG_LEN`] characters each.

use std::collections::HashSet;
use thiserror::Error;

pub const MAX_TAGS: usize = 3;
pub const MAX_TAG_LEN: usize = 15;

/// Why a tag edit was refused. The messages are shown to the user as-is.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagError {
    #[error("Tag already exists")]
    Duplicate,
    #[error("Tag cannot be empty")]
    Empty,
    #[error("Maximum of 3 tags")]
    TooMany,
    #[error("Tag must be 15 characters or fewer")]
    TooLong,
    #[error("Recipe must have at least one tag")]
    LastTag,
}

/// Check whether `raw` may be appended to `existing`.
///
/// Returns the trimmed tag on success. Comparison against existing tags is
/// case-sensitive.
pub fn check_new_tag(existing: &[String], raw: &str) -> Result<String, TagError> {
    let tag = raw.trim();

    if existing.iter().any(|t| t == tag) {
        return Err(TagError::Duplicate);
    }
    if tag.is_empty() {
        return Err(TagError::Empty);
    }
    if existing.len() >= MAX_TAGS {
        return Err(TagError::TooMany);
    }
    if tag.chars().count() > MAX_TAG_LEN {
        return Err(TagError::TooLong);
    }

    Ok(tag.to_string())
}

/// Check whether the tag at `index` may be removed.
pub fn check_delete_tag(existing: &[String]) -> Result<(), TagError> {
    if existing.len() <= 1 {
        return Err(TagError::LastTag);
    }
    Ok(())
}

/// Validate a complete tag list as submitted to the server.
///
/// An empty list is accepted here; whether tags are required is decided by
/// the caller.
pub fn validate_tags(tags: &[String]) -> Vec<String> {
    let mut errors = Vec::new();

    if tags.len() > MAX_TAGS {
        errors.push(format!("tags must contain at most {} entries", MAX_TAGS));
    }
    if tags.iter().any(|t| t.trim().is_empty()) {
        errors.push("tags must not be blank".to_string());
    }
    if tags.iter().any(|t| t.chars().count() > MAX_TAG_LEN) {
        errors.push(format!(
            "each tag must be {} characters or fewer",
            MAX_TAG_LEN
        ));
    }

    let mut seen = HashSet::new();
    if !tags.iter().all(|t| seen.insert(t.as_str())) {
        errors.push("tags must be unique".to_string());
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_new_tag_is_trimmed() {
        assert_eq!(check_new_tag(&[], "  spicy "), Ok("spicy".to_string()));
    }

    #[test]
    fn test_duplicate_rejected() {
        let existing = tags(&["mexican", "spicy"]);
        assert_eq!(
            check_new_tag(&existing, "mexican"),
            Err(TagError::Duplicate)
        );
        assert_eq!(
            check_new_tag(&existing, " mexican "),
            Err(TagError::Duplicate)
        );
    }

    #[test]
    fn test_duplicate_check_is_case_sensitive() {
        let existing = tags(&["mexican"]);
        assert_eq!(
            check_new_tag(&existing, "Mexican"),
            Ok("Mexican".to_string())
        );
    }

    #[test]
    fn test_blank_rejected() {
        assert_eq!(check_new_tag(&[], "   "), Err(TagError::Empty));
    }

    #[test]
    fn test_fourth_tag_rejected() {
        let existing = tags(&["a", "b", "c"]);
        assert_eq!(check_new_tag(&existing, "d"), Err(TagError::TooMany));
    }

    #[test]
    fn test_long_tag_rejected() {
        assert_eq!(
            check_new_tag(&[], "abcdefghijklmnop"),
            Err(TagError::TooLong)
        );
        assert!(check_new_tag(&[], "abcdefghijklmno").is_ok());
    }

    #[test]
    fn test_last_tag_cannot_be_deleted() {
        assert_eq!(
            check_delete_tag(&tags(&["mexican"])),
            Err(TagError::LastTag)
        );
        assert!(check_delete_tag(&tags(&["mexican", "spicy"])).is_ok());
    }

    #[test]
    fn test_validate_tags_reports_each_problem() {
        let errors = validate_tags(&tags(&["a", "a", "b", "this-tag-is-too-long"]));
        assert_eq!(errors.len(), 3);
        assert!(validate_tags(&tags(&["dinner", "quick"])).is_empty());
    }
}

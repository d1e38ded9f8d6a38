// Field groups shared by several entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::validators::validate_slug;

/// `name` + unique `slug`, composed into categories and genres.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, sqlx::FromRow)]
pub struct NameSlug {
    #[validate(length(min = 1, max = 256, message = "Name must be between 1 and 256 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 50, message = "Slug must be between 1 and 50 characters"))]
    #[validate(custom(function = "validate_slug"))]
    pub slug: String,
}

/// Author, text and publication date, composed into reviews and comments.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Authored {
    pub author_id: i64,
    /// Author's username, joined in at read time.
    pub author: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
}

/// Case-insensitive substring pattern for `LIKE ... ESCAPE '\'`.
pub fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_slug_validation() {
        let ok = NameSlug {
            name: "Science fiction".to_string(),
            slug: "sci-fi".to_string(),
        };
        assert!(ok.validate().is_ok());

        let bad_slug = NameSlug {
            name: "Science fiction".to_string(),
            slug: "sci fi".to_string(),
        };
        let errors = bad_slug.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("slug"));

        let long_slug = NameSlug {
            name: "x".to_string(),
            slug: "a".repeat(51),
        };
        assert!(long_slug.validate().is_err());
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("dune"), "%dune%");
        assert_eq!(like_pattern("100%_"), "%100\\%\\_%");
    }
}

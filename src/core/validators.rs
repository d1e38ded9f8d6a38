// Field validators shared by request payloads

use chrono::{Datelike, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationError;

use crate::error::{AppError, AppResult};

pub const USERNAME_MAX_LENGTH: u64 = 150;
pub const EMAIL_MAX_LENGTH: u64 = 254;
pub const PERSON_NAME_MAX_LENGTH: u64 = 150;
pub const NAME_MAX_LENGTH: u64 = 256;
pub const SLUG_MAX_LENGTH: u64 = 50;

static USERNAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\w.@+-]+\z").expect("valid username regex"));
static SLUG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-a-zA-Z0-9_]+\z").expect("valid slug regex"));

/// Letters, digits and `@.+-_`; the literal `me` is reserved for the profile endpoint.
pub fn validate_username(value: &str) -> Result<(), ValidationError> {
    if !USERNAME_RE.is_match(value) {
        return Err(ValidationError::new("username_charset")
            .with_message("Username may contain only letters, digits and @.+-_".into()));
    }
    if value == "me" {
        return Err(ValidationError::new("username_reserved")
            .with_message("Username cannot be \"me\"".into()));
    }
    Ok(())
}

pub fn validate_slug(value: &str) -> Result<(), ValidationError> {
    if SLUG_RE.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::new("slug")
            .with_message("Slug may contain only latin letters, digits, hyphens and underscores".into()))
    }
}

/// Release years are checked against the current year at write time.
pub fn validate_year_not_in_future(year: i32) -> AppResult<()> {
    let current = Utc::now().year();
    if year > current {
        return Err(AppError::field(
            "year",
            format!("Year cannot be in the future: {}", year),
        ));
    }
    Ok(())
}

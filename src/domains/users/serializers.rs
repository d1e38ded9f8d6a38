use serde::{Deserialize, Serialize};
use validator::Validate;

use super::model::User;
use crate::core::validators::validate_username;
use crate::core::Role;

/// Public profile representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub role: Role,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            email: user.email.clone(),
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            bio: user.bio.clone(),
            role: user.role,
        }
    }
}

/// Full user payload (POST and PUT on the admin endpoint).
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UserRequest {
    #[validate(length(min = 1, max = 150, message = "Username must be between 1 and 150 characters"))]
    #[validate(custom(function = "validate_username"))]
    pub username: String,

    #[validate(email(message = "Enter a valid email address"))]
    #[validate(length(max = 254, message = "Email must be at most 254 characters"))]
    pub email: String,

    #[validate(length(max = 150, message = "First name must be at most 150 characters"))]
    pub first_name: Option<String>,

    #[validate(length(max = 150, message = "Last name must be at most 150 characters"))]
    pub last_name: Option<String>,

    pub bio: Option<String>,

    pub role: Option<Role>,
}

/// Partial user payload (PATCH). Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UserPatch {
    #[validate(length(min = 1, max = 150, message = "Username must be between 1 and 150 characters"))]
    #[validate(custom(function = "validate_username"))]
    pub username: Option<String>,

    #[validate(email(message = "Enter a valid email address"))]
    #[validate(length(max = 254, message = "Email must be at most 254 characters"))]
    pub email: Option<String>,

    #[validate(length(max = 150, message = "First name must be at most 150 characters"))]
    pub first_name: Option<String>,

    #[validate(length(max = 150, message = "Last name must be at most 150 characters"))]
    pub last_name: Option<String>,

    pub bio: Option<String>,

    pub role: Option<Role>,
}

impl UserPatch {
    pub fn apply_to(self, user: &mut User) {
        if let Some(username) = self.username {
            user.username = username;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(first_name) = self.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = self.last_name {
            user.last_name = last_name;
        }
        if let Some(bio) = self.bio {
            user.bio = bio;
        }
        if let Some(role) = self.role {
            user.role = role;
        }
    }
}

impl From<UserRequest> for UserPatch {
    fn from(request: UserRequest) -> Self {
        Self {
            username: Some(request.username),
            email: Some(request.email),
            first_name: request.first_name,
            last_name: request.last_name,
            bio: request.bio,
            role: request.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: 1,
            username: "alice".to_string(),
            email: "alice@x.io".to_string(),
            role: Role::User,
            bio: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            is_staff: false,
            confirmation_code: "code".to_string(),
        }
    }

    #[test]
    fn test_request_rejects_reserved_username() {
        let request: UserRequest =
            serde_json::from_str(r#"{"username": "me", "email": "me@x.io"}"#).unwrap();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("username"));
    }

    #[test]
    fn test_request_rejects_bad_email() {
        let request: UserRequest =
            serde_json::from_str(r#"{"username": "bob", "email": "not-an-email"}"#).unwrap();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_patch_touches_only_given_fields() {
        let mut target = user();
        let patch: UserPatch = serde_json::from_str(r#"{"bio": "hello"}"#).unwrap();
        patch.apply_to(&mut target);
        assert_eq!(target.bio, "hello");
        assert_eq!(target.username, "alice");
        assert_eq!(target.role, Role::User);
    }

    #[test]
    fn test_unknown_role_fails_to_parse() {
        let parsed: Result<UserPatch, _> = serde_json::from_str(r#"{"role": "overlord"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_response_hides_confirmation_code() {
        let json = serde_json::to_value(UserResponse::from(&user())).unwrap();
        assert!(json.get("confirmation_code").is_none());
        assert_eq!(json["role"], "user");
    }
}

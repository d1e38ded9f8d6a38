use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::validators::validate_username;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 150, message = "Username must be between 1 and 150 characters"))]
    #[validate(custom(function = "validate_username"))]
    pub username: String,

    #[validate(email(message = "Enter a valid email address"))]
    #[validate(length(max = 254, message = "Email must be at most 254 characters"))]
    pub email: String,
}

/// Echo of the accepted signup. Never carries the code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignupResponse {
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TokenRequest {
    #[validate(length(min = 1, max = 150, message = "Username must be between 1 and 150 characters"))]
    #[validate(custom(function = "validate_username"))]
    pub username: String,

    #[validate(length(min = 1, message = "This field may not be blank"))]
    pub confirmation_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

// Token Service - access-token signing and confirmation-code generation

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::distr::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::config::AuthConfig;
use crate::error::{AppError, AppResult};

const ISSUER: &str = "yamdb-auth";

/// JWT Claims for authentication
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (username)
    pub uid: i64,    // User ID at issue time
    pub iat: u64,    // Issued at
    pub exp: u64,    // Expires at
    pub iss: String, // Issuer
}

/// Issues and verifies signed access tokens.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_secs: u64,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            expiry_secs: config.jwt_expiry_secs,
        }
    }

    /// Sign an access token carrying the user's identity.
    #[instrument(skip(self))]
    pub fn issue_token(&self, user_id: i64, username: &str) -> AppResult<String> {
        let now = Utc::now().timestamp().max(0) as u64;
        let claims = Claims {
            sub: username.to_string(),
            uid: user_id,
            iat: now,
            exp: now + self.expiry_secs,
            iss: ISSUER.to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Validate JWT token and return its claims
    #[instrument(skip(self, token))]
    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))
    }
}

/// Random ASCII-alphanumeric code of the given length.
pub fn generate_confirmation_code(length: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

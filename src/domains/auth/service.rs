// AuthService - signup and confirmation-code exchange

use std::sync::Arc;

use tracing::{info, instrument, warn};

use super::serializers::{SignupRequest, SignupResponse, TokenRequest, TokenResponse};
use crate::{
    domains::users::{NewUser, User, UserRepository},
    error::{AppError, AppResult},
    infrastructure::{
        mailer::{Mail, Mailer},
        security::{generate_confirmation_code, TokenService},
    },
};

const CONFIRMATION_SUBJECT: &str = "Registration confirmation";

#[derive(Clone)]
pub struct AuthService {
    users: UserRepository,
    tokens: Arc<TokenService>,
    mailer: Arc<dyn Mailer>,
    code_length: usize,
    from_email: String,
}

impl AuthService {
    pub fn new(
        users: UserRepository,
        tokens: Arc<TokenService>,
        mailer: Arc<dyn Mailer>,
        code_length: usize,
        from_email: String,
    ) -> Self {
        Self {
            users,
            tokens,
            mailer,
            code_length,
            from_email,
        }
    }

    /// Register `(username, email)` or re-send the code of an existing
    /// registration with exactly that pair.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn signup(&self, request: SignupRequest) -> AppResult<SignupResponse> {
        let code = match self
            .users
            .find_by_username_and_email(&request.username, &request.email)
            .await?
        {
            Some(user) => self.current_code(&user).await?,
            None => self.register(&request).await?,
        };

        self.send_code(&request.email, &code).await;

        Ok(SignupResponse {
            username: request.username,
            email: request.email,
        })
    }

    /// Exchange a confirmation code for an access token. A wrong code burns
    /// the stored one.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn token(&self, request: TokenRequest) -> AppResult<TokenResponse> {
        let user = self
            .users
            .find_by_username(&request.username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", request.username)))?;

        if user.confirmation_code.is_empty() || user.confirmation_code != request.confirmation_code {
            let rotated = generate_confirmation_code(self.code_length);
            self.users.set_confirmation_code(user.id, &rotated).await?;
            warn!("confirmation code mismatch, stored code rotated");
            return Err(AppError::field(
                "confirmation_code",
                "Invalid confirmation code",
            ));
        }

        let token = self.tokens.issue_token(user.id, &user.username)?;
        info!("access token issued");
        Ok(TokenResponse { token })
    }

    async fn register(&self, request: &SignupRequest) -> AppResult<String> {
        if self.users.find_by_username(&request.username).await?.is_some() {
            return Err(AppError::Conflict(
                "A user with this username already exists".to_string(),
            ));
        }
        if self.users.find_by_email(&request.email).await?.is_some() {
            return Err(AppError::Conflict(
                "A user with this email already exists".to_string(),
            ));
        }

        let code = generate_confirmation_code(self.code_length);
        self.users
            .create(&NewUser {
                username: request.username.clone(),
                email: request.email.clone(),
                confirmation_code: code.clone(),
                ..NewUser::default()
            })
            .await?;
        info!("pending user registered");
        Ok(code)
    }

    /// Stored code, minting one for accounts created without a code.
    async fn current_code(&self, user: &User) -> AppResult<String> {
        if !user.confirmation_code.is_empty() {
            return Ok(user.confirmation_code.clone());
        }
        let code = generate_confirmation_code(self.code_length);
        self.users.set_confirmation_code(user.id, &code).await?;
        Ok(code)
    }

    async fn send_code(&self, to: &str, code: &str) {
        let mail = Mail {
            from: self.from_email.clone(),
            to: to.to_string(),
            subject: CONFIRMATION_SUBJECT.to_string(),
            body: format!("Your confirmation code: {}", code),
        };
        if let Err(e) = self.mailer.send(mail).await {
            warn!(error = %e, "failed to send confirmation mail");
        }
    }
}

use axum::{extract::State, Json};

use super::serializers::{SignupRequest, SignupResponse, TokenRequest, TokenResponse};
use crate::{
    app_state::AppState,
    error::AppResult,
    framework::{privacy::PUBLIC, Operation, ValidJson},
    infrastructure::middleware::Vc,
};

/// POST /auth/signup
pub async fn signup(
    State(state): State<AppState>,
    vc: Vc,
    ValidJson(request): ValidJson<SignupRequest>,
) -> AppResult<Json<SignupResponse>> {
    PUBLIC.check(&vc, Operation::Create)?;
    Ok(Json(state.auth().signup(request).await?))
}

/// POST /auth/token
pub async fn token(
    State(state): State<AppState>,
    vc: Vc,
    ValidJson(request): ValidJson<TokenRequest>,
) -> AppResult<Json<TokenResponse>> {
    PUBLIC.check(&vc, Operation::Create)?;
    Ok(Json(state.auth().token(request).await?))
}

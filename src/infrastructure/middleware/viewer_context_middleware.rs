// ViewerContext Middleware - authenticates the request and injects the viewer
// into request extensions for handlers

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    app_state::AppState,
    error::{AppError, AppResult},
    infrastructure::viewer::ViewerContext,
};

/// Creates the request-scoped `ViewerContext`. Requests without credentials
/// proceed anonymously; invalid credentials are rejected outright.
pub async fn viewer_context_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let request_id = format!("req-{}", Uuid::new_v4());

    let viewer_context = match extract_bearer_token(request.headers())? {
        Some(token) => {
            let claims = state.tokens.validate_token(&token)?;
            // Usernames can change or be reused; the id is what the token was issued to.
            let user = state
                .users()
                .find_by_id(claims.uid)
                .await?
                .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;
            tracing::debug!(%request_id, username = %user.username, "authenticated request");
            ViewerContext::authenticated_user(user.viewer(), request_id)
        }
        None => ViewerContext::anonymous(request_id),
    };

    request.extensions_mut().insert(Arc::new(viewer_context));
    Ok(next.run(request).await)
}

/// Bearer token from the Authorization header, if one was sent.
fn extract_bearer_token(headers: &HeaderMap) -> AppResult<Option<String>> {
    let Some(auth_header) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid authorization header".to_string()))?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(Some(token.trim().to_string())),
        _ => Err(AppError::Unauthorized(
            "Invalid authorization format".to_string(),
        )),
    }
}

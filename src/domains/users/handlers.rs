// User management endpoints (admin) and the self-service profile endpoint

use axum::{
    extract::{OriginalUri, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use tracing::info;

use super::model::{NewUser, User};
use super::serializers::{UserPatch, UserRequest, UserResponse};
use crate::{
    app_state::AppState,
    error::{AppError, AppResult},
    framework::{
        privacy::{ADMIN_ONLY, AUTHENTICATED},
        Operation, Page, Pager, QueryParams, ValidJson, ValidPath,
    },
    infrastructure::middleware::Vc,
};

#[derive(Debug, Default, Deserialize)]
pub struct UserListQuery {
    pub page: Option<String>,
    pub search: Option<String>,
}

pub async fn list_users(
    State(state): State<AppState>,
    vc: Vc,
    OriginalUri(uri): OriginalUri,
    QueryParams(query): QueryParams<UserListQuery>,
) -> AppResult<Json<Page<UserResponse>>> {
    ADMIN_ONLY.check(&vc, Operation::List)?;

    let pager = Pager::from_query(query.page.as_deref(), state.page_size())?;
    let (users, count) = state.users().list(query.search.as_deref(), &pager).await?;
    pager.ensure_in_range(count)?;

    let results = users.iter().map(UserResponse::from).collect();
    Ok(Json(pager.paginate(&uri, count, results)))
}

pub async fn create_user(
    State(state): State<AppState>,
    vc: Vc,
    ValidJson(request): ValidJson<UserRequest>,
) -> AppResult<impl IntoResponse> {
    ADMIN_ONLY.check(&vc, Operation::Create)?;

    let users = state.users();
    ensure_unique(&state, None, Some(&request.username), Some(&request.email)).await?;

    let user = users
        .create(&NewUser {
            username: request.username,
            email: request.email,
            role: request.role.unwrap_or_default(),
            bio: request.bio.unwrap_or_default(),
            first_name: request.first_name.unwrap_or_default(),
            last_name: request.last_name.unwrap_or_default(),
            confirmation_code: String::new(),
        })
        .await?;

    info!(request_id = %vc.request_id, username = %user.username, "user created by admin");
    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

pub async fn get_user(
    State(state): State<AppState>,
    vc: Vc,
    ValidPath(username): ValidPath<String>,
) -> AppResult<Json<UserResponse>> {
    ADMIN_ONLY.check(&vc, Operation::Retrieve)?;
    let user = load_user(&state, &username).await?;
    Ok(Json(UserResponse::from(&user)))
}

pub async fn update_user(
    State(state): State<AppState>,
    vc: Vc,
    ValidPath(username): ValidPath<String>,
    ValidJson(request): ValidJson<UserRequest>,
) -> AppResult<Json<UserResponse>> {
    ADMIN_ONLY.check(&vc, Operation::Update)?;
    let user = load_user(&state, &username).await?;
    let saved = save_changes(&state, user, request.into()).await?;
    Ok(Json(UserResponse::from(&saved)))
}

pub async fn partial_update_user(
    State(state): State<AppState>,
    vc: Vc,
    ValidPath(username): ValidPath<String>,
    ValidJson(patch): ValidJson<UserPatch>,
) -> AppResult<Json<UserResponse>> {
    ADMIN_ONLY.check(&vc, Operation::PartialUpdate)?;
    let user = load_user(&state, &username).await?;
    let saved = save_changes(&state, user, patch).await?;
    Ok(Json(UserResponse::from(&saved)))
}

pub async fn delete_user(
    State(state): State<AppState>,
    vc: Vc,
    ValidPath(username): ValidPath<String>,
) -> AppResult<StatusCode> {
    ADMIN_ONLY.check(&vc, Operation::Destroy)?;
    if !state.users().delete_by_username(&username).await? {
        return Err(AppError::NotFound(format!("User {} not found", username)));
    }
    info!(request_id = %vc.request_id, %username, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /users/me
pub async fn get_me(State(state): State<AppState>, vc: Vc) -> AppResult<Json<UserResponse>> {
    AUTHENTICATED.check(&vc, Operation::Retrieve)?;
    let user = load_viewer(&state, &vc).await?;
    Ok(Json(UserResponse::from(&user)))
}

/// PATCH /users/me. The caller's role is kept whatever the payload says.
pub async fn update_me(
    State(state): State<AppState>,
    vc: Vc,
    ValidJson(mut patch): ValidJson<UserPatch>,
) -> AppResult<Json<UserResponse>> {
    AUTHENTICATED.check(&vc, Operation::PartialUpdate)?;
    let user = load_viewer(&state, &vc).await?;

    if patch.role.take().is_some_and(|role| role != user.role) {
        info!(request_id = %vc.request_id, username = %user.username, "ignoring role change on own profile");
    }

    let saved = save_changes(&state, user, patch).await?;
    Ok(Json(UserResponse::from(&saved)))
}

async fn load_user(state: &AppState, username: &str) -> AppResult<User> {
    state
        .users()
        .find_by_username(username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", username)))
}

async fn load_viewer(state: &AppState, vc: &Vc) -> AppResult<User> {
    let user_id = vc
        .user_id()
        .ok_or_else(|| AppError::Unauthorized("Authentication credentials were not provided".to_string()))?;
    state
        .users()
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

async fn save_changes(state: &AppState, mut user: User, patch: UserPatch) -> AppResult<User> {
    ensure_unique(
        state,
        Some(user.id),
        patch.username.as_deref(),
        patch.email.as_deref(),
    )
    .await?;
    patch.apply_to(&mut user);
    state.users().save(&user).await
}

/// Username and email must not belong to another account.
async fn ensure_unique(
    state: &AppState,
    current_id: Option<i64>,
    username: Option<&str>,
    email: Option<&str>,
) -> AppResult<()> {
    let users = state.users();
    if let Some(username) = username {
        if let Some(existing) = users.find_by_username(username).await? {
            if Some(existing.id) != current_id {
                return Err(AppError::Conflict(
                    "A user with this username already exists".to_string(),
                ));
            }
        }
    }
    if let Some(email) = email {
        if let Some(existing) = users.find_by_email(email).await? {
            if Some(existing.id) != current_id {
                return Err(AppError::Conflict(
                    "A user with this email already exists".to_string(),
                ));
            }
        }
    }
    Ok(())
}

use axum::{
    extract::{OriginalUri, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::info;

use super::model::Comment;
use super::serializers::{CommentPatch, CommentRequest, CommentResponse};
use crate::{
    app_state::AppState,
    domains::reviews::handlers::{load_review, PageQuery},
    error::{AppError, AppResult},
    framework::{
        privacy::AUTHOR_OR_STAFF_OR_READ_ONLY, Operation, Page, Pager, QueryParams, ValidJson,
        ValidPath,
    },
    infrastructure::middleware::Vc,
};

pub async fn list_comments(
    State(state): State<AppState>,
    vc: Vc,
    OriginalUri(uri): OriginalUri,
    ValidPath((title_id, review_id)): ValidPath<(i64, i64)>,
    QueryParams(query): QueryParams<PageQuery>,
) -> AppResult<Json<Page<CommentResponse>>> {
    AUTHOR_OR_STAFF_OR_READ_ONLY.check(&vc, Operation::List)?;
    load_review(&state, title_id, review_id).await?;

    let pager = Pager::from_query(query.page.as_deref(), state.page_size())?;
    let (comments, count) = state.comments().list(review_id, &pager).await?;
    pager.ensure_in_range(count)?;

    let results = comments.into_iter().map(CommentResponse::from).collect();
    Ok(Json(pager.paginate(&uri, count, results)))
}

pub async fn create_comment(
    State(state): State<AppState>,
    vc: Vc,
    ValidPath((title_id, review_id)): ValidPath<(i64, i64)>,
    ValidJson(request): ValidJson<CommentRequest>,
) -> AppResult<impl IntoResponse> {
    AUTHOR_OR_STAFF_OR_READ_ONLY.check(&vc, Operation::Create)?;
    load_review(&state, title_id, review_id).await?;

    let author_id = vc
        .user_id()
        .ok_or_else(|| AppError::Unauthorized("Authentication credentials were not provided".to_string()))?;

    let comment = state
        .comments()
        .create(review_id, author_id, &request.text)
        .await?;
    info!(request_id = %vc.request_id, review_id, comment_id = comment.id, "comment created");
    Ok((StatusCode::CREATED, Json(CommentResponse::from(comment))))
}

pub async fn get_comment(
    State(state): State<AppState>,
    vc: Vc,
    ValidPath((title_id, review_id, comment_id)): ValidPath<(i64, i64, i64)>,
) -> AppResult<Json<CommentResponse>> {
    AUTHOR_OR_STAFF_OR_READ_ONLY.check(&vc, Operation::Retrieve)?;
    let comment = load_comment(&state, title_id, review_id, comment_id).await?;
    Ok(Json(CommentResponse::from(comment)))
}

pub async fn update_comment(
    State(state): State<AppState>,
    vc: Vc,
    ValidPath((title_id, review_id, comment_id)): ValidPath<(i64, i64, i64)>,
    ValidJson(request): ValidJson<CommentRequest>,
) -> AppResult<Json<CommentResponse>> {
    write_comment(&state, &vc, Operation::Update, (title_id, review_id, comment_id), request.into()).await
}

pub async fn partial_update_comment(
    State(state): State<AppState>,
    vc: Vc,
    ValidPath((title_id, review_id, comment_id)): ValidPath<(i64, i64, i64)>,
    ValidJson(patch): ValidJson<CommentPatch>,
) -> AppResult<Json<CommentResponse>> {
    write_comment(&state, &vc, Operation::PartialUpdate, (title_id, review_id, comment_id), patch).await
}

pub async fn delete_comment(
    State(state): State<AppState>,
    vc: Vc,
    ValidPath((title_id, review_id, comment_id)): ValidPath<(i64, i64, i64)>,
) -> AppResult<StatusCode> {
    AUTHOR_OR_STAFF_OR_READ_ONLY.check(&vc, Operation::Destroy)?;
    let comment = load_comment(&state, title_id, review_id, comment_id).await?;
    AUTHOR_OR_STAFF_OR_READ_ONLY.check_object(&vc, Operation::Destroy, comment.authored.author_id)?;

    state.comments().delete(comment.id).await?;
    info!(request_id = %vc.request_id, review_id, comment_id, "comment deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn write_comment(
    state: &AppState,
    vc: &Vc,
    op: Operation,
    (title_id, review_id, comment_id): (i64, i64, i64),
    patch: CommentPatch,
) -> AppResult<Json<CommentResponse>> {
    AUTHOR_OR_STAFF_OR_READ_ONLY.check(vc, op)?;
    let mut comment = load_comment(state, title_id, review_id, comment_id).await?;
    AUTHOR_OR_STAFF_OR_READ_ONLY.check_object(vc, op, comment.authored.author_id)?;

    if let Some(text) = patch.text {
        comment.authored.text = text;
    }
    let saved = state.comments().update(&comment).await?;
    Ok(Json(CommentResponse::from(saved)))
}

async fn load_comment(
    state: &AppState,
    title_id: i64,
    review_id: i64,
    comment_id: i64,
) -> AppResult<Comment> {
    load_review(state, title_id, review_id).await?;
    state
        .comments()
        .find(review_id, comment_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Comment {} not found", comment_id)))
}

use axum::{
    extract::{OriginalUri, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use tracing::info;

use super::model::Review;
use super::serializers::{ReviewPatch, ReviewRequest, ReviewResponse};
use crate::{
    app_state::AppState,
    error::{AppError, AppResult},
    framework::{
        privacy::AUTHOR_OR_STAFF_OR_READ_ONLY, Operation, Page, Pager, QueryParams, ValidJson,
        ValidPath,
    },
    infrastructure::middleware::Vc,
};

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

pub async fn list_reviews(
    State(state): State<AppState>,
    vc: Vc,
    OriginalUri(uri): OriginalUri,
    ValidPath(title_id): ValidPath<i64>,
    QueryParams(query): QueryParams<PageQuery>,
) -> AppResult<Json<Page<ReviewResponse>>> {
    AUTHOR_OR_STAFF_OR_READ_ONLY.check(&vc, Operation::List)?;
    ensure_title(&state, title_id).await?;

    let pager = Pager::from_query(query.page.as_deref(), state.page_size())?;
    let (reviews, count) = state.reviews().list(title_id, &pager).await?;
    pager.ensure_in_range(count)?;

    let results = reviews.into_iter().map(ReviewResponse::from).collect();
    Ok(Json(pager.paginate(&uri, count, results)))
}

pub async fn create_review(
    State(state): State<AppState>,
    vc: Vc,
    ValidPath(title_id): ValidPath<i64>,
    ValidJson(request): ValidJson<ReviewRequest>,
) -> AppResult<impl IntoResponse> {
    AUTHOR_OR_STAFF_OR_READ_ONLY.check(&vc, Operation::Create)?;
    ensure_title(&state, title_id).await?;

    let author_id = vc
        .user_id()
        .ok_or_else(|| AppError::Unauthorized("Authentication credentials were not provided".to_string()))?;

    let reviews = state.reviews();
    if reviews.exists_for_author(title_id, author_id).await? {
        return Err(AppError::Conflict(
            "You have already reviewed this title".to_string(),
        ));
    }

    let review = reviews
        .create(title_id, author_id, &request.text, request.score)
        .await?;
    info!(request_id = %vc.request_id, title_id, review_id = review.id, "review created");
    Ok((StatusCode::CREATED, Json(ReviewResponse::from(review))))
}

pub async fn get_review(
    State(state): State<AppState>,
    vc: Vc,
    ValidPath((title_id, review_id)): ValidPath<(i64, i64)>,
) -> AppResult<Json<ReviewResponse>> {
    AUTHOR_OR_STAFF_OR_READ_ONLY.check(&vc, Operation::Retrieve)?;
    let review = load_review(&state, title_id, review_id).await?;
    Ok(Json(ReviewResponse::from(review)))
}

pub async fn update_review(
    State(state): State<AppState>,
    vc: Vc,
    ValidPath((title_id, review_id)): ValidPath<(i64, i64)>,
    ValidJson(request): ValidJson<ReviewRequest>,
) -> AppResult<Json<ReviewResponse>> {
    write_review(&state, &vc, Operation::Update, title_id, review_id, request.into()).await
}

pub async fn partial_update_review(
    State(state): State<AppState>,
    vc: Vc,
    ValidPath((title_id, review_id)): ValidPath<(i64, i64)>,
    ValidJson(patch): ValidJson<ReviewPatch>,
) -> AppResult<Json<ReviewResponse>> {
    write_review(&state, &vc, Operation::PartialUpdate, title_id, review_id, patch).await
}

pub async fn delete_review(
    State(state): State<AppState>,
    vc: Vc,
    ValidPath((title_id, review_id)): ValidPath<(i64, i64)>,
) -> AppResult<StatusCode> {
    AUTHOR_OR_STAFF_OR_READ_ONLY.check(&vc, Operation::Destroy)?;
    let review = load_review(&state, title_id, review_id).await?;
    AUTHOR_OR_STAFF_OR_READ_ONLY.check_object(&vc, Operation::Destroy, review.authored.author_id)?;

    state.reviews().delete(review.id).await?;
    info!(request_id = %vc.request_id, title_id, review_id, "review deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn write_review(
    state: &AppState,
    vc: &Vc,
    op: Operation,
    title_id: i64,
    review_id: i64,
    patch: ReviewPatch,
) -> AppResult<Json<ReviewResponse>> {
    AUTHOR_OR_STAFF_OR_READ_ONLY.check(vc, op)?;
    let mut review = load_review(state, title_id, review_id).await?;
    AUTHOR_OR_STAFF_OR_READ_ONLY.check_object(vc, op, review.authored.author_id)?;

    patch.apply_to(&mut review);
    let saved = state.reviews().update(&review).await?;
    Ok(Json(ReviewResponse::from(saved)))
}

pub(crate) async fn ensure_title(state: &AppState, title_id: i64) -> AppResult<()> {
    if state.titles().exists(title_id).await? {
        Ok(())
    } else {
        Err(AppError::NotFound(format!("Title {} not found", title_id)))
    }
}

pub(crate) async fn load_review(state: &AppState, title_id: i64, review_id: i64) -> AppResult<Review> {
    ensure_title(state, title_id).await?;
    state
        .reviews()
        .find(title_id, review_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Review {} not found", review_id)))
}

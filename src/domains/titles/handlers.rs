use axum::{
    extract::{OriginalUri, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use tracing::info;

use super::model::{TitleChanges, TitleDetail, TitleFilter, TitleOrdering};
use super::serializers::{TitlePatch, TitleRequest, TitleView};
use crate::{
    app_state::AppState,
    core::validators::validate_year_not_in_future,
    domains::catalog::CatalogKind,
    error::{AppError, AppResult},
    framework::{
        privacy::ADMIN_OR_READ_ONLY, Operation, Page, Pager, QueryParams, ValidJson, ValidPath,
    },
    infrastructure::middleware::Vc,
};

#[derive(Debug, Default, Deserialize)]
pub struct TitleListQuery {
    pub page: Option<String>,
    pub genre: Option<String>,
    pub category: Option<String>,
    pub year: Option<i32>,
    pub name: Option<String>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

impl TitleListQuery {
    fn filter(self) -> TitleFilter {
        TitleFilter {
            ordering: TitleOrdering::parse(self.ordering.as_deref()),
            genre: self.genre,
            category: self.category,
            year: self.year,
            name: self.name,
            search: self.search,
        }
    }
}

pub async fn list_titles(
    State(state): State<AppState>,
    vc: Vc,
    OriginalUri(uri): OriginalUri,
    QueryParams(query): QueryParams<TitleListQuery>,
) -> AppResult<Json<Page<TitleView>>> {
    ADMIN_OR_READ_ONLY.check(&vc, Operation::List)?;

    let pager = Pager::from_query(query.page.as_deref(), state.page_size())?;
    let (titles, count) = state.titles().list(&query.filter(), &pager).await?;
    pager.ensure_in_range(count)?;

    let results = titles
        .into_iter()
        .map(|title| TitleView::for_operation(Operation::List, title))
        .collect();
    Ok(Json(pager.paginate(&uri, count, results)))
}

pub async fn create_title(
    State(state): State<AppState>,
    vc: Vc,
    ValidJson(request): ValidJson<TitleRequest>,
) -> AppResult<impl IntoResponse> {
    ADMIN_OR_READ_ONLY.check(&vc, Operation::Create)?;

    let base = TitleChanges {
        genre_ids: Some(Vec::new()),
        ..TitleChanges::default()
    };
    let changes = apply_patch(&state, base, request.into()).await?;
    let title = state.titles().create(&changes).await?;

    info!(request_id = %vc.request_id, title_id = title.id, "title created");
    Ok((
        StatusCode::CREATED,
        Json(TitleView::for_operation(Operation::Create, title)),
    ))
}

pub async fn get_title(
    State(state): State<AppState>,
    vc: Vc,
    ValidPath(id): ValidPath<i64>,
) -> AppResult<Json<TitleView>> {
    ADMIN_OR_READ_ONLY.check(&vc, Operation::Retrieve)?;
    let title = load_title(&state, id).await?;
    Ok(Json(TitleView::for_operation(Operation::Retrieve, title)))
}

pub async fn update_title(
    State(state): State<AppState>,
    vc: Vc,
    ValidPath(id): ValidPath<i64>,
    ValidJson(request): ValidJson<TitleRequest>,
) -> AppResult<Json<TitleView>> {
    write_title(&state, &vc, Operation::Update, id, request.into()).await
}

pub async fn partial_update_title(
    State(state): State<AppState>,
    vc: Vc,
    ValidPath(id): ValidPath<i64>,
    ValidJson(patch): ValidJson<TitlePatch>,
) -> AppResult<Json<TitleView>> {
    write_title(&state, &vc, Operation::PartialUpdate, id, patch).await
}

pub async fn delete_title(
    State(state): State<AppState>,
    vc: Vc,
    ValidPath(id): ValidPath<i64>,
) -> AppResult<StatusCode> {
    ADMIN_OR_READ_ONLY.check(&vc, Operation::Destroy)?;
    if !state.titles().delete(id).await? {
        return Err(AppError::NotFound(format!("Title {} not found", id)));
    }
    info!(request_id = %vc.request_id, title_id = id, "title deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn write_title(
    state: &AppState,
    vc: &Vc,
    op: Operation,
    id: i64,
    patch: TitlePatch,
) -> AppResult<Json<TitleView>> {
    ADMIN_OR_READ_ONLY.check(vc, op)?;
    let existing = load_title(state, id).await?;
    let changes = apply_patch(state, existing.to_changes(), patch).await?;
    let title = state.titles().update(id, &changes).await?;
    info!(request_id = %vc.request_id, title_id = id, "title updated");
    Ok(Json(TitleView::for_operation(op, title)))
}

async fn load_title(state: &AppState, id: i64) -> AppResult<TitleDetail> {
    state
        .titles()
        .find(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Title {} not found", id)))
}

/// Overlay the payload on `base`, resolving genre and category slugs.
async fn apply_patch(state: &AppState, mut base: TitleChanges, patch: TitlePatch) -> AppResult<TitleChanges> {
    if let Some(year) = patch.year {
        validate_year_not_in_future(year)?;
        base.year = year;
    }
    if let Some(name) = patch.name {
        base.name = name;
    }
    if let Some(description) = patch.description {
        base.description = description;
    }
    if let Some(category) = patch.category {
        base.category_id = match category {
            Some(slug) => Some(resolve_slug(state, CatalogKind::Category, "category", &slug).await?),
            None => None,
        };
    }
    if let Some(genres) = patch.genre {
        let mut ids = Vec::with_capacity(genres.len());
        for slug in &genres {
            ids.push(resolve_slug(state, CatalogKind::Genre, "genre", slug).await?);
        }
        base.genre_ids = Some(ids);
    }
    Ok(base)
}

async fn resolve_slug(state: &AppState, kind: CatalogKind, field: &str, slug: &str) -> AppResult<i64> {
    state
        .catalog(kind)
        .find_by_slug(slug)
        .await?
        .map(|item| item.id)
        .ok_or_else(|| AppError::field(field, format!("Object with slug={} does not exist.", slug)))
}

// Category and genre endpoints. Both dictionaries share one implementation
// parameterised by `CatalogKind`.

use axum::{
    extract::{OriginalUri, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use tracing::info;

use super::model::{CatalogItem, CatalogKind};
use crate::{
    app_state::AppState,
    domains::shared::NameSlug,
    error::{AppError, AppResult},
    framework::{
        privacy::ADMIN_OR_READ_ONLY, Operation, Page, Pager, QueryParams, ValidJson, ValidPath,
    },
    infrastructure::middleware::Vc,
};

#[derive(Debug, Default, Deserialize)]
pub struct CatalogListQuery {
    pub page: Option<String>,
    pub search: Option<String>,
}

async fn list(
    state: &AppState,
    vc: &Vc,
    kind: CatalogKind,
    uri: &Uri,
    query: CatalogListQuery,
) -> AppResult<Page<CatalogItem>> {
    ADMIN_OR_READ_ONLY.check(vc, Operation::List)?;
    let pager = Pager::from_query(query.page.as_deref(), state.page_size())?;
    let (items, count) = state
        .catalog(kind)
        .list(query.search.as_deref(), &pager)
        .await?;
    pager.ensure_in_range(count)?;
    Ok(pager.paginate(uri, count, items))
}

async fn create(
    state: &AppState,
    vc: &Vc,
    kind: CatalogKind,
    fields: NameSlug,
) -> AppResult<CatalogItem> {
    ADMIN_OR_READ_ONLY.check(vc, Operation::Create)?;
    let item = state.catalog(kind).create(&fields).await?;
    info!(request_id = %vc.request_id, kind = kind.label(), slug = %item.fields.slug, "catalog entry created");
    Ok(item)
}

async fn destroy(state: &AppState, vc: &Vc, kind: CatalogKind, slug: &str) -> AppResult<()> {
    ADMIN_OR_READ_ONLY.check(vc, Operation::Destroy)?;
    if !state.catalog(kind).delete_by_slug(slug).await? {
        return Err(AppError::NotFound(format!("{} {} not found", kind.label(), slug)));
    }
    info!(request_id = %vc.request_id, kind = kind.label(), %slug, "catalog entry deleted");
    Ok(())
}

pub async fn list_categories(
    State(state): State<AppState>,
    vc: Vc,
    OriginalUri(uri): OriginalUri,
    QueryParams(query): QueryParams<CatalogListQuery>,
) -> AppResult<Json<Page<CatalogItem>>> {
    Ok(Json(list(&state, &vc, CatalogKind::Category, &uri, query).await?))
}

pub async fn create_category(
    State(state): State<AppState>,
    vc: Vc,
    ValidJson(fields): ValidJson<NameSlug>,
) -> AppResult<impl IntoResponse> {
    let item = create(&state, &vc, CatalogKind::Category, fields).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn delete_category(
    State(state): State<AppState>,
    vc: Vc,
    ValidPath(slug): ValidPath<String>,
) -> AppResult<StatusCode> {
    destroy(&state, &vc, CatalogKind::Category, &slug).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_genres(
    State(state): State<AppState>,
    vc: Vc,
    OriginalUri(uri): OriginalUri,
    QueryParams(query): QueryParams<CatalogListQuery>,
) -> AppResult<Json<Page<CatalogItem>>> {
    Ok(Json(list(&state, &vc, CatalogKind::Genre, &uri, query).await?))
}

pub async fn create_genre(
    State(state): State<AppState>,
    vc: Vc,
    ValidJson(fields): ValidJson<NameSlug>,
) -> AppResult<impl IntoResponse> {
    let item = create(&state, &vc, CatalogKind::Genre, fields).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn delete_genre(
    State(state): State<AppState>,
    vc: Vc,
    ValidPath(slug): ValidPath<String>,
) -> AppResult<StatusCode> {
    destroy(&state, &vc, CatalogKind::Genre, &slug).await?;
    Ok(StatusCode::NO_CONTENT)
}

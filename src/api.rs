// HTTP surface: every resource endpoint under /api/v1, plus a liveness probe

use axum::{
    extract::State,
    middleware::from_fn_with_state,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    app_state::AppState,
    domains::{auth, catalog, comments, reviews, titles, users},
    error::AppResult,
    infrastructure::middleware::viewer_context_middleware,
};

pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        // Auth
        .route("/auth/signup", post(auth::handlers::signup))
        .route("/auth/token", post(auth::handlers::token))
        // Catalog
        .route(
            "/categories",
            get(catalog::handlers::list_categories).post(catalog::handlers::create_category),
        )
        .route("/categories/{slug}", delete(catalog::handlers::delete_category))
        .route(
            "/genres",
            get(catalog::handlers::list_genres).post(catalog::handlers::create_genre),
        )
        .route("/genres/{slug}", delete(catalog::handlers::delete_genre))
        // Titles
        .route(
            "/titles",
            get(titles::handlers::list_titles).post(titles::handlers::create_title),
        )
        .route(
            "/titles/{title_id}",
            get(titles::handlers::get_title)
                .put(titles::handlers::update_title)
                .patch(titles::handlers::partial_update_title)
                .delete(titles::handlers::delete_title),
        )
        // Reviews
        .route(
            "/titles/{title_id}/reviews",
            get(reviews::handlers::list_reviews).post(reviews::handlers::create_review),
        )
        .route(
            "/titles/{title_id}/reviews/{review_id}",
            get(reviews::handlers::get_review)
                .put(reviews::handlers::update_review)
                .patch(reviews::handlers::partial_update_review)
                .delete(reviews::handlers::delete_review),
        )
        // Comments
        .route(
            "/titles/{title_id}/reviews/{review_id}/comments",
            get(comments::handlers::list_comments).post(comments::handlers::create_comment),
        )
        .route(
            "/titles/{title_id}/reviews/{review_id}/comments/{comment_id}",
            get(comments::handlers::get_comment)
                .put(comments::handlers::update_comment)
                .patch(comments::handlers::partial_update_comment)
                .delete(comments::handlers::delete_comment),
        )
        // Users
        .route(
            "/users",
            get(users::handlers::list_users).post(users::handlers::create_user),
        )
        .route(
            "/users/me",
            get(users::handlers::get_me).patch(users::handlers::update_me),
        )
        .route(
            "/users/{username}",
            get(users::handlers::get_user)
                .put(users::handlers::update_user)
                .patch(users::handlers::partial_update_user)
                .delete(users::handlers::delete_user),
        )
        .route_layer(from_fn_with_state(state.clone(), viewer_context_middleware));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

async fn health_check(State(state): State<AppState>) -> AppResult<Json<Value>> {
    state.db.health_check().await?;
    Ok(Json(json!({ "status": "healthy" })))
}

pub mod auth;
pub mod users;

use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;

use common::types::Health;

use crate::errors::ApiError;
use crate::openapi;
use crate::state::ServerState;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn api_not_found() -> ApiError {
    ApiError::not_found("Not Found.")
}

/// REST API mounted under `/api`. Everything except signup and login sits
/// behind the bearer-token middleware.
pub fn api_router(state: ServerState) -> Router<ServerState> {
    let protected = Router::new()
        .route("/logout", post(auth::logout))
        .route("/user", get(auth::me))
        .route("/users", get(users::index).post(users::store))
        .route("/users/:id", get(users::show).put(users::update).delete(users::destroy))
        .route_layer(middleware::from_fn_with_state(state, auth::require_bearer_token));

    Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .merge(protected)
        .fallback(api_not_found)
}

/// Build the full application router: health, OpenAPI document, the REST API
/// and the SPA with an `index.html` fallback for client-side routes.
pub fn build_router(state: ServerState, cors: CorsLayer, frontend_dir: &str) -> Router {
    let static_dir = ServeDir::new(frontend_dir)
        .fallback(ServeFile::new(format!("{}/index.html", frontend_dir.trim_end_matches('/'))));

    Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi::openapi_json))
        .nest("/api", api_router(state.clone()))
        .fallback_service(static_dir)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 5xx responses
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

use service::pagination::Page;
use service::users::{ListUsersQuery, UserView};
use service::validation::{CreateUserInput, UpdateUserInput};

use crate::errors::ApiError;
use crate::extract::{JsonBody, UserId};
use crate::state::ServerState;

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    params(
        ("search" = Option<String>, Query, description = "Case-insensitive match on name or email"),
        ("page" = Option<u32>, Query, description = "1-based page number"),
        ("per_page" = Option<u32>, Query, description = "Page size, capped by configuration"),
    ),
    responses((status = 200, description = "Paginated users", body = crate::openapi::UserPageDoc), (status = 401, description = "Unauthenticated", body = crate::openapi::MessageDoc))
)]
pub async fn index(
    State(state): State<ServerState>,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<Page<UserView>>, ApiError> {
    Ok(Json(state.users.list(query).await?))
}

#[utoipa::path(
    post,
    path = "/api/users",
    tag = "users",
    request_body = crate::openapi::CreateUserRequest,
    responses((status = 201, description = "Created", body = crate::openapi::UserDoc), (status = 422, description = "Validation failed", body = crate::openapi::ValidationErrorDoc))
)]
pub async fn store(
    State(state): State<ServerState>,
    JsonBody(input): JsonBody<CreateUserInput>,
) -> Result<(StatusCode, Json<UserView>), ApiError> {
    let user = state.users.create(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "users",
    params(("id" = uuid::Uuid, Path, description = "User id")),
    responses((status = 200, description = "User", body = crate::openapi::UserDoc), (status = 404, description = "Not found", body = crate::openapi::MessageDoc))
)]
pub async fn show(State(state): State<ServerState>, UserId(id): UserId) -> Result<Json<UserView>, ApiError> {
    Ok(Json(state.users.get(id).await?))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "users",
    params(("id" = uuid::Uuid, Path, description = "User id")),
    request_body = crate::openapi::UpdateUserRequest,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::UserDoc),
        (status = 404, description = "Not found", body = crate::openapi::MessageDoc),
        (status = 422, description = "Validation failed", body = crate::openapi::ValidationErrorDoc)
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    UserId(id): UserId,
    JsonBody(input): JsonBody<UpdateUserInput>,
) -> Result<Json<UserView>, ApiError> {
    Ok(Json(state.users.update(id, input).await?))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "users",
    params(("id" = uuid::Uuid, Path, description = "User id")),
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not found", body = crate::openapi::MessageDoc))
)]
pub async fn destroy(State(state): State<ServerState>, UserId(id): UserId) -> Result<StatusCode, ApiError> {
    state.users.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

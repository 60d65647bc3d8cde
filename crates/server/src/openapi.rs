use std::collections::BTreeMap;

use axum::Json;
use chrono::{DateTime, Utc};
use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

#[derive(ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Keep the `auth_token` cookie across browser sessions
    pub remember: Option<bool>,
}

#[derive(ToSchema)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: Option<String>,
}

/// Leave both password fields empty to keep the current password.
#[derive(ToSchema)]
pub struct UpdateUserRequest {
    pub name: String,
    pub email: String,
    pub password: Option<String>,
    pub password_confirmation: Option<String>,
}

#[derive(ToSchema)]
pub struct UserDoc {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(ToSchema)]
pub struct AuthSessionDoc {
    pub user: UserDoc,
    /// Bearer token; shown once
    pub token: String,
}

#[derive(ToSchema)]
pub struct PageMetaDoc {
    pub current_page: u64,
    pub per_page: u64,
    pub total: u64,
    pub last_page: u64,
}

#[derive(ToSchema)]
pub struct UserPageDoc {
    pub data: Vec<UserDoc>,
    pub meta: PageMetaDoc,
}

#[derive(ToSchema)]
pub struct MessageDoc { pub message: String }

#[derive(ToSchema)]
pub struct ValidationErrorDoc {
    pub message: String,
    pub errors: BTreeMap<String, Vec<String>>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::signup,
        crate::routes::auth::login,
        crate::routes::auth::logout,
        crate::routes::auth::me,
        crate::routes::users::index,
        crate::routes::users::store,
        crate::routes::users::show,
        crate::routes::users::update,
        crate::routes::users::destroy,
    ),
    components(
        schemas(
            HealthResponse,
            SignupRequest,
            LoginRequest,
            CreateUserRequest,
            UpdateUserRequest,
            UserDoc,
            AuthSessionDoc,
            PageMetaDoc,
            UserPageDoc,
            MessageDoc,
            ValidationErrorDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "users")
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
    Extension, Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::debug;

use service::auth::domain::{AuthContext, AuthSession};
use service::users::UserView;
use service::validation::{LoginInput, SignupInput};

use crate::errors::ApiError;
use crate::extract::JsonBody;
use crate::state::{CookieSettings, ServerState};

pub const AUTH_COOKIE: &str = "auth_token";

/// Plaintext token of the current request, stored next to [`AuthContext`].
#[derive(Clone, Debug)]
pub struct BearerToken(pub String);

fn auth_cookie(token: String, settings: &CookieSettings, remember: bool) -> Cookie<'static> {
    let mut cookie = Cookie::new(AUTH_COOKIE, token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(settings.secure);
    cookie.set_same_site(SameSite::Lax);
    if remember {
        cookie.set_max_age(time::Duration::days(settings.remember_days));
    }
    cookie
}

#[utoipa::path(post, path = "/api/signup", tag = "auth", request_body = crate::openapi::SignupRequest, responses((status = 200, description = "Registered and logged in", body = crate::openapi::AuthSessionDoc), (status = 422, description = "Validation failed", body = crate::openapi::ValidationErrorDoc)))]
pub async fn signup(
    State(state): State<ServerState>,
    jar: CookieJar,
    JsonBody(input): JsonBody<SignupInput>,
) -> Result<(CookieJar, Json<AuthSession>), ApiError> {
    let session = state.auth.signup(input).await?;
    let jar = jar.add(auth_cookie(session.token.clone(), &state.cookies, false));
    Ok((jar, Json(session)))
}

#[utoipa::path(post, path = "/api/login", tag = "auth", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Logged in", body = crate::openapi::AuthSessionDoc), (status = 422, description = "Invalid credentials or payload", body = crate::openapi::MessageDoc)))]
pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    JsonBody(input): JsonBody<LoginInput>,
) -> Result<(CookieJar, Json<AuthSession>), ApiError> {
    let remember = input.remember.unwrap_or(false);
    let session = state.auth.login(input).await?;
    let jar = jar.add(auth_cookie(session.token.clone(), &state.cookies, remember));
    Ok((jar, Json(session)))
}

#[utoipa::path(post, path = "/api/logout", tag = "auth", responses((status = 204, description = "Token revoked"), (status = 401, description = "Unauthenticated", body = crate::openapi::MessageDoc)))]
pub async fn logout(
    State(state): State<ServerState>,
    Extension(BearerToken(token)): Extension<BearerToken>,
    jar: CookieJar,
) -> Result<(CookieJar, StatusCode), ApiError> {
    state.auth.logout(&token).await?;
    let mut removal = Cookie::new(AUTH_COOKIE, "");
    removal.set_path("/");
    removal.make_removal();
    let jar = jar.add(removal);
    Ok((jar, StatusCode::NO_CONTENT))
}

#[utoipa::path(get, path = "/api/user", tag = "auth", responses((status = 200, description = "Current user", body = crate::openapi::UserDoc), (status = 401, description = "Unauthenticated", body = crate::openapi::MessageDoc)))]
pub async fn me(Extension(ctx): Extension<AuthContext>) -> Json<UserView> {
    Json(ctx.user)
}

/// `Authorization: Bearer <token>`, falling back to the `auth_token` cookie.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let from_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|h| {
            let (scheme, token) = h.trim().split_once(' ')?;
            scheme.eq_ignore_ascii_case("bearer").then(|| token.trim().to_string())
        })
        .filter(|t| !t.is_empty());
    from_header.or_else(|| {
        CookieJar::from_headers(headers)
            .get(AUTH_COOKIE)
            .map(|c| c.value().to_string())
            .filter(|t| !t.is_empty())
    })
}

/// Resolve the bearer token and expose [`AuthContext`] and [`BearerToken`]
/// to the handlers; 401 otherwise.
pub async fn require_bearer_token(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(token) = bearer_token(req.headers()) else {
        debug!(path = %req.uri().path(), "missing bearer token");
        return Err(ApiError::unauthenticated());
    };
    let ctx = state.auth.current_user(&token).await?;
    req.extensions_mut().insert(ctx);
    req.extensions_mut().insert(BearerToken(token));
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn header_takes_precedence_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc123"));
        headers.insert(header::COOKIE, HeaderValue::from_static("auth_token=fromcookie"));
        assert_eq!(bearer_token(&headers).as_deref(), Some("abc123"));
    }

    #[test]
    fn cookie_is_used_without_header() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark; auth_token=fromcookie"));
        assert_eq!(bearer_token(&headers).as_deref(), Some("fromcookie"));
    }

    #[test]
    fn other_schemes_and_empty_values_are_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));
        assert_eq!(bearer_token(&headers), None);
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("bearer   "));
        assert_eq!(bearer_token(&headers), None);
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("bearer lower"));
        assert_eq!(bearer_token(&headers).as_deref(), Some("lower"));
    }

    #[test]
    fn remember_sets_max_age() {
        let settings = CookieSettings { secure: true, remember_days: 30 };
        let session = auth_cookie("t".into(), &settings, false);
        assert!(session.max_age().is_none());
        assert_eq!(session.http_only(), Some(true));
        assert_eq!(session.secure(), Some(true));
        let remembered = auth_cookie("t".into(), &settings, true);
        assert_eq!(remembered.max_age(), Some(time::Duration::days(30)));
    }
}

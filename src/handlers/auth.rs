// src/handlers/auth.rs

use axum::{extract::State, Json};
use axum_extra::extract::{
    cookie::{Cookie, SameSite},
    SignedCookieJar,
};
use serde_json::{json, Value};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        extract::{ApiJson, ApiPath},
    },
    config::AppState,
    middleware::{
        auth::{current_principal, SESSION_COOKIE},
        rbac::{AdminOnly, PermAgentsView, RequirePermission, RequireRole},
    },
    models::auth::{LoginPayload, LoginResponse, SessionStatus, UpdateAccessPayload, UserSummary},
};

// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Logged in; session cookie set", body = LoginResponse),
        (status = 400, description = "Malformed credentials"),
        (status = 401, description = "Invalid email or password")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    jar: SignedCookieJar,
    ApiJson(payload): ApiJson<LoginPayload>,
) -> Result<(SignedCookieJar, Json<LoginResponse>), AppError> {
    payload.validate()?;

    let principal = app_state.auth_service.login(&payload.email, &payload.password).await?;
    let session_id = app_state.sessions.create(principal.clone()).await;

    let cookie = Cookie::build((SESSION_COOKIE, session_id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);

    Ok((jar.add(cookie), Json(LoginResponse { success: true, user: principal })))
}

// POST /api/auth/logout
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Auth",
    responses((status = 200, description = "Session destroyed"))
)]
pub async fn logout(State(app_state): State<AppState>, jar: SignedCookieJar) -> (SignedCookieJar, Json<Value>) {
    let session_id = jar
        .get(SESSION_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok());

    if let Some(session_id) = session_id {
        app_state.sessions.destroy(&session_id).await;
    }

    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (jar, Json(json!({ "success": true })))
}

// GET /api/auth/status
#[utoipa::path(
    get,
    path = "/api/auth/status",
    tag = "Auth",
    responses((status = 200, description = "Whether the caller has a session", body = SessionStatus))
)]
pub async fn status(State(app_state): State<AppState>, jar: SignedCookieJar) -> Json<SessionStatus> {
    let user = current_principal(&app_state, &jar).await;
    Json(SessionStatus {
        authenticated: user.is_some(),
        user,
    })
}

// GET /api/auth/users
#[utoipa::path(
    get,
    path = "/api/auth/users",
    tag = "Auth",
    responses(
        (status = 200, description = "All users", body = Vec<UserSummary>),
        (status = 403, description = "Missing agents:view")
    ),
    security(("session_cookie" = []))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermAgentsView>,
) -> Result<Json<Vec<UserSummary>>, AppError> {
    let users = app_state.auth_service.list_users().await?;
    Ok(Json(users))
}

// PUT /api/auth/users/{id}/access
#[utoipa::path(
    put,
    path = "/api/auth/users/{id}/access",
    tag = "Auth",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "Access updated"),
        (status = 403, description = "Admins only"),
        (status = 404, description = "User not found")
    ),
    security(("session_cookie" = []))
)]
pub async fn update_access(
    State(app_state): State<AppState>,
    _role: RequireRole<AdminOnly>,
    ApiPath(user_id): ApiPath<i32>,
    ApiJson(payload): ApiJson<UpdateAccessPayload>,
) -> Result<Json<Value>, AppError> {
    app_state.auth_service.update_access(user_id, &payload).await?;
    Ok(Json(json!({ "message": "User access updated successfully" })))
}

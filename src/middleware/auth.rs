// src/middleware/auth.rs

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::SignedCookieJar;
use uuid::Uuid;

use crate::{common::error::AppError, config::AppState, models::auth::Principal};

/// Name of the signed cookie carrying the session id.
pub const SESSION_COOKIE: &str = "sid";

/// Resolves the session cookie to the principal stored at login.
pub async fn current_principal(state: &AppState, jar: &SignedCookieJar) -> Option<Principal> {
    let cookie = jar.get(SESSION_COOKIE)?;
    let session_id = Uuid::parse_str(cookie.value()).ok()?;
    state.sessions.get(&session_id).await
}

// Guard for the JSON API: no session, no entry
pub async fn api_guard(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let principal = current_principal(&state, &jar)
        .await
        .ok_or(AppError::Unauthenticated)?;

    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

// Guard for HTML pages: anonymous visitors are sent to the login page
pub async fn page_guard(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    match current_principal(&state, &jar).await {
        Some(principal) => {
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
        None => Redirect::to("/login").into_response(),
    }
}

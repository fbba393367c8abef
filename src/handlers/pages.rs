// src/handlers/pages.rs

use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use axum_extra::extract::SignedCookieJar;
use serde_json::json;

use crate::{common::error::AppError, config::AppState, middleware::auth::current_principal};

async fn serve_page(app_state: &AppState, file: &str) -> Result<Html<String>, AppError> {
    let path = app_state.config.public_dir.join(file);

    let html = tokio::fs::read_to_string(&path).await.map_err(|e| {
        tracing::error!(path = %path.display(), error = %e, "page could not be read");
        AppError::NotFound("Page")
    })?;

    Ok(Html(html))
}

// `/` and `/login`: signed-in users go straight to the dashboard
pub async fn login_page(State(app_state): State<AppState>, jar: SignedCookieJar) -> Response {
    if current_principal(&app_state, &jar).await.is_some() {
        return Redirect::to("/dashboard").into_response();
    }
    serve_page(&app_state, "login.html").await.into_response()
}

// The pages below sit behind `page_guard`.

pub async fn dashboard_page(State(app_state): State<AppState>) -> Result<Html<String>, AppError> {
    serve_page(&app_state, "dashboard.html").await
}

pub async fn customers_page(State(app_state): State<AppState>) -> Result<Html<String>, AppError> {
    serve_page(&app_state, "customers.html").await
}

// The id is read client-side from the URL
pub async fn customer_edit_page(State(app_state): State<AppState>) -> Result<Html<String>, AppError> {
    serve_page(&app_state, "customers-edit.html").await
}

pub async fn sales_page(State(app_state): State<AppState>) -> Result<Html<String>, AppError> {
    serve_page(&app_state, "sales.html").await
}

pub async fn new_sale_page(State(app_state): State<AppState>) -> Result<Html<String>, AppError> {
    serve_page(&app_state, "sales-new.html").await
}

pub async fn products_page(State(app_state): State<AppState>) -> Result<Html<String>, AppError> {
    serve_page(&app_state, "products.html").await
}

pub async fn reports_page(State(app_state): State<AppState>) -> Result<Html<String>, AppError> {
    serve_page(&app_state, "reports.html").await
}

pub async fn agents_page(State(app_state): State<AppState>) -> Result<Html<String>, AppError> {
    serve_page(&app_state, "sales-agents.html").await
}

/// Unknown API paths get a JSON 404; anything else lands on the login page.
pub async fn fallback(uri: Uri) -> Response {
    let path = uri.path();
    if path == "/api" || path.starts_with("/api/") {
        return (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" }))).into_response();
    }
    Redirect::to("/login").into_response()
}

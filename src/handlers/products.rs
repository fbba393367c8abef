// src/handlers/products.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        extract::{ApiJson, ApiPath},
    },
    config::AppState,
    middleware::rbac::{PermProductsAdd, PermProductsEdit, PermProductsView, RequirePermission},
    models::product::{Product, ProductPayload},
};

// GET /api/products
#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Products",
    responses((status = 200, description = "Products ordered by name", body = Vec<Product>)),
    security(("session_cookie" = []))
)]
pub async fn list_products(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermProductsView>,
) -> Result<Json<Vec<Product>>, AppError> {
    Ok(Json(app_state.product_service.list().await?))
}

// GET /api/products/{id}
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = "Products",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product", body = Product),
        (status = 404, description = "Product not found")
    ),
    security(("session_cookie" = []))
)]
pub async fn get_product(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermProductsView>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<Product>, AppError> {
    Ok(Json(app_state.product_service.get(id).await?))
}

// POST /api/products
#[utoipa::path(
    post,
    path = "/api/products",
    tag = "Products",
    request_body = ProductPayload,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Invalid data")
    ),
    security(("session_cookie" = []))
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermProductsAdd>,
    ApiJson(payload): ApiJson<ProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let product = app_state.product_service.create(&payload).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

// PUT /api/products/{id}
#[utoipa::path(
    put,
    path = "/api/products/{id}",
    tag = "Products",
    params(("id" = i32, Path, description = "Product id")),
    request_body = ProductPayload,
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 400, description = "Invalid data"),
        (status = 404, description = "Product not found")
    ),
    security(("session_cookie" = []))
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermProductsEdit>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(payload): ApiJson<ProductPayload>,
) -> Result<Json<Product>, AppError> {
    payload.validate()?;

    Ok(Json(app_state.product_service.update(id, &payload).await?))
}

// POST /api/products/{id}/toggle
#[utoipa::path(
    post,
    path = "/api/products/{id}/toggle",
    tag = "Products",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Active flag flipped", body = Product),
        (status = 404, description = "Product not found")
    ),
    security(("session_cookie" = []))
)]
pub async fn toggle_product(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermProductsEdit>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<Product>, AppError> {
    Ok(Json(app_state.product_service.toggle(id).await?))
}

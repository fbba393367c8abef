// src/handlers/customers.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        extract::{ApiJson, ApiPath, ApiQuery},
    },
    config::AppState,
    middleware::rbac::{
        PermCustomersAdd, PermCustomersDelete, PermCustomersEdit, PermCustomersView, RequirePermission,
    },
    models::customer::{Customer, CustomerDetail, CustomerPayload, CustomerQuery},
};

// GET /api/customers
#[utoipa::path(
    get,
    path = "/api/customers",
    tag = "Customers",
    params(CustomerQuery),
    responses((status = 200, description = "Customers, newest first", body = Vec<Customer>)),
    security(("session_cookie" = []))
)]
pub async fn list_customers(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermCustomersView>,
    ApiQuery(query): ApiQuery<CustomerQuery>,
) -> Result<Json<Vec<Customer>>, AppError> {
    let customers = app_state.customer_service.list(query.customer_type).await?;
    Ok(Json(customers))
}

// GET /api/customers/{id}
#[utoipa::path(
    get,
    path = "/api/customers/{id}",
    tag = "Customers",
    params(("id" = i32, Path, description = "Customer id")),
    responses(
        (status = 200, description = "Customer with sales history and summary", body = CustomerDetail),
        (status = 404, description = "Customer not found")
    ),
    security(("session_cookie" = []))
)]
pub async fn get_customer(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermCustomersView>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<CustomerDetail>, AppError> {
    let detail = app_state.customer_service.get(id).await?;
    Ok(Json(detail))
}

// POST /api/customers
#[utoipa::path(
    post,
    path = "/api/customers",
    tag = "Customers",
    request_body = CustomerPayload,
    responses(
        (status = 201, description = "Customer created", body = Customer),
        (status = 400, description = "Invalid data")
    ),
    security(("session_cookie" = []))
)]
pub async fn create_customer(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermCustomersAdd>,
    ApiJson(payload): ApiJson<CustomerPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let customer = app_state.customer_service.create(&payload).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

// PUT /api/customers/{id}
#[utoipa::path(
    put,
    path = "/api/customers/{id}",
    tag = "Customers",
    params(("id" = i32, Path, description = "Customer id")),
    request_body = CustomerPayload,
    responses(
        (status = 200, description = "Customer updated", body = Customer),
        (status = 400, description = "Invalid data"),
        (status = 404, description = "Customer not found")
    ),
    security(("session_cookie" = []))
)]
pub async fn update_customer(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermCustomersEdit>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(payload): ApiJson<CustomerPayload>,
) -> Result<Json<Customer>, AppError> {
    payload.validate()?;

    let customer = app_state.customer_service.update(id, &payload).await?;
    Ok(Json(customer))
}

// DELETE /api/customers/{id}
#[utoipa::path(
    delete,
    path = "/api/customers/{id}",
    tag = "Customers",
    params(("id" = i32, Path, description = "Customer id")),
    responses(
        (status = 200, description = "Customer deleted"),
        (status = 404, description = "Customer not found"),
        (status = 409, description = "Customer has sales")
    ),
    security(("session_cookie" = []))
)]
pub async fn delete_customer(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermCustomersDelete>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, AppError> {
    app_state.customer_service.delete(id).await?;
    Ok(Json(json!({ "message": "Customer deleted successfully" })))
}

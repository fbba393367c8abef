// src/handlers/sales.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        extract::{ApiJson, ApiPath},
    },
    config::AppState,
    middleware::rbac::{
        FinanceRoles, PermSalesAdd, PermSalesDelete, PermSalesEdit, PermSalesView, RequirePermission,
        RequireRole,
    },
    models::sale::{PaymentStatusPayload, SalePayload, SaleRecord},
};

// GET /api/sales
#[utoipa::path(
    get,
    path = "/api/sales",
    tag = "Sales",
    responses((status = 200, description = "Sales, newest first", body = Vec<SaleRecord>)),
    security(("session_cookie" = []))
)]
pub async fn list_sales(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermSalesView>,
) -> Result<Json<Vec<SaleRecord>>, AppError> {
    Ok(Json(app_state.sale_service.list().await?))
}

// GET /api/sales/{id}
#[utoipa::path(
    get,
    path = "/api/sales/{id}",
    tag = "Sales",
    params(("id" = i32, Path, description = "Sale id")),
    responses(
        (status = 200, description = "Sale", body = SaleRecord),
        (status = 404, description = "Sale not found")
    ),
    security(("session_cookie" = []))
)]
pub async fn get_sale(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermSalesView>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<SaleRecord>, AppError> {
    Ok(Json(app_state.sale_service.get(id).await?))
}

// POST /api/sales
#[utoipa::path(
    post,
    path = "/api/sales",
    tag = "Sales",
    request_body = SalePayload,
    responses(
        (status = 201, description = "Sale recorded; totals computed server-side", body = SaleRecord),
        (status = 400, description = "Invalid data"),
        (status = 404, description = "Referenced customer, product or agent not found")
    ),
    security(("session_cookie" = []))
)]
pub async fn create_sale(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermSalesAdd>,
    ApiJson(payload): ApiJson<SalePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let sale = app_state.sale_service.create(&payload).await?;
    Ok((StatusCode::CREATED, Json(sale)))
}

// PUT /api/sales/{id}
#[utoipa::path(
    put,
    path = "/api/sales/{id}",
    tag = "Sales",
    params(("id" = i32, Path, description = "Sale id")),
    request_body = SalePayload,
    responses(
        (status = 200, description = "Sale updated", body = SaleRecord),
        (status = 400, description = "Invalid data"),
        (status = 404, description = "Sale or referenced entity not found")
    ),
    security(("session_cookie" = []))
)]
pub async fn update_sale(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermSalesEdit>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(payload): ApiJson<SalePayload>,
) -> Result<Json<SaleRecord>, AppError> {
    payload.validate()?;

    Ok(Json(app_state.sale_service.update(id, &payload).await?))
}

// DELETE /api/sales/{id}
#[utoipa::path(
    delete,
    path = "/api/sales/{id}",
    tag = "Sales",
    params(("id" = i32, Path, description = "Sale id")),
    responses(
        (status = 200, description = "Sale deleted"),
        (status = 404, description = "Sale not found")
    ),
    security(("session_cookie" = []))
)]
pub async fn delete_sale(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermSalesDelete>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, AppError> {
    app_state.sale_service.delete(id).await?;
    Ok(Json(json!({ "message": "Sale deleted successfully" })))
}

// PATCH /api/sales/{id}/payment
#[utoipa::path(
    patch,
    path = "/api/sales/{id}/payment",
    tag = "Sales",
    params(("id" = i32, Path, description = "Sale id")),
    request_body = PaymentStatusPayload,
    responses(
        (status = 200, description = "Payment status updated", body = SaleRecord),
        (status = 403, description = "Admins and accountants only"),
        (status = 404, description = "Sale not found")
    ),
    security(("session_cookie" = []))
)]
pub async fn update_payment_status(
    State(app_state): State<AppState>,
    _role: RequireRole<FinanceRoles>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(payload): ApiJson<PaymentStatusPayload>,
) -> Result<Json<SaleRecord>, AppError> {
    let sale = app_state
        .sale_service
        .set_payment_status(id, payload.payment_status)
        .await?;
    Ok(Json(sale))
}

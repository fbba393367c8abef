// src/handlers/dashboard.rs

use axum::{extract::State, Json};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::rbac::{PermDashboardView, RequirePermission},
    models::dashboard::DashboardSummary,
};

// GET /api/dashboard
#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = "Dashboard",
    responses((status = 200, description = "Today's figures and breakdowns", body = DashboardSummary)),
    security(("session_cookie" = []))
)]
pub async fn get_dashboard(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermDashboardView>,
) -> Result<Json<DashboardSummary>, AppError> {
    Ok(Json(app_state.dashboard_service.summary().await?))
}

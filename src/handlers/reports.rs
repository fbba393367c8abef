// src/handlers/reports.rs

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    common::{error::AppError, extract::ApiQuery},
    config::AppState,
    middleware::rbac::{FinanceRoles, PermReportsView, RequirePermission, RequireRole},
    models::report::{ReportFilter, ReportRow, ReportSummary},
    services::report_service::ExportFile,
};

impl IntoResponse for ExportFile {
    fn into_response(self) -> Response {
        let disposition = format!("attachment; filename=\"{}\"", self.file_name);
        (
            [
                (header::CONTENT_TYPE, self.content_type.to_string()),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            self.bytes,
        )
            .into_response()
    }
}

// GET /api/reports
#[utoipa::path(
    get,
    path = "/api/reports",
    tag = "Reports",
    params(ReportFilter),
    responses((status = 200, description = "Aggregated summary for the filter", body = ReportSummary)),
    security(("session_cookie" = []))
)]
pub async fn get_summary(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermReportsView>,
    ApiQuery(filter): ApiQuery<ReportFilter>,
) -> Result<Json<ReportSummary>, AppError> {
    Ok(Json(app_state.report_service.summary(&filter).await?))
}

// GET /api/reports/sales
#[utoipa::path(
    get,
    path = "/api/reports/sales",
    tag = "Reports",
    params(ReportFilter),
    responses((status = 200, description = "Filtered sale rows, newest first", body = Vec<ReportRow>)),
    security(("session_cookie" = []))
)]
pub async fn get_rows(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermReportsView>,
    ApiQuery(filter): ApiQuery<ReportFilter>,
) -> Result<Json<Vec<ReportRow>>, AppError> {
    Ok(Json(app_state.report_service.rows(&filter).await?))
}

// GET /api/reports/export/excel
#[utoipa::path(
    get,
    path = "/api/reports/export/excel",
    tag = "Reports",
    params(ReportFilter),
    responses(
        (status = 200, description = "sales-report.xlsx attachment"),
        (status = 403, description = "Admins and accountants only")
    ),
    security(("session_cookie" = []))
)]
pub async fn export_excel(
    State(app_state): State<AppState>,
    _role: RequireRole<FinanceRoles>,
    ApiQuery(filter): ApiQuery<ReportFilter>,
) -> Result<ExportFile, AppError> {
    let writer = app_state.report_service.spreadsheet_writer();
    app_state.report_service.export(&filter, writer).await
}

// GET /api/reports/export/pdf
#[utoipa::path(
    get,
    path = "/api/reports/export/pdf",
    tag = "Reports",
    params(ReportFilter),
    responses(
        (status = 200, description = "sales-report.pdf attachment"),
        (status = 403, description = "Admins and accountants only")
    ),
    security(("session_cookie" = []))
)]
pub async fn export_pdf(
    State(app_state): State<AppState>,
    _role: RequireRole<FinanceRoles>,
    ApiQuery(filter): ApiQuery<ReportFilter>,
) -> Result<ExportFile, AppError> {
    let writer = app_state.report_service.pdf_writer();
    app_state.report_service.export(&filter, writer).await
}

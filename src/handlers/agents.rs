// src/handlers/agents.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        extract::{ApiJson, ApiPath, ApiQuery},
    },
    config::AppState,
    middleware::rbac::{PermAgentsAdd, PermAgentsEdit, PermAgentsView, RequirePermission},
    models::agent::{
        AgentQuery, CreateAgentPayload, OnboardPayload, OnboardResponse, SalesAgent, UpdateAgentPayload,
    },
};

// GET /api/sales-agents
#[utoipa::path(
    get,
    path = "/api/sales-agents",
    tag = "Sales Agents",
    params(AgentQuery),
    responses((status = 200, description = "Active agents; B2B/B2C filters include Both", body = Vec<SalesAgent>)),
    security(("session_cookie" = []))
)]
pub async fn list_agents(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermAgentsView>,
    ApiQuery(query): ApiQuery<AgentQuery>,
) -> Result<Json<Vec<SalesAgent>>, AppError> {
    Ok(Json(app_state.agent_service.list(query.agent_type).await?))
}

// POST /api/sales-agents
#[utoipa::path(
    post,
    path = "/api/sales-agents",
    tag = "Sales Agents",
    request_body = CreateAgentPayload,
    responses(
        (status = 201, description = "Existing user linked as agent", body = SalesAgent),
        (status = 404, description = "User not found"),
        (status = 409, description = "User is already an agent")
    ),
    security(("session_cookie" = []))
)]
pub async fn create_agent(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermAgentsAdd>,
    ApiJson(payload): ApiJson<CreateAgentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let agent = app_state.agent_service.link_user(&payload).await?;
    Ok((StatusCode::CREATED, Json(agent)))
}

// POST /api/sales-agents/onboard
//
// Body: name, email, password (optional), agent_type, commission_rate,
// access_level and, for `custom`, flat `<resource>_<action>` flags.
#[utoipa::path(
    post,
    path = "/api/sales-agents/onboard",
    tag = "Sales Agents",
    responses(
        (status = 201, description = "User and agent created together", body = OnboardResponse),
        (status = 400, description = "Invalid data"),
        (status = 409, description = "Email already exists")
    ),
    security(("session_cookie" = []))
)]
pub async fn onboard_agent(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermAgentsAdd>,
    ApiJson(payload): ApiJson<OnboardPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let onboarded = app_state.agent_service.onboard(&payload).await?;
    Ok((StatusCode::CREATED, Json(onboarded)))
}

// PUT /api/sales-agents/{id}
#[utoipa::path(
    put,
    path = "/api/sales-agents/{id}",
    tag = "Sales Agents",
    params(("id" = i32, Path, description = "Agent id")),
    request_body = UpdateAgentPayload,
    responses(
        (status = 200, description = "Agent updated", body = SalesAgent),
        (status = 404, description = "Sales agent not found")
    ),
    security(("session_cookie" = []))
)]
pub async fn update_agent(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermAgentsEdit>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(payload): ApiJson<UpdateAgentPayload>,
) -> Result<Json<SalesAgent>, AppError> {
    payload.validate()?;

    Ok(Json(app_state.agent_service.update(id, &payload).await?))
}

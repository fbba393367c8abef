// src/handlers/locations.rs

use axum::{extract::State, Json};

use crate::{
    common::{error::AppError, extract::ApiPath},
    config::AppState,
    models::location::{City, Province, Town},
};

// Reference data; the API guard is the only requirement.

#[utoipa::path(
    get,
    path = "/api/locations/provinces",
    tag = "Locations",
    responses((status = 200, description = "Provinces by name", body = Vec<Province>)),
    security(("session_cookie" = []))
)]
pub async fn list_provinces(State(app_state): State<AppState>) -> Result<Json<Vec<Province>>, AppError> {
    Ok(Json(app_state.location_repo.provinces().await?))
}

#[utoipa::path(
    get,
    path = "/api/locations/cities/{province_id}",
    tag = "Locations",
    params(("province_id" = i32, Path, description = "Province id")),
    responses((status = 200, description = "Cities of the province by name", body = Vec<City>)),
    security(("session_cookie" = []))
)]
pub async fn list_cities(
    State(app_state): State<AppState>,
    ApiPath(province_id): ApiPath<i32>,
) -> Result<Json<Vec<City>>, AppError> {
    Ok(Json(app_state.location_repo.cities(province_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/locations/towns/{city_id}",
    tag = "Locations",
    params(("city_id" = i32, Path, description = "City id")),
    responses((status = 200, description = "Towns of the city by name", body = Vec<Town>)),
    security(("session_cookie" = []))
)]
pub async fn list_towns(
    State(app_state): State<AppState>,
    ApiPath(city_id): ApiPath<i32>,
) -> Result<Json<Vec<Town>>, AppError> {
    Ok(Json(app_state.location_repo.towns(city_id).await?))
}

use axum::{extract::State, http::StatusCode, Json};
use tracing::info;

use crate::api::{
    error::{ApiError, ApiJson, ApiPath},
    state::AppState,
};
use crate::storage::models::{PlanetDetail, PlanetInsert, PlanetSummary};

const NOT_FOUND: ApiError = ApiError::NotFound("Planet");

pub async fn list_planets(
    State(state): State<AppState>,
) -> Result<Json<Vec<PlanetSummary>>, ApiError> {
    Ok(Json(state.planets.list().await?))
}

pub async fn create_planet(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<PlanetInsert>,
) -> Result<(StatusCode, Json<PlanetDetail>), ApiError> {
    let created = state.planets.create(&payload).await?;
    info!("新增行星 {} ({})", created.id, created.name);

    let detail = state.planets.get_detail(created.id).await?.ok_or(NOT_FOUND)?;
    Ok((StatusCode::CREATED, Json(detail)))
}

pub async fn get_planet(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<PlanetDetail>, ApiError> {
    let detail = state.planets.get_detail(id).await?.ok_or(NOT_FOUND)?;
    Ok(Json(detail))
}

pub async fn delete_planet(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    if !state.planets.delete(id).await? {
        return Err(NOT_FOUND);
    }
    info!("刪除行星 {}", id);
    Ok(StatusCode::NO_CONTENT)
}

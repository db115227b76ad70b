use axum::{extract::State, http::StatusCode, Json};
use tracing::info;

use crate::api::{
    error::{ApiError, ApiJson, ApiPath},
    state::AppState,
};
use crate::storage::models::{ScientistDetail, ScientistInsert, ScientistPatch, ScientistSummary};

const NOT_FOUND: ApiError = ApiError::NotFound("Scientist");

async fn load_detail(state: &AppState, id: i64) -> Result<ScientistDetail, ApiError> {
    state.scientists.get_detail(id).await?.ok_or(NOT_FOUND)
}

pub async fn list_scientists(
    State(state): State<AppState>,
) -> Result<Json<Vec<ScientistSummary>>, ApiError> {
    Ok(Json(state.scientists.list().await?))
}

pub async fn create_scientist(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ScientistInsert>,
) -> Result<(StatusCode, Json<ScientistDetail>), ApiError> {
    let created = state.scientists.create(&payload).await?;
    info!("新增科學家 {} ({})", created.id, created.name);

    let detail = load_detail(&state, created.id).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

pub async fn get_scientist(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ScientistDetail>, ApiError> {
    Ok(Json(load_detail(&state, id).await?))
}

pub async fn update_scientist(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(patch): ApiJson<ScientistPatch>,
) -> Result<(StatusCode, Json<ScientistDetail>), ApiError> {
    state.scientists.update(id, &patch).await?;
    let detail = load_detail(&state, id).await?;
    Ok((StatusCode::ACCEPTED, Json(detail)))
}

pub async fn delete_scientist(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    if !state.scientists.delete(id).await? {
        return Err(NOT_FOUND);
    }
    info!("刪除科學家 {}", id);
    Ok(StatusCode::NO_CONTENT)
}

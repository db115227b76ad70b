use axum::{extract::State, http::StatusCode, Json};
use tracing::info;

use crate::api::{
    error::{ApiError, ApiJson},
    state::AppState,
};
use crate::storage::models::{Mission, MissionDetail, MissionInsert};

pub async fn list_missions(State(state): State<AppState>) -> Result<Json<Vec<Mission>>, ApiError> {
    Ok(Json(state.missions.list().await?))
}

pub async fn create_mission(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<MissionInsert>,
) -> Result<(StatusCode, Json<MissionDetail>), ApiError> {
    let detail = state.missions.create(&payload).await?;
    info!(
        "新增任務 {}: 科學家 {} -> 行星 {}",
        detail.mission.id, detail.scientist.name, detail.planet.name
    );

    Ok((StatusCode::CREATED, Json(detail)))
}

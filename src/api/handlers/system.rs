use axum::{extract::State, response::Html, Json};
use serde::Serialize;

use crate::api::state::AppState;
use crate::storage::health_check;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    version: String,
    database: String,
}

pub async fn index() -> Html<&'static str> {
    Html("<h1>Home Page</h1>")
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = if health_check(&state.pool).await {
        "ok"
    } else {
        "unavailable"
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
    })
}

// src/api/routes/system.rs
use axum::{routing::get, Router};

use crate::api::{handlers::system, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(system::index))
        .route("/system/health", get(system::health))
}

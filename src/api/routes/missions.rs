use axum::{routing::get, Router};

use crate::api::{handlers::missions, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/missions",
        get(missions::list_missions).post(missions::create_mission),
    )
}

use axum::{routing::get, Router};

use crate::api::{handlers::planets, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/planets", get(planets::list_planets).post(planets::create_planet))
        .route(
            "/planets/{id}",
            get(planets::get_planet).delete(planets::delete_planet),
        )
}

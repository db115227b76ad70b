use axum::Router;

use crate::api::state::AppState;

pub mod missions;
pub mod planets;
pub mod scientists;
pub mod system;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(system::routes())
        .merge(scientists::routes())
        .merge(planets::routes())
        .merge(missions::routes())
}

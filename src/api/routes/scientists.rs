use axum::{routing::get, Router};

use crate::api::{handlers::scientists, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/scientists",
            get(scientists::list_scientists).post(scientists::create_scientist),
        )
        .route(
            "/scientists/{id}",
            get(scientists::get_scientist)
                .patch(scientists::update_scientist)
                .delete(scientists::delete_scientist),
        )
}

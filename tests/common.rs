#![allow(dead_code)]

use axum_test::TestServer;
use mission_control::{
    api::{AppState, RestApi},
    config::{DatabaseConfig, RestApiConfig, ServerConfig},
    storage,
};
use serde_json::{json, Value};
use sqlx::SqlitePool;

/// 建立已套用遷移的記憶體資料庫
pub async fn setup_test_db() -> SqlitePool {
    storage::connect(&DatabaseConfig::in_memory())
        .await
        .expect("Failed to create in-memory database")
}

/// 以記憶體資料庫建立完整的 HTTP 測試伺服器
pub async fn setup_test_server() -> (TestServer, SqlitePool) {
    let pool = setup_test_db().await;
    let api = RestApi::new(
        ServerConfig::default(),
        RestApiConfig::default(),
        AppState::new(pool.clone()),
    );
    let server = TestServer::new(api.build_app()).expect("Failed to start test server");
    (server, pool)
}

pub async fn create_scientist(server: &TestServer, name: &str, field_of_study: &str) -> Value {
    server
        .post("/scientists")
        .json(&json!({
            "name": name,
            "field_of_study": field_of_study,
            "avatar": format!("https://robohash.org/{}", name.len()),
        }))
        .await
        .json::<Value>()
}

pub async fn create_planet(server: &TestServer, name: &str) -> Value {
    server
        .post("/planets")
        .json(&json!({
            "name": name,
            "distance_from_earth": "12 light years",
            "nearest_star": "Tau Ceti",
            "image": "planet.png",
        }))
        .await
        .json::<Value>()
}

pub async fn create_mission(server: &TestServer, name: &str, scientist_id: i64, planet_id: i64) -> Value {
    server
        .post("/missions")
        .json(&json!({
            "name": name,
            "scientist_id": scientist_id,
            "planet_id": planet_id,
        }))
        .await
        .json::<Value>()
}

use sqlx::SqlitePool;
use std::sync::Arc;

use crate::storage::repository::{
    MissionRepository, PlanetRepository, ScientistRepository, SqliteMissionRepository,
    SqlitePlanetRepository, SqliteScientistRepository,
};

/// 路由共享狀態
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub scientists: Arc<dyn ScientistRepository>,
    pub planets: Arc<dyn PlanetRepository>,
    pub missions: Arc<dyn MissionRepository>,
}

impl AppState {
    /// 以同一個連接池建立所有儲存庫
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            scientists: Arc::new(SqliteScientistRepository::new(pool.clone())),
            planets: Arc::new(SqlitePlanetRepository::new(pool.clone())),
            missions: Arc::new(SqliteMissionRepository::new(pool.clone())),
            pool,
        }
    }
}

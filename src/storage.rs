pub mod database;
pub mod migrations;
pub mod models;
pub mod repository;

use anyhow::Result;
use sqlx::SqlitePool;

use crate::config::DatabaseConfig;

// 只匯出必要的數據庫功能
pub use database::{health_check, init_db_pool};

// 匯出主要的模型
pub use models::{Mission, Planet, Scientist};

// 匯出主要的倉儲接口和實現
pub use repository::{
    MissionRepository, PlanetRepository, RepositoryError, RepositoryResult, ScientistRepository,
    SqliteMissionRepository, SqlitePlanetRepository, SqliteScientistRepository,
};

// 匯出遷移功能
pub use migrations::{migration_status, run_migrations, MigrationStatus};

/// 建立連接池並套用所有遷移
pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool> {
    let pool = init_db_pool(config).await?;
    run_migrations(&pool).await?;
    Ok(pool)
}

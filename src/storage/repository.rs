use sqlx::{Sqlite, SqlitePool, Transaction};
use thiserror::Error;

use crate::validation::{RecordValidationError, ValidationErrors};

// 重新導出子模塊
pub mod mission;
pub mod planet;
pub mod scientist;

// 重新導出常用類型
pub use mission::{MissionRepository, SqliteMissionRepository};
pub use planet::{PlanetRepository, SqlitePlanetRepository};
pub use scientist::{ScientistRepository, SqliteScientistRepository};

/// 儲存庫錯誤
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// 記錄不存在
    #[error("{entity} not found: ID {id}")]
    NotFound { entity: &'static str, id: i64 },

    /// 寫入前驗證失敗
    #[error("驗證失敗: {0}")]
    Validation(#[from] ValidationErrors),

    /// 資料庫錯誤
    #[error("資料庫錯誤: {0}")]
    Database(#[from] sqlx::Error),
}

impl RepositoryError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }
}

impl From<RecordValidationError> for RepositoryError {
    fn from(error: RecordValidationError) -> Self {
        Self::Validation(error.into())
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// 是否為唯一約束衝突
///
/// 交易內的預先檢查之外，並行寫入仍可能撞上資料庫的唯一索引。
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation())
}

/// 開啟寫入交易
///
/// 交易內先檢查再寫入，開始時即以 `BEGIN IMMEDIATE` 取得寫鎖，
/// 其他寫入者在 `busy_timeout` 內排隊等待。
pub(crate) async fn begin_write(
    pool: &SqlitePool,
) -> Result<Transaction<'static, Sqlite>, sqlx::Error> {
    pool.begin_with("BEGIN IMMEDIATE").await
}

#[cfg(test)]
pub(crate) mod test_support {
    use sqlx::SqlitePool;
    use std::path::Path;

    use crate::config::DatabaseConfig;
    use crate::storage::{database::init_db_pool, migrations::run_migrations};

    /// 已套用遷移的記憶體資料庫
    pub async fn migrated_pool() -> SqlitePool {
        let pool = init_db_pool(&DatabaseConfig::in_memory())
            .await
            .expect("Failed to create in-memory pool");
        run_migrations(&pool).await.expect("Failed to run migrations");
        pool
    }

    /// 以預設連接池設定開啟 `dir` 下的檔案資料庫並套用遷移
    pub async fn migrated_file_pool(dir: &Path) -> SqlitePool {
        let config = DatabaseConfig {
            url: format!("sqlite://{}", dir.join("missions.db").display()),
            ..DatabaseConfig::default()
        };
        let pool = init_db_pool(&config)
            .await
            .expect("Failed to create file pool");
        run_migrations(&pool).await.expect("Failed to run migrations");
        pool
    }
}

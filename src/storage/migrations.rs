use anyhow::Result;
use sqlx::{migrate::Migrator, SqlitePool};
use tracing::info;

// 靜態嵌入遷移目錄（此目錄應放在專案根目錄）
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// 單一遷移的狀態
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStatus {
    pub version: i64,
    pub description: String,
    pub applied: bool,
}

/// 執行數據庫遷移
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    info!("開始執行數據庫遷移...");

    // 使用 sqlx::migrate!() 自動執行所有嵌入的 SQL 檔案
    MIGRATOR.run(pool).await?;
    info!("SQLx 遷移完成");
    Ok(())
}

/// 列出所有嵌入遷移及其是否已套用
pub async fn migration_status(pool: &SqlitePool) -> Result<Vec<MigrationStatus>> {
    let has_table: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = '_sqlx_migrations'",
    )
    .fetch_one(pool)
    .await?;

    let applied: Vec<i64> = if has_table > 0 {
        sqlx::query_scalar("SELECT version FROM _sqlx_migrations WHERE success = 1")
            .fetch_all(pool)
            .await?
    } else {
        Vec::new()
    };

    Ok(MIGRATOR
        .iter()
        .map(|migration| MigrationStatus {
            version: migration.version,
            description: migration.description.to_string(),
            applied: applied.contains(&migration.version),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::storage::database::init_db_pool;

    #[tokio::test]
    async fn test_status_before_and_after_run() {
        let pool = init_db_pool(&DatabaseConfig::in_memory()).await.unwrap();

        let pending = migration_status(&pool).await.unwrap();
        assert_eq!(pending.len(), 3);
        assert!(pending.iter().all(|status| !status.applied));

        run_migrations(&pool).await.unwrap();

        let applied = migration_status(&pool).await.unwrap();
        assert!(applied.iter().all(|status| status.applied));
        assert_eq!(applied[0].description, "create scientists");
    }

    #[tokio::test]
    async fn test_run_is_idempotent() {
        let pool = init_db_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        run_migrations(&pool).await.unwrap();
    }
}

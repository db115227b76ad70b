use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::ConnectOptions;
use std::str::FromStr;
use tracing::{debug, info};

use crate::config::DatabaseConfig;

/// 初始化資料庫連接池
///
/// 記憶體資料庫每個連接都是獨立的資料庫，因此固定只保留一個永不回收的連接。
/// 檔案資料庫使用 WAL，寫入者之間以 `busy_timeout` 排隊。
pub async fn init_db_pool(config: &DatabaseConfig) -> Result<SqlitePool> {
    let mut options = SqliteConnectOptions::from_str(&config.url)
        .with_context(|| format!("無效的資料庫連接字串: {}", config.url))?
        .create_if_missing(config.create_if_missing)
        .foreign_keys(true)
        .busy_timeout(config.busy_timeout())
        .disable_statement_logging();
    if !config.is_in_memory() {
        options = options.journal_mode(SqliteJournalMode::Wal);
    }

    let pool_options = if config.is_in_memory() {
        debug!("使用記憶體資料庫，連接池固定為單一連接");
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .max_lifetime(config.max_lifetime())
            .idle_timeout(config.idle_timeout())
    };

    let pool = pool_options
        .acquire_timeout(config.acquire_timeout())
        .connect_with(options)
        .await
        .with_context(|| format!("無法連接資料庫: {}", config.url))?;

    // 測試連接
    sqlx::query("SELECT 1").execute(&pool).await?;
    info!("資料庫連接池已建立: {}", config.url);

    Ok(pool)
}

/// 健康檢查
pub async fn health_check(pool: &SqlitePool) -> bool {
    sqlx::query("SELECT 1").fetch_one(pool).await.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_pool_is_healthy() {
        let pool = init_db_pool(&DatabaseConfig::in_memory()).await.unwrap();
        assert!(health_check(&pool).await);

        let foreign_keys: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(foreign_keys, 1);
    }

    #[tokio::test]
    async fn test_invalid_url_is_rejected() {
        let config = DatabaseConfig {
            url: "sqlite:///nonexistent-dir/never/app.db".to_string(),
            create_if_missing: false,
            acquire_timeout_secs: 1,
            ..DatabaseConfig::default()
        };
        assert!(init_db_pool(&config).await.is_err());
    }

    #[tokio::test]
    async fn test_file_pool_uses_wal() {
        let dir = tempfile::tempdir().unwrap();
        let config = DatabaseConfig {
            url: format!("sqlite://{}", dir.path().join("wal.db").display()),
            ..DatabaseConfig::default()
        };
        let pool = init_db_pool(&config).await.unwrap();

        let journal_mode: String = sqlx::query_scalar("PRAGMA journal_mode")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(journal_mode.to_lowercase(), "wal");

        let busy_timeout: i64 = sqlx::query_scalar("PRAGMA busy_timeout")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(busy_timeout, 5000);
    }

    #[tokio::test]
    async fn test_closed_pool_is_unhealthy() {
        let pool = init_db_pool(&DatabaseConfig::in_memory()).await.unwrap();
        pool.close().await;
        assert!(!health_check(&pool).await);
    }
}

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::validation::{ValidationError, ValidationUtils, Validator};

/// 應用程序配置結構
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    pub database: DatabaseConfig,
    pub log: LogConfig,
    pub server: ServerConfig,
    pub rest_api: RestApiConfig,
}

impl Validator for ApplicationConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        // 驗證各個部分的配置
        self.database.validate()?;
        self.log.validate()?;
        self.server.validate()?;
        self.rest_api.validate()?;

        Ok(())
    }
}

/// 數據庫配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite 連接字串，例如 `sqlite://mission_control.db` 或 `sqlite::memory:`
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub max_lifetime_secs: u64,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    /// 等待其他連接釋放寫鎖的秒數
    pub busy_timeout_secs: u64,
    /// 資料庫檔案不存在時是否自動建立
    pub create_if_missing: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://mission_control.db".to_string(),
            max_connections: 5,
            min_connections: 1,
            max_lifetime_secs: 1800,
            acquire_timeout_secs: 5,
            idle_timeout_secs: 600,
            busy_timeout_secs: 5,
            create_if_missing: true,
        }
    }
}

impl Validator for DatabaseConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        ValidationUtils::not_empty(&self.url, "database.url")?;
        if !self.url.starts_with("sqlite:") {
            return Err(ValidationError::InvalidValue(format!(
                "database.url 必須是 sqlite 連接字串: {}",
                self.url
            )));
        }
        ValidationUtils::in_range(self.min_connections, 0, 100, "database.min_connections")?;
        ValidationUtils::in_range(
            self.max_connections,
            self.min_connections.max(1),
            100,
            "database.max_connections",
        )?;
        ValidationUtils::in_range(self.acquire_timeout_secs, 1, 300, "database.acquire_timeout_secs")?;
        ValidationUtils::in_range(self.busy_timeout_secs, 1, 300, "database.busy_timeout_secs")?;

        Ok(())
    }
}

impl DatabaseConfig {
    /// 記憶體資料庫 (每個連接各自獨立，連接池只能有一個連接)
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            ..Self::default()
        }
    }

    /// 是否為記憶體資料庫
    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }

    /// 獲取最大生命週期持續時間
    pub fn max_lifetime(&self) -> Duration {
        Duration::from_secs(self.max_lifetime_secs)
    }

    /// 獲取獲取連接超時持續時間
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    /// 寫鎖等待時間
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_secs(self.busy_timeout_secs)
    }

    /// 獲取閒置超時持續時間
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }
}

/// 日誌配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub format: String,
    /// 設定後額外輸出每日輪替的日誌檔
    pub directory: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            directory: None,
        }
    }
}

impl Validator for LogConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        // 驗證日誌級別
        ValidationUtils::one_of(
            &self.level.to_lowercase(),
            &["trace", "debug", "info", "warn", "error"],
            "log.level",
        )?;

        // 驗證日誌格式
        ValidationUtils::one_of(&self.format.to_lowercase(), &["pretty", "json"], "log.format")?;

        if let Some(directory) = &self.directory {
            ValidationUtils::not_empty(directory, "log.directory")?;
        }

        Ok(())
    }
}

/// 伺服器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout: u64,
    pub enable_compression: bool,
    pub enable_cors: bool,
    pub cors_allowed_origins: Vec<String>,
    /// 收到關閉訊號後等待進行中請求的最長秒數
    pub shutdown_grace_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5555,
            request_timeout: 30,
            enable_compression: true,
            enable_cors: true,
            cors_allowed_origins: vec!["*".to_string()],
            shutdown_grace_secs: 10,
        }
    }
}

impl Validator for ServerConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        // 驗證服務器配置
        ValidationUtils::not_empty(&self.host, "server.host")?;
        ValidationUtils::in_range(self.port, 1, 65535, "server.port")?;
        ValidationUtils::in_range(self.request_timeout, 1, 600, "server.request_timeout")?;

        // CORS設定驗證
        if self.enable_cors && self.cors_allowed_origins.is_empty() {
            return Err(ValidationError::InvalidValue(
                "啟用CORS但未指定允許的來源".to_string(),
            ));
        }

        Ok(())
    }
}

impl ServerConfig {
    /// 請求超時持續時間
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// 是否允許所有 CORS 來源
    pub fn cors_allow_all(&self) -> bool {
        self.cors_allowed_origins.iter().any(|origin| origin == "*")
    }
}

/// REST API 配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RestApiConfig {
    /// 路由前綴，空字串表示掛載在根路徑
    pub base_path: String,
}

impl Validator for RestApiConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        ValidationUtils::path_prefix(&self.base_path, "rest_api.base_path")
    }
}

use config::ConfigError;
use once_cell::sync::OnceCell;
use tracing::{debug, warn};

use crate::config::loader::{ConfigLoader, Environment};
use crate::config::types::ApplicationConfig;
use crate::config::validation::Validator;

// 全局配置實例
static CONFIG: OnceCell<ApplicationConfig> = OnceCell::new();

/// 獲取應用程序配置實例
///
/// 尚未初始化且無法載入時退回預設配置。
pub fn get_config() -> &'static ApplicationConfig {
    CONFIG.get_or_init(|| {
        ApplicationConfig::load_from_env().unwrap_or_else(|err| {
            warn!("無法加載應用程序配置，使用預設值: {}", err);
            ApplicationConfig::default()
        })
    })
}

/// 初始化配置（在應用程序啟動時調用）
pub fn init_config() -> Result<&'static ApplicationConfig, ConfigError> {
    let app_config = ApplicationConfig::load_from_env()?;

    // 嘗試初始化全局配置
    if CONFIG.set(app_config).is_err() {
        warn!("配置已經被初始化，跳過重複初始化");
    } else {
        debug!("配置初始化成功，環境：{:?}", Environment::from_env());
    }

    Ok(get_config())
}

/// ApplicationConfig 加載方法實現
impl ApplicationConfig {
    /// 從環境變數指定的環境加載配置
    pub fn load_from_env() -> Result<Self, ConfigError> {
        let env = Environment::from_env();
        debug!("從環境加載配置: {:?}", env);
        Self::load(env)
    }

    /// 從指定環境加載配置
    pub fn load(env: Environment) -> Result<Self, ConfigError> {
        let config_source = ConfigLoader::load(env)?;
        Self::from_source(config_source)
    }

    /// 反序列化並驗證已構建的配置來源
    pub fn from_source(config_source: config::Config) -> Result<Self, ConfigError> {
        let app_config: ApplicationConfig = config_source.try_deserialize()?;

        // 驗證失敗只記錄警告，由呼叫端決定是否中止
        if let Err(err) = app_config.validate() {
            warn!("配置驗證失敗: {}", err);
        } else {
            debug!("配置驗證通過");
        }

        Ok(app_config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;

    #[test]
    #[serial]
    fn test_environment_configuration() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("test.toml"),
            r#"
[database]
url = "sqlite::memory:"
max_connections = 1

[log]
level = "debug"

[server]
port = 3001
"#,
        )
        .unwrap();

        let source = ConfigLoader::load_from_dir(Environment::Test, dir.path()).unwrap();
        let config = ApplicationConfig::from_source(source).unwrap();

        assert_eq!(config.server.port, 3001);
        assert_eq!(config.log.level, "debug");
        assert!(config.database.is_in_memory());
        assert_eq!(config.rest_api.base_path, "");
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let source = ConfigLoader::load_from_dir(Environment::Production, dir.path()).unwrap();
        let config = ApplicationConfig::from_source(source).unwrap();

        assert_eq!(config.server.port, 5555);
        assert_eq!(config.database.url, "sqlite://mission_control.db");
    }
}

use config::{Config, ConfigError, Environment as ConfigEnvironment, File};
use std::env;
use std::path::{Path, PathBuf};

/// 環境類型枚舉
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl Environment {
    /// 從環境變數取得當前環境設定
    pub fn from_env() -> Self {
        match env::var("MISSION_ENV")
            .unwrap_or_else(|_| "development".into())
            .to_lowercase()
            .as_str()
        {
            "production" => Environment::Production,
            "test" => Environment::Test,
            _ => Environment::Development,
        }
    }

    /// 轉換為配置文件名
    pub fn as_filename(&self) -> &'static str {
        match self {
            Environment::Development => "development.toml",
            Environment::Test => "test.toml",
            Environment::Production => "production.toml",
        }
    }
}

/// 配置加載器，負責根據環境加載適當的配置
pub struct ConfigLoader;

impl ConfigLoader {
    /// 配置目錄，可由 `CONFIG_DIR` 覆寫
    pub fn config_dir() -> PathBuf {
        PathBuf::from(env::var("CONFIG_DIR").unwrap_or_else(|_| "config".into()))
    }

    /// 載入指定環境的配置
    pub fn load(env: Environment) -> Result<Config, ConfigError> {
        Self::load_from_dir(env, Self::config_dir())
    }

    /// 從指定目錄載入環境配置
    ///
    /// 配置文件不存在時使用內建預設值，環境變數 `MISSION__<SECTION>__<KEY>`
    /// 的優先級高於文件配置。
    pub fn load_from_dir(env: Environment, dir: impl AsRef<Path>) -> Result<Config, ConfigError> {
        let config_path = dir.as_ref().join(env.as_filename());

        Config::builder()
            .add_source(File::from(config_path).required(false))
            .add_source(
                ConfigEnvironment::with_prefix("MISSION")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
    }
}

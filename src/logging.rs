//! 日誌系統初始化
//!
//! 終端輸出依 `log.format` 選擇 pretty 或 json，設定 `log.directory` 時
//! 額外寫入每日輪替的日誌檔。`RUST_LOG` 存在時優先於配置中的級別。

use anyhow::{anyhow, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

use crate::config::LogConfig;

/// 日誌檔名前綴
const LOG_FILE_PREFIX: &str = "mission_control.log";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// 初始化全局日誌
///
/// 回傳的 [`WorkerGuard`] 必須存活到程序結束，否則檔案中尾端的日誌會遺失。
pub fn init_logging(config: &LogConfig) -> Result<Option<WorkerGuard>> {
    let filter = build_filter(config)?;

    let mut layers: Vec<BoxedLayer> = Vec::new();
    let console = if is_json(config) {
        fmt::layer().json().with_target(true).boxed()
    } else {
        fmt::layer().with_target(true).boxed()
    };
    layers.push(console);

    let guard = match &config.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file_layer = if is_json(config) {
                fmt::layer().json().with_writer(writer).with_ansi(false).boxed()
            } else {
                fmt::layer().with_writer(writer).with_ansi(false).boxed()
            };
            layers.push(file_layer);
            Some(guard)
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| anyhow!("設置日誌系統失敗: {}", e))?;

    tracing::info!(
        level = %config.level,
        format = %config.format,
        "日誌系統初始化完成"
    );
    Ok(guard)
}

fn is_json(config: &LogConfig) -> bool {
    config.format.eq_ignore_ascii_case("json")
}

/// 配置中的預設過濾規則，sqlx 的查詢日誌只保留警告以上
fn default_directives(config: &LogConfig) -> String {
    format!("{},sqlx=warn", config.level.to_lowercase())
}

fn build_filter(config: &LogConfig) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(default_directives(config))
            .map_err(|e| anyhow!("無效的日誌級別 {}: {}", config.level, e)),
    }
}

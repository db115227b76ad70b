use anyhow::{Context, Result};
use mission_control::config::{self, validate_config};
use mission_control::logging::init_logging;
use mission_control::server::ServerBuilder;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化配置
    let app_config = config::init_config().context("無法載入配置")?;
    validate_config(app_config).context("配置驗證失敗")?;

    // 初始化日誌系統，guard 需存活到程序結束
    let _log_guard = init_logging(&app_config.log)?;

    let server = ServerBuilder::new()
        .with_config(app_config.clone())
        .build()
        .await
        .context("伺服器初始化失敗")?;

    info!(
        "伺服器初始化完成，監聽 {}:{}",
        app_config.server.host, app_config.server.port
    );

    server
        .run(shutdown_signal())
        .await
        .context("伺服器運行失敗")?;

    Ok(())
}

/// 等待 Ctrl-C
async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("接收到關閉信號，正在退出..."),
        Err(err) => error!("無法監聽關閉信號: {}", err),
    }
}

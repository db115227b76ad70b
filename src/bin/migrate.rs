use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mission_control::config::{self, DatabaseConfig};
use mission_control::{seed, storage};
use tracing::info;
use tracing_subscriber::fmt::format::FmtSpan;

#[derive(Parser)]
#[command(name = "migrate", about = "mission_control 數據庫遷移工具")]
struct Cli {
    /// 覆寫配置中的資料庫連接字串
    #[arg(long, global = true)]
    url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 運行所有未應用的遷移
    Run,

    /// 檢查遷移狀態
    Status,

    /// 套用遷移後清空並載入範例資料
    Seed,
}

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日誌系統
    tracing_subscriber::fmt()
        .with_env_filter("mission_control=info,migrate=info")
        .with_span_events(FmtSpan::CLOSE)
        .init();

    // 解析命令行參數
    let cli = Cli::parse();

    let app_config = config::init_config().context("無法載入配置")?;
    let database = match cli.url {
        Some(url) => DatabaseConfig {
            url,
            ..app_config.database.clone()
        },
        None => app_config.database.clone(),
    };

    let pool = storage::init_db_pool(&database)
        .await
        .context("無法初始化資料庫連接池")?;

    // 執行命令
    match cli.command {
        Commands::Run => {
            info!("開始運行資料庫遷移: {}", database.url);
            storage::run_migrations(&pool)
                .await
                .context("資料庫遷移執行失敗")?;
            info!("資料庫遷移完成！");
        }
        Commands::Status => {
            let statuses = storage::migration_status(&pool)
                .await
                .context("無法讀取遷移狀態")?;
            for status in &statuses {
                let mark = if status.applied { "applied" } else { "pending" };
                println!("{:>16}  {:<8} {}", status.version, mark, status.description);
            }
            let pending = statuses.iter().filter(|status| !status.applied).count();
            info!("共 {} 個遷移，{} 個尚未套用", statuses.len(), pending);
        }
        Commands::Seed => {
            storage::run_migrations(&pool)
                .await
                .context("資料庫遷移執行失敗")?;
            let summary = seed::seed(&pool).await.context("範例資料載入失敗")?;
            info!(
                "已載入 {} 位科學家、{} 顆行星、{} 個任務",
                summary.scientists, summary.planets, summary.missions
            );
        }
    }

    pool.close().await;
    Ok(())
}

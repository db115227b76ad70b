use sqlx::SqlitePool;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{watch, RwLock};
use tracing::{info, warn};

use crate::api::{AppState, RestApi};
use crate::config::{self, validate_config, ApplicationConfig};
use crate::server::{ServerError, ServerResult, ServerState};
use crate::storage;

/// 伺服器構建器
#[derive(Default)]
pub struct ServerBuilder {
    config: Option<ApplicationConfig>,
    pool: Option<SqlitePool>,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定配置，未指定時使用全局配置
    pub fn with_config(mut self, config: ApplicationConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// 使用既有的連接池，不再依配置建立
    pub fn with_pool(mut self, pool: SqlitePool) -> Self {
        self.pool = Some(pool);
        self
    }

    /// 驗證配置、準備資料庫並組裝 HTTP 服務
    pub async fn build(self) -> ServerResult<Server> {
        let config = match self.config {
            Some(config) => config,
            None => config::get_config().clone(),
        };
        validate_config(&config)?;

        let pool = match self.pool {
            Some(pool) => {
                storage::run_migrations(&pool)
                    .await
                    .map_err(|e| ServerError::Initialization(format!("資料庫遷移失敗: {:#}", e)))?;
                pool
            }
            None => storage::connect(&config.database)
                .await
                .map_err(|e| ServerError::Initialization(format!("無法連接資料庫: {:#}", e)))?,
        };

        let rest_api = RestApi::new(
            config.server.clone(),
            config.rest_api.clone(),
            AppState::new(pool.clone()),
        );

        Ok(Server {
            state: Arc::new(RwLock::new(ServerState::Initializing)),
            shutdown_grace: Duration::from_secs(config.server.shutdown_grace_secs),
            pool,
            rest_api,
        })
    }
}

/// 伺服器實例
pub struct Server {
    /// 伺服器狀態
    state: Arc<RwLock<ServerState>>,
    /// 收到關閉訊號後等待請求完成的上限
    shutdown_grace: Duration,
    pool: SqlitePool,
    rest_api: RestApi,
}

impl std::fmt::Debug for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server")
            .field("shutdown_grace", &self.shutdown_grace)
            .finish_non_exhaustive()
    }
}

impl Server {
    /// 目前狀態
    pub async fn state(&self) -> ServerState {
        *self.state.read().await
    }

    /// 狀態句柄，`run` 取得所有權後仍可觀察
    pub fn state_handle(&self) -> Arc<RwLock<ServerState>> {
        self.state.clone()
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// 綁定配置中的地址並運行直到 `shutdown` 完成
    pub async fn run<F>(self, shutdown: F) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self
            .rest_api
            .addr()
            .map_err(|e| ServerError::Initialization(format!("無效的監聽地址: {}", e)))?;
        let listener = TcpListener::bind(addr).await?;
        self.run_on(listener, shutdown).await
    }

    /// 在既有的監聽器上運行
    pub async fn run_on<F>(self, listener: TcpListener, shutdown: F) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let Server {
            state,
            shutdown_grace,
            pool,
            rest_api,
        } = self;

        let local_addr = listener.local_addr()?;
        *state.write().await = ServerState::Running;
        info!("伺服器已啟動，監聽 {}", local_addr);

        let (signal_tx, mut signal_rx) = watch::channel(false);
        let shutdown_state = state.clone();
        let graceful = async move {
            shutdown.await;
            info!("接收到關閉訊號，等待進行中的請求完成...");
            *shutdown_state.write().await = ServerState::ShuttingDown;
            let _ = signal_tx.send(true);
        };

        let serve = rest_api.serve(listener, graceful);
        tokio::pin!(serve);

        // 關閉訊號之後最多再等 shutdown_grace
        let grace_expired = async {
            if signal_rx.changed().await.is_ok() {
                tokio::time::sleep(shutdown_grace).await;
            } else {
                std::future::pending::<()>().await;
            }
        };

        let result = tokio::select! {
            result = &mut serve => result.map_err(|e| ServerError::Runtime(e.to_string())),
            _ = grace_expired => {
                warn!("等待請求完成超時 ({:?})，強制關閉", shutdown_grace);
                Ok(())
            }
        };

        pool.close().await;
        *state.write().await = ServerState::Stopped;
        info!("伺服器已關閉");

        result
    }
}

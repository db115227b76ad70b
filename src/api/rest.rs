// src/api/rest.rs
use anyhow::Result;
use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{info, warn};

use super::{routes::api_routes, state::AppState};
use crate::config::{RestApiConfig, ServerConfig};

pub struct RestApi {
    server_config: ServerConfig,
    api_config: RestApiConfig,
    state: AppState,
}

impl RestApi {
    pub fn new(server_config: ServerConfig, api_config: RestApiConfig, state: AppState) -> Self {
        Self {
            server_config,
            api_config,
            state,
        }
    }

    /// 監聽地址
    pub fn addr(&self) -> Result<SocketAddr> {
        Ok(SocketAddr::from((
            self.server_config.host.parse::<std::net::IpAddr>()?,
            self.server_config.port,
        )))
    }

    /// 綁定配置中的地址並服務直到 `shutdown` 完成
    pub async fn start<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.addr()?;
        info!("Starting REST API server on {}", addr);

        let listener = TcpListener::bind(addr).await?;
        self.serve(listener, shutdown).await
    }

    /// 在既有的監聽器上服務
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.build_app();
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;
        Ok(())
    }

    /// 建立含所有中間件的路由
    pub fn build_app(&self) -> Router {
        let api_router = api_routes();

        // 空前綴直接合併，其餘掛載在前綴之下
        let router = if self.api_config.base_path.is_empty() {
            Router::new().merge(api_router)
        } else {
            Router::new().nest(&self.api_config.base_path, api_router)
        };

        // 建立應用並逐層添加中間件
        let mut app = router
            .with_state(self.state.clone())
            // 超時設置
            .layer(TimeoutLayer::new(self.server_config.request_timeout()));

        // 壓縮
        if self.server_config.enable_compression {
            app = app.layer(CompressionLayer::new());
        }

        // CORS
        if self.server_config.enable_cors {
            app = app.layer(self.build_cors_layer());
        }

        // 追蹤層
        app.layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(true))
                .on_response(DefaultOnResponse::new().include_headers(true)),
        )
    }

    fn build_cors_layer(&self) -> CorsLayer {
        let cors = CorsLayer::new()
            .allow_methods(vec![
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
            ])
            .allow_headers(vec![header::CONTENT_TYPE, header::ACCEPT]);

        // 根據配置設置允許的來源
        if self.server_config.cors_allow_all() {
            return cors.allow_origin(Any);
        }

        let origins = self
            .server_config
            .cors_allowed_origins
            .iter()
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!("忽略無效的 CORS 來源: {}", origin);
                    None
                }
            })
            .collect::<Vec<_>>();
        cors.allow_origin(AllowOrigin::list(origins))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::storage;
    use axum_test::TestServer;

    async fn rest_api(base_path: &str) -> RestApi {
        let pool = storage::connect(&DatabaseConfig::in_memory()).await.unwrap();
        RestApi::new(
            ServerConfig::default(),
            RestApiConfig {
                base_path: base_path.to_string(),
            },
            AppState::new(pool),
        )
    }

    #[tokio::test]
    async fn test_routes_mounted_at_root() {
        let server = TestServer::new(rest_api("").await.build_app()).unwrap();

        let response = server.get("/").await;
        response.assert_status_ok();
        response.assert_text("<h1>Home Page</h1>");

        server.get("/scientists").await.assert_status_ok();
    }

    #[tokio::test]
    async fn test_routes_nested_under_base_path() {
        let server = TestServer::new(rest_api("/api").await.build_app()).unwrap();

        server.get("/api/planets").await.assert_status_ok();
        server.get("/planets").await.assert_status_not_found();
    }

    #[tokio::test]
    async fn test_health_reports_database() {
        let server = TestServer::new(rest_api("").await.build_app()).unwrap();

        let health: serde_json::Value = server.get("/system/health").await.json();
        assert_eq!(health["status"], "ok");
        assert_eq!(health["database"], "ok");
    }

    #[tokio::test]
    async fn test_invalid_host_is_rejected() {
        let mut api = rest_api("").await;
        api.server_config.host = "not-an-ip".to_string();
        assert!(api.addr().is_err());
    }
}

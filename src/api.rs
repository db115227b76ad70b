// api.rs - API服務模組，宣告子模組
//
// API服務模組提供外部接口，使用戶能夠與系統交互，實現：
// - 科學家、行星與任務的 RESTful 接口
// - 統一的 JSON 錯誤回應
// - API路由和處理器

/// 錯誤回應與 JSON 提取器
pub mod error;
/// API處理器模組
pub mod handlers;
/// REST API實現
pub mod rest;
/// API路由定義
pub mod routes;
/// 路由共享狀態
pub mod state;

pub use error::{ApiError, ApiJson, ApiPath};
pub use rest::RestApi;
pub use state::AppState;

// 模組定義
pub mod api;
pub mod config;
pub mod logging;
pub mod seed;
pub mod server;
pub mod storage;
pub mod validation;

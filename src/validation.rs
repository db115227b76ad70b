//! 記錄驗證模組
//!
//! 在寫入資料庫前檢查科學家、行星與任務的欄位。
//!
//! # 規則
//!
//! - 科學家必須有名稱與研究領域，名稱不可重複
//! - 行星必須有名稱
//! - 任務必須有名稱、科學家與行星，同一位科學家不可重複前往同一行星
//!
//! 唯一性與外鍵存在性需要查詢資料庫，由 `storage::repository` 在交易中檢查，
//! 並以同一套 [`RecordValidationError`] 回報。

pub mod error;
pub mod rules;
pub mod traits;

// 重新導出常用類型
pub use error::{RecordValidationError, ValidationErrors, ValidationResult};
pub use rules::{MissionValidator, PlanetValidator, ScientistValidator};
pub use traits::RecordValidator;

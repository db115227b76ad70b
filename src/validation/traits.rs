use super::error::{ValidationErrors, ValidationResult};

/// 記錄驗證器特徵
///
/// 只負責欄位層級的檢查；需要查詢資料庫的規則 (唯一性、外鍵存在)
/// 由儲存庫在寫入交易中補上。
pub trait RecordValidator<T> {
    /// 將發現的錯誤加入 `errors`
    fn collect(&self, record: &T, errors: &mut ValidationErrors);

    /// 驗證單筆記錄
    fn validate(&self, record: &T) -> ValidationResult<()> {
        let mut errors = ValidationErrors::new();
        self.collect(record, &mut errors);
        errors.into_result()
    }
}

/// 空白字串視為缺值
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

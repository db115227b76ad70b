use std::fmt;
use thiserror::Error;

/// 記錄驗證錯誤
///
/// 顯示文字即為回傳給 API 呼叫端的訊息。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordValidationError {
    #[error("{entity} must have a {field}.")]
    MissingField {
        entity: &'static str,
        field: &'static str,
    },

    #[error("{entity}'s {field} must be unique.")]
    NotUnique {
        entity: &'static str,
        field: &'static str,
    },

    #[error("Scientists cannot join the same mission twice.")]
    DuplicatePairing { scientist_id: i64, planet_id: i64 },
}

impl RecordValidationError {
    pub fn missing(entity: &'static str, field: &'static str) -> Self {
        Self::MissingField { entity, field }
    }

    pub fn not_unique(entity: &'static str, field: &'static str) -> Self {
        Self::NotUnique { entity, field }
    }
}

/// 單筆記錄收集到的所有驗證錯誤
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<RecordValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: RecordValidationError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn contains(&self, error: &RecordValidationError) -> bool {
        self.errors.contains(error)
    }

    /// 轉換為訊息列表
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// 沒有錯誤時回傳 `Ok(())`
    pub fn into_result(self) -> ValidationResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<RecordValidationError> for ValidationErrors {
    fn from(error: RecordValidationError) -> Self {
        Self { errors: vec![error] }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.messages().join(" "))
    }
}

impl std::error::Error for ValidationErrors {}

pub type ValidationResult<T> = Result<T, ValidationErrors>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            RecordValidationError::missing("Scientist", "field of study").to_string(),
            "Scientist must have a field of study."
        );
        assert_eq!(
            RecordValidationError::not_unique("Scientist", "name").to_string(),
            "Scientist's name must be unique."
        );
        assert_eq!(
            RecordValidationError::DuplicatePairing { scientist_id: 1, planet_id: 2 }.to_string(),
            "Scientists cannot join the same mission twice."
        );
    }

    #[test]
    fn test_into_result() {
        assert!(ValidationErrors::new().into_result().is_ok());

        let mut errors = ValidationErrors::new();
        errors.push(RecordValidationError::missing("Mission", "name"));
        errors.push(RecordValidationError::missing("Mission", "planet"));

        let err = errors.into_result().unwrap_err();
        assert_eq!(err.len(), 2);
        assert_eq!(err.to_string(), "Mission must have a name. Mission must have a planet.");
    }
}

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        FromRequest, FromRequestParts, Path,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::storage::repository::RepositoryError;
use crate::validation::ValidationErrors;

/// API 錯誤
#[derive(Debug, Error)]
pub enum ApiError {
    /// 資源不存在
    #[error("{0} not found")]
    NotFound(&'static str),

    /// 寫入的記錄未通過驗證
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    /// 請求內容無法解析
    #[error("invalid request body: {0}")]
    BadRequest(String),

    /// 內部錯誤，細節只寫入日誌
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::FORBIDDEN,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, .. } => ApiError::NotFound(entity),
            RepositoryError::Validation(errors) => ApiError::Validation(errors),
            RepositoryError::Database(err) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        // 無法解析的 ID 不可能對應任何記錄
        tracing::debug!("無效的路徑參數: {}", rejection.body_text());
        ApiError::NotFound("Resource")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::NotFound(entity) => json!({ "error": format!("{} not found", entity) }),
            ApiError::Validation(errors) => json!({ "errors": errors.messages() }),
            ApiError::BadRequest(message) => json!({ "errors": [message] }),
            ApiError::Internal(message) => {
                tracing::error!("請求處理失敗: {}", message);
                json!({ "error": "Internal server error" })
            }
        };

        (status, Json(body)).into_response()
    }
}

/// JSON 請求體，解析失敗時回傳 [`ApiError::BadRequest`]
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// 路徑參數，解析失敗時回傳 JSON 格式的 404
#[derive(Debug, FromRequestParts)]
#[from_request(via(Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::RecordValidationError;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_not_found_response() {
        let err: ApiError = RepositoryError::not_found("Scientist", 3).into();
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Scientist not found" })
        );
    }

    #[tokio::test]
    async fn test_validation_response() {
        let err: ApiError =
            RepositoryError::from(RecordValidationError::missing("Mission", "name")).into();
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            body_json(response).await,
            json!({ "errors": ["Mission must have a name."] })
        );
    }

    #[tokio::test]
    async fn test_internal_error_hides_details() {
        let err: ApiError = RepositoryError::Database(sqlx::Error::PoolTimedOut).into();
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Internal server error" })
        );
    }
}

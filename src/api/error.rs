use std::any::Any;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::utils::error::FinderError;

pub const INTERNAL_ERROR_MESSAGE: &str = "An internal server error occurred.";

/// 處理器層級的錯誤，輸出為 `{ "error": "..." }`
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 查詢參數無法使用
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// 其他錯誤；細節只寫入日誌，不回傳給呼叫端
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AppResult<T> = Result<T, ApiError>;

impl From<FinderError> for ApiError {
    fn from(err: FinderError) -> Self {
        if err.is_client_error() {
            ApiError::BadRequest(err.to_string())
        } else {
            ApiError::Internal(err.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_MESSAGE.to_string(),
                )
            }
        };

        (status, axum::Json(json!({ "error": message }))).into_response()
    }
}

/// 給 `CatchPanicLayer` 用：處理器 panic 時回傳 JSON 500
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    ApiError::Internal(format!("handler panicked: {detail}")).into_response()
}

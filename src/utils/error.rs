use thiserror::Error;

#[derive(Error, Debug)]
pub enum FinderError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Upstream {endpoint} responded with status {status}")]
    UpstreamStatus { endpoint: String, status: u16 },

    #[error("Unexpected upstream response: {message}")]
    UnexpectedResponse { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("{message}")]
    InvalidQuery { field: String, message: String },
}

impl FinderError {
    /// 是否為呼叫端輸入錯誤 (對應 HTTP 400)
    pub fn is_client_error(&self) -> bool {
        matches!(self, FinderError::InvalidQuery { .. })
    }

    /// 是否為設定檔相關錯誤
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            FinderError::ConfigValidationError { .. }
                | FinderError::InvalidConfigValueError { .. }
                | FinderError::MissingConfigError { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, FinderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_query_displays_bare_message() {
        let err = FinderError::InvalidQuery {
            field: "date".to_string(),
            message: "Please provide a date in YYYYMMDD format.".to_string(),
        };
        assert_eq!(err.to_string(), "Please provide a date in YYYYMMDD format.");
        assert!(err.is_client_error());
        assert!(!err.is_config_error());
    }

    #[test]
    fn test_config_errors_are_classified() {
        let err = FinderError::MissingConfigError {
            field: "vendor.base_url".to_string(),
        };
        assert!(err.is_config_error());
        assert!(!err.is_client_error());
    }
}

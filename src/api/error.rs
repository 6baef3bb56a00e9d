// ==========================================
// 清货清单分析 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换配置错误为用户可读的消息
// 说明: 单个清单文件的失败不属于 API 错误，已在汇总状态中体现
// ==========================================

use crate::config::ConfigError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::InvalidValue { .. } => ApiError::InvalidInput(err.to_string()),
            other => ApiError::ConfigError(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::InternalError(format!("serialization failed: {}", err))
    }
}

/// API层Result类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_conversion() {
        let err: ApiError = ConfigError::InvalidValue {
            key: "resale_pct".to_string(),
            value: "5".to_string(),
            message: "must be between 10 and 100".to_string(),
        }
        .into();
        assert!(matches!(err, ApiError::InvalidInput(_)));
        assert!(err.to_string().contains("resale_pct"));

        let err: ApiError = ConfigError::FileNotFound("x.json".to_string()).into();
        assert!(matches!(err, ApiError::ConfigError(_)));
    }
}

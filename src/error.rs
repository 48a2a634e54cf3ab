//! 统一错误处理
//!
//! `ApiError` 实现 `IntoResponse`，handler 只需返回 `ApiResult<T>`

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::domain::ValidationError;

/// API 错误响应结构
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// 统一 API 错误类型
#[derive(Debug)]
pub enum ApiError {
    /// 401 - API Key 无效或缺失
    Unauthorized,
    /// 400 - 表单/查询参数校验失败（远程调用之前）
    Validation(String),
    /// 500 - 远程服务调用失败
    ///
    /// `message` 面向用户，`details` 为远程返回的原始错误
    Remote {
        message: String,
        details: Option<String>,
    },
    /// 500 - 内部错误
    Internal(String),
}

impl ApiError {
    pub fn unauthorized() -> Self {
        Self::Unauthorized
    }

    /// 创建校验错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// 创建远程服务错误
    pub fn remote(message: impl Into<String>, details: Option<String>) -> Self {
        Self::Remote {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// 面向用户的消息
    pub fn message(&self) -> String {
        match self {
            ApiError::Unauthorized => "Invalid or missing API key".to_string(),
            ApiError::Validation(msg) => msg.clone(),
            ApiError::Remote { message, .. } => message.clone(),
            ApiError::Internal(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.message();
        let (status, body) = match self {
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse::new("unauthorized", message),
            ),
            ApiError::Validation(_) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("validation_error", message),
            ),
            ApiError::Remote { details, .. } => {
                let body = ErrorResponse::new("remote_service_error", message);
                let body = match details {
                    Some(details) => body.with_details(details),
                    None => body,
                };
                (StatusCode::INTERNAL_SERVER_ERROR, body)
            }
            ApiError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new("internal_error", message),
            ),
        };

        (status, Json(body)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Unauthorized => write!(f, "Unauthorized"),
            ApiError::Validation(m) => write!(f, "Validation error: {}", m),
            ApiError::Remote { message, .. } => write!(f, "Remote service error: {}", message),
            ApiError::Internal(m) => write!(f, "Internal error: {}", m),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

/// 便捷类型别名
pub type ApiResult<T> = Result<T, ApiError>;

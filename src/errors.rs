use std::fmt;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShortenerError {
    StoreUnavailable(String),
    StoreOperation(String),
    Encoding(String),
    NotFound(String),
    Validation(String),
    Serialization(String),
    Config(String),
}

impl ShortenerError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            ShortenerError::StoreUnavailable(_) => "E001",
            ShortenerError::StoreOperation(_) => "E002",
            ShortenerError::Encoding(_) => "E003",
            ShortenerError::NotFound(_) => "E004",
            ShortenerError::Validation(_) => "E005",
            ShortenerError::Serialization(_) => "E006",
            ShortenerError::Config(_) => "E007",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            ShortenerError::StoreUnavailable(_) => "Store Unavailable",
            ShortenerError::StoreOperation(_) => "Store Operation Error",
            ShortenerError::Encoding(_) => "Encoding Error",
            ShortenerError::NotFound(_) => "Resource Not Found",
            ShortenerError::Validation(_) => "Validation Error",
            ShortenerError::Serialization(_) => "Serialization Error",
            ShortenerError::Config(_) => "Configuration Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            ShortenerError::StoreUnavailable(msg) => msg,
            ShortenerError::StoreOperation(msg) => msg,
            ShortenerError::Encoding(msg) => msg,
            ShortenerError::NotFound(msg) => msg,
            ShortenerError::Validation(msg) => msg,
            ShortenerError::Serialization(msg) => msg,
            ShortenerError::Config(msg) => msg,
        }
    }

    /// 格式化为彩色输出（用于 Server 模式的启动失败提示）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for ShortenerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for ShortenerError {}

// 便捷的构造函数
impl ShortenerError {
    pub fn store_unavailable<T: Into<String>>(msg: T) -> Self {
        ShortenerError::StoreUnavailable(msg.into())
    }

    pub fn store_operation<T: Into<String>>(msg: T) -> Self {
        ShortenerError::StoreOperation(msg.into())
    }

    pub fn encoding<T: Into<String>>(msg: T) -> Self {
        ShortenerError::Encoding(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        ShortenerError::NotFound(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        ShortenerError::Validation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        ShortenerError::Serialization(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        ShortenerError::Config(msg.into())
    }
}

impl From<redis::RedisError> for ShortenerError {
    fn from(err: redis::RedisError) -> Self {
        ShortenerError::StoreOperation(err.to_string())
    }
}

impl From<serde_json::Error> for ShortenerError {
    fn from(err: serde_json::Error) -> Self {
        ShortenerError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for ShortenerError {
    fn from(err: std::io::Error) -> Self {
        ShortenerError::Config(err.to_string())
    }
}

/// HTTP 错误响应体
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub error: &'a str,
    pub code: &'static str,
}

impl ResponseError for ShortenerError {
    fn status_code(&self) -> StatusCode {
        match self {
            ShortenerError::NotFound(_) => StatusCode::NOT_FOUND,
            ShortenerError::Validation(_) | ShortenerError::Serialization(_) => {
                StatusCode::BAD_REQUEST
            }
            ShortenerError::StoreUnavailable(_) | ShortenerError::StoreOperation(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ShortenerError::Encoding(_) | ShortenerError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.message(),
            code: self.code(),
        })
    }
}

pub type Result<T> = std::result::Result<T, ShortenerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(ShortenerError::store_unavailable("x").code(), "E001");
        assert_eq!(ShortenerError::not_found("x").code(), "E004");
        assert_eq!(ShortenerError::config("x").code(), "E007");
    }

    #[test]
    fn test_display_uses_simple_format() {
        let err = ShortenerError::not_found("short code 'abc' not found");
        assert_eq!(
            err.to_string(),
            "Resource Not Found: short code 'abc' not found"
        );
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ShortenerError::not_found("x").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ShortenerError::validation("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ShortenerError::store_operation("x").status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ShortenerError::encoding("x").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ShortenerError = io_error.into();
        assert!(matches!(err, ShortenerError::Config(_)));
        assert!(err.message().contains("denied"));
    }
}

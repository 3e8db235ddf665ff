//! credhash-errors - 统一错误处理
//!
//! 宿主在边界处把核心库的错误转换成 [`AppError`]，再按 RFC 7807 Problem Details 输出

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 应用错误类型
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl AppError {
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// 转换为 HTTP 状态码
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Unauthorized(_) => 401,
            Self::Configuration(_) => 500,
        }
    }

    /// 转换为 Problem Details
    pub fn to_problem_details(&self) -> ProblemDetails {
        ProblemDetails {
            r#type: self.problem_type(),
            title: self.problem_title(),
            status: self.status_code(),
            detail: self.to_string(),
            instance: None,
        }
    }

    fn problem_type(&self) -> String {
        match self {
            Self::Unauthorized(_) => "https://credhash.dev/problems/unauthorized".to_string(),
            Self::Configuration(_) => "https://credhash.dev/problems/configuration".to_string(),
        }
    }

    fn problem_title(&self) -> String {
        match self {
            Self::Unauthorized(_) => "Unauthorized".to_string(),
            Self::Configuration(_) => "Configuration Error".to_string(),
        }
    }
}

/// RFC 7807 Problem Details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDetails {
    pub r#type: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::unauthorized("x").status_code(), 401);
        assert_eq!(AppError::configuration("x").status_code(), 500);
    }

    #[test]
    fn test_problem_details_serialization() {
        let details = AppError::unauthorized("Invalid credentials").to_problem_details();
        assert_eq!(details.status, 401);
        assert_eq!(details.title, "Unauthorized");

        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["detail"], "Unauthorized: Invalid credentials");
        // instance 为空时不序列化
        assert!(json.get("instance").is_none());
    }
}

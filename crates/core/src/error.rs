//! 凭证哈希错误

use credhash_errors::AppError;
use thiserror::Error;

/// 对外统一的认证失败消息，密码错误和存储值损坏使用同一条
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// 凭证哈希错误
#[derive(Debug, Error)]
pub enum HasherError {
    /// 工作因子超出支持范围，不做截断
    #[error("Invalid work factor {value} (supported range {min}..={max})")]
    Configuration { value: u32, min: u32, max: u32 },

    /// 存储的哈希值损坏或无法解析
    #[error("Malformed password hash: {0}")]
    MalformedHash(String),
}

impl HasherError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedHash(msg.into())
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedHash(_))
    }
}

impl From<HasherError> for AppError {
    fn from(err: HasherError) -> Self {
        match err {
            HasherError::Configuration { .. } => AppError::configuration(err.to_string()),
            HasherError::MalformedHash(_) => AppError::unauthorized(INVALID_CREDENTIALS),
        }
    }
}

/// Result 类型别名
pub type HasherResult<T> = Result<T, HasherError>;

// ==========================================
// 工程进度重算引擎 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型,转换Repository错误为调用方友好的错误
// 原则: NotFound 直接上抛不重试;存储错误原样传播;无致命错误
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("并发冲突: {0}")]
    Conflict(String),

    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("内部错误: {0}")]
    Internal(String),
}

// Repository 错误 → API 错误
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{} (id={})", entity, id))
            }
            RepositoryError::OptimisticLockFailure { .. } => ApiError::Conflict(err.to_string()),
            RepositoryError::ValidationError(msg) => ApiError::InvalidInput(msg),
            RepositoryError::InternalError(msg) => ApiError::Internal(msg),
            RepositoryError::Other(e) => ApiError::Internal(e.to_string()),
            other => ApiError::DatabaseError(other.to_string()),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

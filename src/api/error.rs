// ==========================================
// 参数持久化子系统 - API层错误类型
// ==========================================
// 职责: 将参数层/存储层错误转换为面向操作者的错误消息
// ==========================================

use crate::param::ParamError;
use crate::storage::StoreError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    // ==========================================
    // 输入错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("不支持的操作: {0}")]
    Unsupported(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("存储错误: {0}")]
    StorageError(String),

    #[error("存储繁忙: {0}")]
    StorageBusy(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),
}

// ==========================================
// 从 ParamError 转换
// ==========================================
impl From<ParamError> for ApiError {
    fn from(err: ParamError) -> Self {
        match err {
            ParamError::NotFound { name } => ApiError::NotFound(format!("参数 '{}' 不存在", name)),
            ParamError::InvalidArgument {
                name,
                value,
                reason,
            } => ApiError::InvalidInput(format!("{}={:?}: {}", name, value, reason)),
            ParamError::Unsupported { name } => {
                ApiError::Unsupported(format!("参数 '{}' 未持久化", name))
            }
            ParamError::Duplicate { name } => {
                ApiError::InternalError(format!("参数名重复: {}", name))
            }
            ParamError::InvalidName { name, reason } => {
                ApiError::InvalidInput(format!("参数名 {:?} 无效: {}", name, reason))
            }
            ParamError::Decode { name, kind, reason } => ApiError::StorageError(format!(
                "参数 '{}' 的存储值不是 {} 类型: {}",
                name, kind, reason
            )),
            ParamError::Store(store_err) => store_err.into(),
        }
    }
}

// ==========================================
// 从 StoreError 转换
// ==========================================
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { key, .. } => {
                ApiError::NotFound(format!("存储中没有 '{}'", key))
            }
            StoreError::InvalidKey { key, reason } => {
                ApiError::InvalidInput(format!("键 {:?} 无效: {}", key, reason))
            }
            StoreError::ValueTooLong { key, len, max } => ApiError::InvalidInput(format!(
                "'{}' 的值过长（{} 字节，上限 {} 字节）",
                key, len, max
            )),
            StoreError::LockTimeout { timeout_ms } => {
                ApiError::StorageBusy(format!("等待存储锁超过 {}ms", timeout_ms))
            }
            StoreError::Lock(msg) => ApiError::InternalError(format!("存储锁异常: {}", msg)),
            other @ StoreError::Io { .. } => ApiError::StorageError(other.to_string()),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

// ==========================================
// 参数持久化子系统 - 参数层错误类型
// ==========================================
// 分类:
// - NotFound:        参数不存在（注册表查找失败）
// - InvalidArgument: 文本解析失败，值保持不变
// - Unsupported:     非持久化参数的存储路径
// - Store:           存储层错误（含键不存在/I/O 故障）
// ==========================================

use crate::param::value::ParamKind;
use crate::storage::StoreError;
use thiserror::Error;

/// 参数层错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParamError {
    #[error("参数不存在: {name}")]
    NotFound { name: String },

    #[error("无效参数值 (param={name}, value={value:?}): {reason}")]
    InvalidArgument {
        name: String,
        value: String,
        reason: String,
    },

    #[error("参数未持久化，不支持存储操作: {name}")]
    Unsupported { name: String },

    #[error("存储值与类型不符 (param={name}, kind={kind}): {reason}")]
    Decode {
        name: String,
        kind: ParamKind,
        reason: String,
    },

    #[error("参数名重复: {name}")]
    Duplicate { name: String },

    #[error("无效参数名: {name:?} ({reason})")]
    InvalidName { name: String, reason: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ParamError {
    /// 参数或存储键不存在
    pub fn is_not_found(&self) -> bool {
        match self {
            ParamError::NotFound { .. } => true,
            ParamError::Store(e) => e.is_not_found(),
            _ => false,
        }
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, ParamError::Unsupported { .. })
    }
}

/// Result 类型别名
pub type ParamResult<T> = Result<T, ParamError>;

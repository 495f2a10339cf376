// ==========================================
// 参数持久化子系统 - 存储层错误类型
// ==========================================
// 约定: NotFound 与 I/O 故障严格区分
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 非 SQLite 来源的故障码
pub const UNKNOWN_IO_CODE: i32 = -1;

/// 存储层错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    // ===== 预期路径 =====
    #[error("键不存在: namespace={namespace}, key={key}")]
    NotFound { namespace: String, key: String },

    // ===== 参数校验 =====
    #[error("无效的键: {key:?} ({reason})")]
    InvalidKey { key: String, reason: String },

    #[error("值过长: key={key}, len={len}, max={max}")]
    ValueTooLong { key: String, len: usize, max: usize },

    // ===== 并发控制 =====
    #[error("存储锁获取失败: {0}")]
    Lock(String),

    #[error("存储锁等待超时: {timeout_ms}ms")]
    LockTimeout { timeout_ms: u64 },

    // ===== 底层故障 =====
    #[error("存储 I/O 失败 (code={code}): {message}")]
    Io { code: i32, message: String },
}

impl StoreError {
    /// 是否为"键不存在"（首次启动时的正常路径）
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    /// 存储相关的故障码（仅 Io 变体携带）
    pub fn code(&self) -> Option<i32> {
        match self {
            StoreError::Io { code, .. } => Some(*code),
            _ => None,
        }
    }
}

// 实现 From<rusqlite::Error>
impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(ffi_err, msg) => StoreError::Io {
                code: ffi_err.extended_code,
                message: msg.unwrap_or_else(|| ffi_err.to_string()),
            },
            other => StoreError::Io {
                code: UNKNOWN_IO_CODE,
                message: other.to_string(),
            },
        }
    }
}

/// Result 类型别名
pub type StoreResult<T> = Result<T, StoreError>;

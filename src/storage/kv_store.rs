// ==========================================
// 参数持久化子系统 - 键值存储 Trait
// ==========================================
// 职责: 定义参数层依赖的存储抽象
// 说明: 参数与注册表只依赖本 Trait，不依赖具体后端
// ==========================================

use crate::storage::error::{StoreError, StoreResult};

/// 键的最大长度（字节）
pub const MAX_KEY_LEN: usize = 15;

/// 非易失键值存储
///
/// 约定：
/// - 所有操作同步返回，写操作返回 Ok 时数据已持久化
/// - 读取不存在的键返回 `StoreError::NotFound`，不视为 I/O 故障
pub trait KvStore: Send + Sync {
    /// 命名空间
    fn namespace(&self) -> &str;

    /// 写入/覆盖一个值
    fn put(&self, key: &str, value: &[u8]) -> StoreResult<()>;

    /// 读取一个值，结果截断到至多 `max_len` 字节
    fn get(&self, key: &str, max_len: usize) -> StoreResult<Vec<u8>>;

    /// 删除一个键
    fn erase(&self, key: &str) -> StoreResult<()>;

    /// 清空命名空间内的所有键
    fn erase_all(&self) -> StoreResult<()>;

    /// 命名空间内的全部键（按字典序）
    fn keys(&self) -> StoreResult<Vec<String>>;

    /// 键是否存在
    fn contains(&self, key: &str) -> StoreResult<bool> {
        match self.get(key, 0) {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// 校验键名：非空、不超过 MAX_KEY_LEN 字节、不含 NUL
pub fn validate_key(key: &str) -> StoreResult<()> {
    let reason = if key.is_empty() {
        Some("键不能为空".to_string())
    } else if key.len() > MAX_KEY_LEN {
        Some(format!("长度 {} 超过上限 {}", key.len(), MAX_KEY_LEN))
    } else if key.contains('\0') {
        Some("键不能包含 NUL 字符".to_string())
    } else {
        None
    };

    match reason {
        Some(reason) => Err(StoreError::InvalidKey {
            key: key.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key() {
        assert!(validate_key("wifi_ssid").is_ok());
        assert!(validate_key("a23456789012345").is_ok());

        assert!(matches!(
            validate_key(""),
            Err(StoreError::InvalidKey { .. })
        ));
        assert!(matches!(
            validate_key("a234567890123456"),
            Err(StoreError::InvalidKey { .. })
        ));
        assert!(matches!(
            validate_key("bad\0key"),
            Err(StoreError::InvalidKey { .. })
        ));
    }
}

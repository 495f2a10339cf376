// ==========================================
// 参数持久化子系统 - 存储配置
// ==========================================
// 环境变量:
// - NVS_PARAMS_DB_PATH:         数据库文件路径
// - NVS_PARAMS_NAMESPACE:       命名空间（默认 storage）
// - NVS_PARAMS_LOCK_TIMEOUT_MS: 存储锁等待上限（缺省为无限等待）
// - NVS_PARAMS_MAX_VALUE_LEN:   单个值的最大字节数
// ==========================================

use std::path::PathBuf;
use std::time::Duration;

/// 默认命名空间
pub const DEFAULT_NAMESPACE: &str = "storage";

/// 单个值的默认最大长度（字节）
pub const DEFAULT_MAX_VALUE_LEN: usize = 4000;

pub const ENV_DB_PATH: &str = "NVS_PARAMS_DB_PATH";
pub const ENV_NAMESPACE: &str = "NVS_PARAMS_NAMESPACE";
pub const ENV_LOCK_TIMEOUT_MS: &str = "NVS_PARAMS_LOCK_TIMEOUT_MS";
pub const ENV_MAX_VALUE_LEN: &str = "NVS_PARAMS_MAX_VALUE_LEN";

/// 存储后端配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// 数据库文件路径
    pub db_path: String,

    /// 命名空间（同一文件内相互隔离）
    pub namespace: String,

    /// 存储锁等待上限；None 表示无限等待
    pub lock_timeout: Option<Duration>,

    /// 单个值的最大字节数
    pub max_value_len: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: get_default_db_path(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            lock_timeout: None,
            max_value_len: DEFAULT_MAX_VALUE_LEN,
        }
    }
}

impl StoreConfig {
    /// 指定数据库路径，其余取默认值
    pub fn with_path(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
            ..Self::default()
        }
    }

    /// 从环境变量加载配置
    ///
    /// 无法解析的数值型变量会被忽略（记录 warn），保留默认值。
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(path) = non_empty_env(ENV_DB_PATH) {
            config.db_path = path;
        }
        if let Some(namespace) = non_empty_env(ENV_NAMESPACE) {
            config.namespace = namespace;
        }
        if let Some(raw) = non_empty_env(ENV_LOCK_TIMEOUT_MS) {
            match raw.parse::<u64>() {
                Ok(ms) => config.lock_timeout = Some(Duration::from_millis(ms)),
                Err(_) => tracing::warn!(
                    env = ENV_LOCK_TIMEOUT_MS,
                    raw_value = %raw,
                    "锁等待配置格式错误，使用无限等待"
                ),
            }
        }
        if let Some(raw) = non_empty_env(ENV_MAX_VALUE_LEN) {
            match raw.parse::<usize>() {
                Ok(len) if len > 0 => config.max_value_len = len,
                _ => tracing::warn!(
                    env = ENV_MAX_VALUE_LEN,
                    raw_value = %raw,
                    "值长度上限配置格式错误，使用默认值"
                ),
            }
        }

        config
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// 获取默认数据库路径
///
/// 优先使用用户数据目录；拿不到时回退到当前目录。
pub fn get_default_db_path() -> String {
    let mut path = PathBuf::from("./nvs_params.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("nvs-params");
        // 确保目录存在
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("nvs_params.db");
        }
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.namespace, DEFAULT_NAMESPACE);
        assert_eq!(config.lock_timeout, None);
        assert_eq!(config.max_value_len, DEFAULT_MAX_VALUE_LEN);
        assert!(config.db_path.ends_with("nvs_params.db"));
    }

    #[test]
    fn test_with_path() {
        let config = StoreConfig::with_path("/tmp/params.db");
        assert_eq!(config.db_path, "/tmp/params.db");
        assert_eq!(config.namespace, DEFAULT_NAMESPACE);
    }
}

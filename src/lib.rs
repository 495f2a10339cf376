// ==========================================
// 参数持久化子系统 - 核心库
// ==========================================
// 组成: 类型化参数 + 参数注册表 + 非易失键值存储
// 技术栈: Rust + SQLite
// 存储约定: 单一命名空间，参数名即存储键
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 存储层 - 键值存储抽象与 SQLite 实现
pub mod storage;

// 参数层 - 值类型与参数句柄
pub mod param;

// 注册表 - 参数枚举与批量操作
pub mod registry;

// 配置层 - 存储配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 控制面命令
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

pub use api::{ApiError, ApiResult, CommandOutput, ParamApi, ParamCommand};
pub use config::StoreConfig;
pub use param::{
    Param, ParamError, ParamHandle, ParamKind, ParamResult, ParamType, ParamValue, TypedParam,
};
pub use registry::{ParamListing, ParamRegistry, ParamSnapshot, SnapshotEntry};
pub use storage::{KvStore, SqliteStore, StoreError, StoreResult};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "参数持久化子系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}

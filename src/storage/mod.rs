// ==========================================
// 参数持久化子系统 - 存储层 (Backing Store)
// ==========================================
// 职责: 非易失 key → blob 存储，命名空间隔离
// 约束: 所有操作经同一把锁串行化
// ==========================================

pub mod error;
pub mod kv_store;
pub mod sqlite_store;

// 重导出核心类型
pub use error::{StoreError, StoreResult};
pub use kv_store::{validate_key, KvStore, MAX_KEY_LEN};
pub use sqlite_store::SqliteStore;

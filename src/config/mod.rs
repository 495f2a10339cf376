// ==========================================
// 参数持久化子系统 - 配置层
// ==========================================
// 职责: 存储后端的运行期配置（路径/命名空间/锁等待/长度上限）
// 来源: 默认值 + 环境变量覆写
// ==========================================

pub mod store_config;

// 重导出核心配置
pub use store_config::{get_default_db_path, StoreConfig};

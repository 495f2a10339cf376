// ==========================================
// 参数持久化子系统 - API 层 (控制面)
// ==========================================
// 职责: 命令解析 + 注册表操作分派 + 错误转换
// ==========================================

pub mod command;
pub mod error;
pub mod param_api;

// 重导出
pub use command::ParamCommand;
pub use error::{ApiError, ApiResult};
pub use param_api::{CommandOutput, ParamApi};

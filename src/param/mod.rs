// ==========================================
// 参数持久化子系统 - 参数层 (Parameter)
// ==========================================
// 职责: 具名、带类型、可选持久化的参数
// 值类型: 封闭集合 (Str / Int / Bool / Float)
// ==========================================

pub mod error;
pub mod handle;
pub mod typed;
pub mod value;

// 重导出核心类型
pub use error::{ParamError, ParamResult};
pub use handle::{Param, ParamHandle};
pub use typed::{ParamType, TypedParam};
pub use value::{ParamKind, ParamValue, STRING_READ_CAP};

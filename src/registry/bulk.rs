// ==========================================
// 参数注册表 - 批量操作
// ==========================================
// 规则:
// - 按注册顺序逐个执行，遇到首个错误立即返回，不回滚已完成部分
// - 临时参数只在内存中处理，其 Unsupported 不算批量失败
// - read_all 的 NotFound 同样是错误，首个缺失的键即中止
// ==========================================

use super::ParamRegistry;
use crate::param::{ParamError, ParamResult};

impl ParamRegistry {
    /// 按顺序保存全部持久化参数
    pub fn save_all(&self) -> ParamResult<()> {
        let mut saved = 0usize;
        for param in self.iter().filter(|p| p.is_persisted()) {
            param
                .save()
                .map_err(|e| bulk_failure("save_all", param.name(), e))?;
            saved += 1;
        }
        tracing::info!(saved, "全部参数已保存");
        Ok(())
    }

    /// 按顺序从存储重新加载全部持久化参数
    ///
    /// 存储中缺少某个参数时返回 `NotFound`，其后的参数不再加载。
    pub fn read_all(&self) -> ParamResult<()> {
        let mut loaded = 0usize;
        for param in self.iter().filter(|p| p.is_persisted()) {
            param
                .load()
                .map_err(|e| bulk_failure("read_all", param.name(), e))?;
            loaded += 1;
        }
        tracing::info!(loaded, "全部参数已重新加载");
        Ok(())
    }

    /// 按顺序将全部参数恢复默认值（持久化参数同步写入存储）
    pub fn reset_default_all(&self) -> ParamResult<()> {
        for param in self.iter() {
            match param.set_to_default() {
                Ok(()) => {}
                Err(e) if e.is_unsupported() && !param.is_persisted() => {}
                Err(e) => return Err(bulk_failure("reset_default_all", param.name(), e)),
            }
        }
        tracing::info!(count = self.len(), "全部参数已恢复默认值");
        Ok(())
    }

    /// 清空命名空间（整体删除，不逐个参数处理）
    ///
    /// 内存值不受影响。
    pub fn erase_all(&self) -> ParamResult<()> {
        self.store().erase_all()?;
        tracing::info!(namespace = %self.store().namespace(), "存储已清空");
        Ok(())
    }
}

fn bulk_failure(op: &str, name: &str, err: ParamError) -> ParamError {
    tracing::error!(op, param = %name, error = %err, "批量操作中止");
    err
}

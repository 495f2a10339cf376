// ==========================================
// 参数持久化子系统 - 参数注册表 (Registry)
// ==========================================
// 职责: 进程内唯一的上下文对象，持有存储与全部参数句柄
// 生命周期: 初始化阶段注册（需要 &mut），之后以 Arc 共享、结构不可变
// 语义: 批量操作按注册顺序执行，遇到首个错误立即返回
// ==========================================

mod bulk;
mod snapshot;

#[cfg(test)]
mod tests;

use crate::param::{
    Param, ParamError, ParamHandle, ParamKind, ParamResult, ParamType, ParamValue, TypedParam,
};
use crate::storage::KvStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub use snapshot::{ParamSnapshot, SnapshotEntry};

/// list 操作的单行结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamListing {
    pub name: String,
    pub kind: ParamKind,
    /// 持久化参数与临时参数需要区分呈现
    pub persisted: bool,
    pub value: String,
}

// ==========================================
// ParamRegistry - 参数注册表
// ==========================================
pub struct ParamRegistry {
    store: Arc<dyn KvStore>,
    params: Vec<ParamHandle>,
}

impl ParamRegistry {
    /// 创建空注册表
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self {
            store,
            params: Vec::new(),
        }
    }

    /// 共享的后端存储
    pub fn store(&self) -> &Arc<dyn KvStore> {
        &self.store
    }

    /// 构造并注册一个参数
    ///
    /// 重名直接拒绝（`Duplicate`），避免按名查找出现歧义。
    pub fn register(
        &mut self,
        name: &str,
        default: ParamValue,
        persist: bool,
    ) -> ParamResult<ParamHandle> {
        if self.params.iter().any(|p| p.name() == name) {
            tracing::error!(param = %name, "参数名重复，拒绝注册");
            return Err(ParamError::Duplicate {
                name: name.to_string(),
            });
        }

        let handle = Arc::new(Param::declare(
            Arc::clone(&self.store),
            name,
            default,
            persist,
        )?);
        self.params.push(Arc::clone(&handle));

        tracing::debug!(
            param = %name,
            kind = %handle.kind(),
            persisted = persist,
            index = self.params.len() - 1,
            "参数已注册"
        );
        Ok(handle)
    }

    /// 声明持久化参数
    pub fn declare<T: ParamType>(&mut self, name: &str, default: T) -> ParamResult<TypedParam<T>> {
        TypedParam::new(self, name, default, true)
    }

    /// 声明临时参数（不写入存储）
    pub fn declare_transient<T: ParamType>(
        &mut self,
        name: &str,
        default: T,
    ) -> ParamResult<TypedParam<T>> {
        TypedParam::new(self, name, default, false)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// 按注册顺序遍历
    pub fn iter(&self) -> impl Iterator<Item = &ParamHandle> {
        self.params.iter()
    }

    /// 按名称精确查找（区分大小写）
    pub fn get_param(&self, name: &str) -> Option<ParamHandle> {
        self.params.iter().find(|p| p.name() == name).cloned()
    }

    /// 按名称查找并还原为类型化参数
    pub fn typed<T: ParamType>(&self, name: &str) -> Option<TypedParam<T>> {
        self.get_param(name).and_then(TypedParam::from_handle)
    }

    /// 枚举全部参数（注册顺序，只读）
    pub fn list_all(&self) -> Vec<ParamListing> {
        self.params
            .iter()
            .map(|p| ParamListing {
                name: p.name().to_string(),
                kind: p.kind(),
                persisted: p.is_persisted(),
                value: p.to_display_string(),
            })
            .collect()
    }

    /// 按名称解析文本并设置
    pub fn set_param(&self, name: &str, value_text: &str) -> ParamResult<()> {
        let param = self.find(name)?;
        param.set_from_string(value_text)
    }

    /// 按名称恢复单个参数的默认值
    pub fn reset_param(&self, name: &str) -> ParamResult<()> {
        let param = self.find(name)?;
        param.set_to_default()
    }

    fn find(&self, name: &str) -> ParamResult<&ParamHandle> {
        self.params
            .iter()
            .find(|p| p.name() == name)
            .ok_or_else(|| {
                tracing::warn!(param = %name, "参数不存在");
                ParamError::NotFound {
                    name: name.to_string(),
                }
            })
    }
}

impl std::fmt::Debug for ParamRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParamRegistry")
            .field("namespace", &self.store.namespace())
            .field("params", &self.params)
            .finish()
    }
}

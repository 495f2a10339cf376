// ==========================================
// 参数注册表 - 参数快照
// ==========================================
// 用途: 导出全部参数的文本值 / 从快照批量回写
// 格式: JSON 数组，保持注册顺序
// ==========================================

use super::ParamRegistry;
use crate::param::ParamResult;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub name: String,
    pub value: String,
}

/// 参数快照
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSnapshot {
    pub entries: Vec<SnapshotEntry>,
}

impl ParamSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl ParamRegistry {
    /// 获取全部参数的快照
    pub fn snapshot(&self) -> ParamSnapshot {
        ParamSnapshot {
            entries: self
                .iter()
                .map(|p| SnapshotEntry {
                    name: p.name().to_string(),
                    value: p.to_display_string(),
                })
                .collect(),
        }
    }

    /// 从快照恢复参数
    ///
    /// # 返回
    /// - Ok(usize): 实际回写的参数数量
    /// - Err: 首个失败的参数错误（之前的条目已生效）
    ///
    /// # 说明
    /// - 未注册的名称跳过
    /// - 临时参数只更新内存值
    pub fn restore_snapshot(&self, snapshot: &ParamSnapshot) -> ParamResult<usize> {
        let mut applied = 0usize;
        for entry in &snapshot.entries {
            let Some(param) = self.get_param(&entry.name) else {
                tracing::warn!(param = %entry.name, "快照中的参数未注册，跳过");
                continue;
            };

            match param.set_from_string(&entry.value) {
                Ok(()) => {}
                Err(e) if e.is_unsupported() && !param.is_persisted() => {}
                Err(e) => {
                    tracing::error!(param = %entry.name, error = %e, "快照恢复中止");
                    return Err(e);
                }
            }
            applied += 1;
        }

        tracing::info!(applied, "参数快照已恢复");
        Ok(applied)
    }
}

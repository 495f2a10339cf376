// ==========================================
// 参数持久化子系统 - 参数实体
// ==========================================
// 状态机: CREATED → (LOADED | DEFAULTED) → MUTATED*
// 约束:
// - name / default / persist 构造后不可变
// - current 只能经本类型的方法修改
// - 构造期加载失败被吞掉，回退到默认值
// ==========================================

use crate::param::error::{ParamError, ParamResult};
use crate::param::value::{ParamKind, ParamValue};
use crate::storage::{validate_key, KvStore};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// 注册表中持有的参数句柄
pub type ParamHandle = Arc<Param>;

/// 单个具名、带类型、可选持久化的参数
pub struct Param {
    name: String,
    default: ParamValue,
    persist: bool,
    current: RwLock<ParamValue>,
    store: Arc<dyn KvStore>,
}

impl Param {
    /// 构造参数；持久化参数会尝试从存储加载
    ///
    /// 名称不合法时返回 `InvalidName`；加载失败不会返回错误。
    pub(crate) fn declare(
        store: Arc<dyn KvStore>,
        name: &str,
        default: ParamValue,
        persist: bool,
    ) -> ParamResult<Self> {
        validate_key(name).map_err(|e| ParamError::InvalidName {
            name: name.to_string(),
            reason: e.to_string(),
        })?;

        let param = Self {
            name: name.to_string(),
            current: RwLock::new(default.clone()),
            default,
            persist,
            store,
        };

        if param.persist {
            param.load_or_default();
        }
        Ok(param)
    }

    fn load_or_default(&self) {
        match self.load() {
            Ok(()) => {
                tracing::debug!(param = %self.name, value = %self.to_display_string(), "参数已从存储加载");
            }
            Err(e) if e.is_not_found() => {
                tracing::debug!(param = %self.name, "存储中无此参数，使用默认值");
            }
            Err(e) => {
                tracing::warn!(param = %self.name, error = %e, "参数加载失败，使用默认值");
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ParamKind {
        self.default.kind()
    }

    /// 是否持久化
    pub fn is_persisted(&self) -> bool {
        self.persist
    }

    /// 当前内存值（不访问存储）
    pub fn value(&self) -> ParamValue {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// 构造时的默认值
    pub fn default_value(&self) -> &ParamValue {
        &self.default
    }

    fn replace(&self, value: ParamValue) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = value;
    }

    fn unsupported(&self) -> ParamError {
        ParamError::Unsupported {
            name: self.name.clone(),
        }
    }

    /// 更新内存值并写穿到存储
    ///
    /// 非持久化参数：内存值照常更新，返回 `Unsupported`。
    pub fn set_value(&self, value: ParamValue) -> ParamResult<()> {
        if value.kind() != self.kind() {
            return Err(ParamError::InvalidArgument {
                name: self.name.clone(),
                value: value.to_string(),
                reason: format!("类型不符: 期望 {}，实际 {}", self.kind(), value.kind()),
            });
        }
        self.replace(value);
        self.save()
    }

    /// 将当前内存值写入存储
    pub fn save(&self) -> ParamResult<()> {
        if !self.persist {
            return Err(self.unsupported());
        }
        let bytes = self.value().encode();
        self.store.put(&self.name, &bytes)?;
        Ok(())
    }

    /// 从存储重新加载
    ///
    /// 失败时内存值保持不变。
    pub fn load(&self) -> ParamResult<()> {
        if !self.persist {
            return Err(self.unsupported());
        }
        let kind = self.kind();
        let bytes = self.store.get(&self.name, kind.read_len())?;
        let value = ParamValue::decode(kind, &bytes).map_err(|failure| ParamError::Decode {
            name: self.name.clone(),
            kind,
            reason: failure.0,
        })?;
        self.replace(value);
        Ok(())
    }

    /// 恢复默认值（等价于 set(default)）
    pub fn set_to_default(&self) -> ParamResult<()> {
        self.set_value(self.default.clone())
    }

    /// 删除存储中的条目，内存值不变
    pub fn clean(&self) -> ParamResult<()> {
        if !self.persist {
            return Err(self.unsupported());
        }
        self.store.erase(&self.name)?;
        Ok(())
    }

    /// 按类型文法格式化当前值
    pub fn to_display_string(&self) -> String {
        self.value().to_string()
    }

    /// 按类型文法解析文本并设置
    ///
    /// 解析失败返回 `InvalidArgument`，内存值与存储均不变。
    pub fn set_from_string(&self, text: &str) -> ParamResult<()> {
        let value = ParamValue::parse(self.kind(), text).map_err(|failure| {
            ParamError::InvalidArgument {
                name: self.name.clone(),
                value: text.to_string(),
                reason: failure.0,
            }
        })?;
        self.set_value(value)
    }
}

impl fmt::Debug for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Param")
            .field("name", &self.name)
            .field("default", &self.default)
            .field("persist", &self.persist)
            .field("current", &self.value())
            .field("namespace", &self.store.namespace())
            .finish()
    }
}

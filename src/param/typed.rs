// ==========================================
// 参数持久化子系统 - 类型化参数
// ==========================================
// 职责: 组件持有的强类型外观，内部共享注册表中的同一个句柄
// ==========================================

use crate::param::error::ParamResult;
use crate::param::handle::ParamHandle;
use crate::param::value::{ParamKind, ParamValue};
use crate::registry::ParamRegistry;
use std::marker::PhantomData;
use std::sync::Arc;

/// 可作为参数值的 Rust 类型
pub trait ParamType: Clone + Send + Sync + 'static {
    const KIND: ParamKind;

    fn into_value(self) -> ParamValue;

    fn from_value(value: &ParamValue) -> Option<Self>;
}

impl ParamType for String {
    const KIND: ParamKind = ParamKind::Str;

    fn into_value(self) -> ParamValue {
        ParamValue::Str(self)
    }

    fn from_value(value: &ParamValue) -> Option<Self> {
        match value {
            ParamValue::Str(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl ParamType for i32 {
    const KIND: ParamKind = ParamKind::Int;

    fn into_value(self) -> ParamValue {
        ParamValue::Int(self)
    }

    fn from_value(value: &ParamValue) -> Option<Self> {
        match value {
            ParamValue::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl ParamType for bool {
    const KIND: ParamKind = ParamKind::Bool;

    fn into_value(self) -> ParamValue {
        ParamValue::Bool(self)
    }

    fn from_value(value: &ParamValue) -> Option<Self> {
        match value {
            ParamValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl ParamType for f32 {
    const KIND: ParamKind = ParamKind::Float;

    fn into_value(self) -> ParamValue {
        ParamValue::Float(self)
    }

    fn from_value(value: &ParamValue) -> Option<Self> {
        match value {
            ParamValue::Float(f) => Some(*f),
            _ => None,
        }
    }
}

/// 强类型参数
///
/// 克隆开销很小，所有克隆共享同一个参数实体。
pub struct TypedParam<T: ParamType> {
    handle: ParamHandle,
    default: T,
    _marker: PhantomData<fn() -> T>,
}

impl<T: ParamType> Clone for TypedParam<T> {
    fn clone(&self) -> Self {
        Self {
            handle: Arc::clone(&self.handle),
            default: self.default.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T: ParamType> TypedParam<T> {
    /// 构造并注册参数
    ///
    /// # 参数
    /// - registry: 初始化阶段的注册表
    /// - name: 参数名（同时作为存储键，最长 15 字节）
    /// - default: 默认值
    /// - persist: 是否持久化
    pub fn new(
        registry: &mut ParamRegistry,
        name: &str,
        default: T,
        persist: bool,
    ) -> ParamResult<Self> {
        let handle = registry.register(name, default.clone().into_value(), persist)?;
        Ok(Self {
            handle,
            default,
            _marker: PhantomData,
        })
    }

    /// 从注册表句柄还原类型化参数；类型不符返回 None
    pub fn from_handle(handle: ParamHandle) -> Option<Self> {
        if handle.kind() != T::KIND {
            return None;
        }
        let default = T::from_value(handle.default_value())?;
        Some(Self {
            handle,
            default,
            _marker: PhantomData,
        })
    }

    /// 当前值（不访问存储，不会失败）
    pub fn get(&self) -> T {
        T::from_value(&self.handle.value()).unwrap_or_else(|| self.default.clone())
    }

    /// 设置并写穿到存储
    pub fn set(&self, value: T) -> ParamResult<()> {
        self.handle.set_value(value.into_value())
    }

    pub fn default_value(&self) -> &T {
        &self.default
    }

    pub fn handle(&self) -> &ParamHandle {
        &self.handle
    }

    pub fn name(&self) -> &str {
        self.handle.name()
    }

    pub fn is_persisted(&self) -> bool {
        self.handle.is_persisted()
    }

    pub fn save(&self) -> ParamResult<()> {
        self.handle.save()
    }

    pub fn load(&self) -> ParamResult<()> {
        self.handle.load()
    }

    pub fn set_to_default(&self) -> ParamResult<()> {
        self.handle.set_to_default()
    }

    pub fn clean(&self) -> ParamResult<()> {
        self.handle.clean()
    }

    pub fn to_display_string(&self) -> String {
        self.handle.to_display_string()
    }

    pub fn set_from_string(&self, text: &str) -> ParamResult<()> {
        self.handle.set_from_string(text)
    }
}

impl<T: ParamType + std::fmt::Debug> std::fmt::Debug for TypedParam<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypedParam")
            .field("name", &self.name())
            .field("value", &self.get())
            .field("default", &self.default)
            .finish()
    }
}

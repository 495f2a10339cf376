// ==========================================
// 参数持久化子系统 - 参数管理 API
// ==========================================
// 职责: 控制面入口，命令与注册表操作一一对应
// 说明: 临时参数的 set/default 只改内存值，视为成功并在消息中标注
// ==========================================

use std::sync::Arc;

use serde::Serialize;

use crate::api::command::ParamCommand;
use crate::api::error::{ApiError, ApiResult};
use crate::i18n::t;
use crate::param::{ParamError, ParamResult};
use crate::registry::{ParamListing, ParamRegistry, ParamSnapshot};

const LIST_BANNER: &str = "**************************** Params ***************************";
const LIST_FOOTER: &str = "***************************************************************";

// ANSI 颜色
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// 命令执行结果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum CommandOutput {
    Listing(Vec<ParamListing>),
    Snapshot(String),
    Message(String),
}

impl CommandOutput {
    /// 渲染为控制台文本
    ///
    /// 列表中持久化参数为绿色，临时参数为黄色（color=false 时不着色）。
    pub fn render(&self, color: bool) -> String {
        match self {
            CommandOutput::Listing(items) => {
                let mut lines = Vec::with_capacity(items.len() + 2);
                lines.push(LIST_BANNER.to_string());
                for item in items {
                    let line = format!("{} = {}", item.name, item.value);
                    if color {
                        let tint = if item.persisted { GREEN } else { YELLOW };
                        lines.push(format!("{}{}{}", tint, line, RESET));
                    } else {
                        lines.push(line);
                    }
                }
                lines.push(LIST_FOOTER.to_string());
                lines.join("\n")
            }
            CommandOutput::Snapshot(json) => json.clone(),
            CommandOutput::Message(msg) => msg.clone(),
        }
    }
}

// ==========================================
// ParamApi - 参数管理 API
// ==========================================

/// 参数管理API
///
/// 职责：
/// 1. 参数枚举
/// 2. 批量保存/读取/恢复默认/清空
/// 3. 按名称设置与恢复默认
/// 4. 快照导出/导入
pub struct ParamApi {
    registry: Arc<ParamRegistry>,
}

impl ParamApi {
    /// 创建新的ParamApi实例
    pub fn new(registry: Arc<ParamRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<ParamRegistry> {
        &self.registry
    }

    /// 执行一条命令
    pub fn execute(&self, command: ParamCommand) -> ApiResult<CommandOutput> {
        tracing::debug!(?command, "执行参数命令");
        match command {
            ParamCommand::List => Ok(CommandOutput::Listing(self.list())),
            ParamCommand::Read => self.read_all().map(CommandOutput::Message),
            ParamCommand::Save => self.save_all().map(CommandOutput::Message),
            ParamCommand::Erase => self.erase_all().map(CommandOutput::Message),
            ParamCommand::Default(None) => self.reset_all().map(CommandOutput::Message),
            ParamCommand::Default(Some(name)) => self.reset(&name).map(CommandOutput::Message),
            ParamCommand::Set { name, value } => self.set(&name, &value).map(CommandOutput::Message),
            ParamCommand::Export => self.export().map(CommandOutput::Snapshot),
            ParamCommand::Import(json) => self.import(&json).map(CommandOutput::Message),
        }
    }

    /// 查询所有参数
    pub fn list(&self) -> Vec<ParamListing> {
        self.registry.list_all()
    }

    pub fn save_all(&self) -> ApiResult<String> {
        self.registry.save_all()?;
        Ok(t("param.saved"))
    }

    pub fn read_all(&self) -> ApiResult<String> {
        self.registry.read_all()?;
        Ok(t("param.read"))
    }

    pub fn erase_all(&self) -> ApiResult<String> {
        self.registry.erase_all()?;
        Ok(t("param.erased"))
    }

    pub fn reset_all(&self) -> ApiResult<String> {
        self.registry.reset_default_all()?;
        Ok(t("param.reset_all"))
    }

    /// 恢复单个参数默认值
    pub fn reset(&self, name: &str) -> ApiResult<String> {
        let persisted = tolerate_transient(self.registry.reset_param(name))?;
        Ok(self.describe(name, persisted))
    }

    /// 按名称设置参数
    ///
    /// # 参数
    /// - name: 参数名
    /// - value: 按参数类型文法书写的值
    pub fn set(&self, name: &str, value: &str) -> ApiResult<String> {
        if name.trim().is_empty() {
            return Err(ApiError::InvalidInput(t("param.set_requires")));
        }
        let persisted = tolerate_transient(self.registry.set_param(name, value))?;
        Ok(self.describe(name, persisted))
    }

    /// 导出快照（JSON）
    pub fn export(&self) -> ApiResult<String> {
        self.registry
            .snapshot()
            .to_json()
            .map_err(|e| ApiError::InternalError(e.to_string()))
    }

    /// 从快照（JSON）导入
    pub fn import(&self, json: &str) -> ApiResult<String> {
        let snapshot = ParamSnapshot::from_json(json)
            .map_err(|e| ApiError::InvalidInput(format!("快照格式错误: {}", e)))?;
        let applied = self.registry.restore_snapshot(&snapshot)?;
        Ok(rust_i18n::t!("param.imported", count = applied).to_string())
    }

    fn describe(&self, name: &str, persisted: bool) -> String {
        let value = self
            .registry
            .get_param(name)
            .map(|p| p.to_display_string())
            .unwrap_or_default();
        if persisted {
            rust_i18n::t!("param.set_done", name = name, value = value).to_string()
        } else {
            rust_i18n::t!("param.set_transient", name = name, value = value).to_string()
        }
    }
}

/// 临时参数的 Unsupported 视为成功；返回值表示是否已持久化
fn tolerate_transient(result: ParamResult<()>) -> ApiResult<bool> {
    match result {
        Ok(()) => Ok(true),
        Err(ParamError::Unsupported { name }) => {
            tracing::debug!(param = %name, "临时参数，仅更新内存值");
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

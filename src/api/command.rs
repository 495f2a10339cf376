// ==========================================
// 参数持久化子系统 - 控制台命令解析
// ==========================================
// 命令: param list | read | save | erase | default [name]
//             | set <name> <value> | export | import <json>
// 分词: 双引号包裹含空格的参数，反斜杠转义下一个字符
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::i18n::t;

/// 控制面命令，每个对应一个注册表操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamCommand {
    List,
    Read,
    Save,
    Erase,
    /// None 表示全部恢复默认
    Default(Option<String>),
    Set { name: String, value: String },
    Export,
    Import(String),
}

impl ParamCommand {
    /// 从参数列表解析（不含命令名 `param`）
    ///
    /// `set` 与 `import` 的剩余参数以单个空格拼接，允许值中含空格。
    pub fn parse(args: &[&str]) -> ApiResult<Self> {
        let (action, rest) = match args.split_first() {
            Some((action, rest)) => (*action, rest),
            None => return Err(usage_error()),
        };

        match action {
            "list" => Ok(ParamCommand::List),
            "read" => Ok(ParamCommand::Read),
            "save" => Ok(ParamCommand::Save),
            "erase" => Ok(ParamCommand::Erase),
            "export" => Ok(ParamCommand::Export),
            "default" => Ok(ParamCommand::Default(
                rest.first()
                    .map(|name| name.trim())
                    .filter(|name| !name.is_empty())
                    .map(str::to_string),
            )),
            "set" => match rest.split_first() {
                Some((name, value)) if !value.is_empty() => Ok(ParamCommand::Set {
                    name: name.to_string(),
                    value: value.join(" "),
                }),
                _ => Err(ApiError::InvalidInput(t("param.set_requires"))),
            },
            "import" if !rest.is_empty() => Ok(ParamCommand::Import(rest.join(" "))),
            "import" => Err(ApiError::InvalidInput(t("param.import_requires"))),
            _ => Err(usage_error()),
        }
    }

    /// 从一行文本解析；允许以 `param` 开头
    ///
    /// - `import` 取行尾原文作为 JSON，不做分词
    /// - `set` 的值只有一个参数时去掉引号；多个参数时取行尾原文
    pub fn parse_line(line: &str) -> ApiResult<Self> {
        let line = line.trim();
        let line = match line.split_once(char::is_whitespace) {
            Some(("param", rest)) => rest.trim_start(),
            _ if line == "param" => "",
            _ => line,
        };
        let (action, rest) = match line.split_once(char::is_whitespace) {
            Some((action, rest)) => (action, rest.trim()),
            None => (line, ""),
        };

        match action {
            "import" if !rest.is_empty() => Ok(ParamCommand::Import(rest.to_string())),
            "set" => parse_set(rest),
            _ => {
                let args = split_args(rest)?;
                let mut tokens = vec![action];
                tokens.extend(args.iter().map(|arg| arg.text.as_str()));
                Self::parse(&tokens)
            }
        }
    }
}

/// 分词结果：去引号后的文本 + 在原行中的起始字节偏移
#[derive(Debug)]
struct Arg {
    text: String,
    start: usize,
}

impl Arg {
    fn starting_at(start: usize) -> Self {
        Self {
            text: String::new(),
            start,
        }
    }
}

fn split_args(line: &str) -> ApiResult<Vec<Arg>> {
    let mut args = Vec::new();
    let mut current: Option<Arg> = None;
    let mut quoted = false;
    let mut chars = line.char_indices();

    while let Some((pos, ch)) = chars.next() {
        match ch {
            '\\' => {
                let arg = current.get_or_insert_with(|| Arg::starting_at(pos));
                match chars.next() {
                    Some((_, escaped)) => arg.text.push(escaped),
                    None => arg.text.push('\\'),
                }
            }
            '"' => {
                current.get_or_insert_with(|| Arg::starting_at(pos));
                quoted = !quoted;
            }
            c if c.is_whitespace() && !quoted => args.extend(current.take()),
            c => current
                .get_or_insert_with(|| Arg::starting_at(pos))
                .text
                .push(c),
        }
    }

    if quoted {
        return Err(ApiError::InvalidInput(t("param.unterminated_quote")));
    }
    args.extend(current);
    Ok(args)
}

fn parse_set(rest: &str) -> ApiResult<ParamCommand> {
    let args = split_args(rest)?;
    match args.split_first() {
        Some((name, values)) if !values.is_empty() => {
            let value = match values {
                [single] => single.text.clone(),
                [first, ..] => rest[first.start..].to_string(),
                [] => String::new(),
            };
            Ok(ParamCommand::Set {
                name: name.text.clone(),
                value,
            })
        }
        _ => Err(ApiError::InvalidInput(t("param.set_requires"))),
    }
}

fn usage_error() -> ApiError {
    ApiError::InvalidInput(t("param.usage"))
}

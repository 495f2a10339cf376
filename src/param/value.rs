// ==========================================
// 参数持久化子系统 - 参数值类型
// ==========================================
// 职责: 封闭的值类型集合 + 每种类型的编解码/解析/格式化
// 持久化格式:
// - Str:   原始字节（无结尾符），读取时截断到 STRING_READ_CAP
// - Int:   i32 小端 4 字节
// - Bool:  1 字节（非零为 true）
// - Float: f32 小端 4 字节
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// 字符串参数读取缓冲上限（字节）
pub const STRING_READ_CAP: usize = 150;

/// 参数值类型标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    Str,
    Int,
    Bool,
    /// 只接受有限值，保证文本往返相等
    Float,
}

impl ParamKind {
    /// 定长类型的字节宽度；字符串为 None
    pub fn fixed_width(self) -> Option<usize> {
        match self {
            ParamKind::Str => None,
            ParamKind::Int => Some(4),
            ParamKind::Bool => Some(1),
            ParamKind::Float => Some(4),
        }
    }

    /// 读取时向存储请求的最大长度
    ///
    /// 定长类型多请求一个字节，用于识别长度不符的旧数据。
    pub fn read_len(self) -> usize {
        match self.fixed_width() {
            Some(width) => width + 1,
            None => STRING_READ_CAP,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ParamKind::Str => "str",
            ParamKind::Int => "int",
            ParamKind::Bool => "bool",
            ParamKind::Float => "float",
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 参数值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ParamValue {
    Str(String),
    Int(i32),
    Bool(bool),
    Float(f32),
}

/// 解析失败原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure(pub String);

impl ParamValue {
    pub fn kind(&self) -> ParamKind {
        match self {
            ParamValue::Str(_) => ParamKind::Str,
            ParamValue::Int(_) => ParamKind::Int,
            ParamValue::Bool(_) => ParamKind::Bool,
            ParamValue::Float(_) => ParamKind::Float,
        }
    }

    /// 编码为持久化字节
    pub fn encode(&self) -> Vec<u8> {
        match self {
            ParamValue::Str(s) => s.as_bytes().to_vec(),
            ParamValue::Int(i) => i.to_le_bytes().to_vec(),
            ParamValue::Bool(b) => vec![u8::from(*b)],
            ParamValue::Float(f) => f.to_le_bytes().to_vec(),
        }
    }

    /// 按类型解码持久化字节
    ///
    /// 字符串：超出 STRING_READ_CAP 的部分被截断，非法 UTF-8 以替换字符呈现。
    /// 定长类型：长度必须与宽度一致。
    pub fn decode(kind: ParamKind, bytes: &[u8]) -> Result<Self, ParseFailure> {
        match kind {
            ParamKind::Str => {
                let capped = &bytes[..bytes.len().min(STRING_READ_CAP)];
                Ok(ParamValue::Str(String::from_utf8_lossy(capped).into_owned()))
            }
            ParamKind::Int => fixed::<4>(kind, bytes).map(|b| ParamValue::Int(i32::from_le_bytes(b))),
            ParamKind::Bool => fixed::<1>(kind, bytes).map(|b| ParamValue::Bool(b[0] != 0)),
            ParamKind::Float => {
                fixed::<4>(kind, bytes).map(|b| ParamValue::Float(f32::from_le_bytes(b)))
            }
        }
    }

    /// 按类型文法解析文本
    ///
    /// - Str:   原样接受
    /// - Int:   十进制有符号整数，必须完整匹配
    /// - Bool:  "true"/"1" → true，"false"/"0" → false，其余按整数解析取真值
    /// - Float: 十进制浮点数，必须完整匹配且为有限值（拒绝 NaN / inf）
    pub fn parse(kind: ParamKind, text: &str) -> Result<Self, ParseFailure> {
        match kind {
            ParamKind::Str => Ok(ParamValue::Str(text.to_string())),
            ParamKind::Int => parse_int(text).map(ParamValue::Int),
            ParamKind::Bool => match text {
                "true" | "1" => Ok(ParamValue::Bool(true)),
                "false" | "0" => Ok(ParamValue::Bool(false)),
                other => parse_int(other)
                    .map(|n| ParamValue::Bool(n != 0))
                    .map_err(|_| ParseFailure(format!("无法解析为布尔值: {:?}", other))),
            },
            ParamKind::Float => text
                .parse::<f32>()
                .ok()
                .filter(|f| f.is_finite())
                .map(ParamValue::Float)
                .ok_or_else(|| ParseFailure(format!("无法解析为有限浮点数: {:?}", text))),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Str(s) => f.write_str(s),
            ParamValue::Int(i) => write!(f, "{}", i),
            ParamValue::Bool(b) => f.write_str(if *b { "true" } else { "false" }),
            ParamValue::Float(v) => write!(f, "{}", v),
        }
    }
}

fn parse_int(text: &str) -> Result<i32, ParseFailure> {
    text.parse::<i32>()
        .map_err(|_| ParseFailure(format!("无法解析为整数: {:?}", text)))
}

fn fixed<const N: usize>(kind: ParamKind, bytes: &[u8]) -> Result<[u8; N], ParseFailure> {
    <[u8; N]>::try_from(bytes).map_err(|_| {
        ParseFailure(format!(
            "{} 类型需要 {} 字节，实际 {} 字节",
            kind,
            N,
            bytes.len()
        ))
    })
}

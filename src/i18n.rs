// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库，消息目录见 locales/
// 支持中文（默认）和英文
// 带参数的消息直接用 rust_i18n::t!(key, name = value)
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

/// 选择语言的环境变量
pub const ENV_LANG: &str = "NVS_PARAMS_LANG";

/// 消息目录中已有的语言
pub fn available_locales() -> Vec<&'static str> {
    rust_i18n::available_locales!()
}

/// 切换语言
///
/// 目录中没有的语言不切换，返回 false。
pub fn set_locale(locale: &str) -> bool {
    if !available_locales().contains(&locale) {
        tracing::warn!(locale = %locale, available = ?available_locales(), "不支持的语言，保持当前设置");
        return false;
    }
    rust_i18n::set_locale(locale);
    true
}

/// 按 NVS_PARAMS_LANG 选择语言；未设置时保持默认
pub fn init_from_env() {
    if let Some(lang) = std::env::var(ENV_LANG)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
    {
        set_locale(&lang);
    }
}

/// 翻译消息（无参数）
///
/// # 示例
/// ```no_run
/// use nvs_params::i18n::t;
/// let msg = t("param.saved");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

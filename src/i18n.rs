// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持英文（默认）和中文
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 设置语言
///
/// # 参数
/// - locale: 语言代码（"en" 或 "zh-CN"）
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

/// 翻译消息（无参数）
///
/// # 示例
/// ```no_run
/// use visa_inventory::i18n::t;
/// let msg = t("visa_category.EB1");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息（带参数）
///
/// # 示例
/// ```no_run
/// use visa_inventory::i18n::t_with_args;
/// let msg = t_with_args("files.deleted", &[("file", "eb_inventory_march_2024.xlsx")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    let mut result = rust_i18n::t!(key).to_string();
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}

/// 签证类别展示名；未收录的类别返回短码本身
pub fn visa_display_name(code: &str) -> String {
    if code.is_empty() {
        return String::new();
    }
    let key = format!("visa_category.{}", code);
    let translated = t(&key);
    // 未命中时 rust-i18n 原样返回键名
    if translated == key || translated.ends_with(&key) {
        code.to_string()
    } else {
        translated
    }
}

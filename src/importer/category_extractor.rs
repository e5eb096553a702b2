// ==========================================
// 签证排期库存 - 签证类别提取
// ==========================================
// 规则: 标签中第一个 "(大写字母/数字)" 为类别短码
//       未匹配时原样返回（视为短码本身）
// ==========================================

use once_cell::sync::Lazy;
use regex::Regex;

static CATEGORY_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(([A-Z0-9]+)\)").expect("valid category regex"));

pub struct CategoryExtractor;

impl CategoryExtractor {
    pub fn extract_code(label: &str) -> String {
        if label.is_empty() {
            return String::new();
        }
        match CATEGORY_CODE.captures(label).and_then(|c| c.get(1)) {
            Some(code) => code.as_str().to_string(),
            None => label.to_string(),
        }
    }
}

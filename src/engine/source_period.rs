// ==========================================
// 签证排期库存 - 文件报告期解析
// ==========================================
// 文件命名约定: eb_inventory_<月份>_<年份>.<扩展名>
// 用途: 最新文件选择、趋势排序、趋势标签
// ==========================================

use crate::domain::{ReportMonth, SortKey};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

static PERIOD_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)eb_inventory_([a-z]+)_([0-9]{4})").expect("valid period regex")
});

const FILE_PREFIX: &str = "eb_inventory_";

// ==========================================
// SourcePeriod - 文件发布期（月份 + 年份）
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourcePeriod {
    // 字段顺序决定 Ord：先年后月
    pub year: i32,
    pub month: ReportMonth,
}

impl SourcePeriod {
    /// 从文件键解析发布期；月份名不区分大小写
    pub fn from_file_key(key: &str) -> Option<Self> {
        let caps = PERIOD_PATTERN.captures(key)?;
        let month = month_from_any_case(caps.get(1)?.as_str())?;
        let year = caps.get(2)?.as_str().parse::<i32>().ok()?;
        Some(Self { year, month })
    }

    pub fn sort_key(&self) -> Option<SortKey> {
        SortKey::new(self.year, self.month)
    }
}

fn month_from_any_case(raw: &str) -> Option<ReportMonth> {
    ReportMonth::ALL
        .into_iter()
        .find(|m| m.name().eq_ignore_ascii_case(raw))
}

/// 趋势标签: "eb_inventory_march_2024.xlsx" → "March 2024"
pub fn display_label(key: &str) -> String {
    let stem = Path::new(key)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(key);
    let stem = stem.strip_prefix(FILE_PREFIX).unwrap_or(stem);

    stem.split(|c: char| c == '_' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .map(title_case)
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// 发布期最新的文件；无可解析发布期时返回 None
///
/// 同一发布期有多个文件时取键名最大的
pub fn latest_file<'a, I>(keys: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    keys.into_iter()
        .filter_map(|key| SourcePeriod::from_file_key(key).map(|p| (p, key)))
        .max()
        .map(|(_, key)| key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_period() {
        let period = SourcePeriod::from_file_key("eb_inventory_march_2024.xlsx").unwrap();
        assert_eq!(period.month, ReportMonth::March);
        assert_eq!(period.year, 2024);
        assert_eq!(period.sort_key().unwrap().as_str(), "2024-03");

        assert!(SourcePeriod::from_file_key("EB_Inventory_December_2023.xlsx").is_some());
        assert!(SourcePeriod::from_file_key("eb_inventory_smarch_2024.xlsx").is_none());
        assert!(SourcePeriod::from_file_key("inventory.xlsx").is_none());
    }

    #[test]
    fn test_period_ordering() {
        let dec_2023 = SourcePeriod::from_file_key("eb_inventory_december_2023.xlsx").unwrap();
        let jan_2024 = SourcePeriod::from_file_key("eb_inventory_january_2024.xlsx").unwrap();
        let mar_2024 = SourcePeriod::from_file_key("eb_inventory_march_2024.xlsx").unwrap();
        assert!(dec_2023 < jan_2024);
        assert!(jan_2024 < mar_2024);
    }

    #[test]
    fn test_display_label() {
        assert_eq!(display_label("eb_inventory_march_2024.xlsx"), "March 2024");
        assert_eq!(display_label("eb_inventory_june_2023.csv"), "June 2023");
        assert_eq!(display_label("custom_upload.xlsx"), "Custom Upload");
    }

    #[test]
    fn test_latest_file() {
        let keys = [
            "eb_inventory_march_2024.xlsx",
            "eb_inventory_december_2023.xlsx",
            "notes.xlsx",
            "eb_inventory_january_2024.xlsx",
        ];
        assert_eq!(latest_file(keys), Some("eb_inventory_march_2024.xlsx"));
        assert_eq!(latest_file(["notes.xlsx"]), None);
        assert_eq!(latest_file(Vec::<&str>::new()), None);
    }
}

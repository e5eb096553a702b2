// ==========================================
// 签证排期库存 - 日期标准化
// ==========================================
// 规则: (英文月份全称, 年份) → "YYYY-MM"
// 红线: 不依赖系统区域设置，不依赖当前日期
// ==========================================

use crate::domain::{ReportMonth, SortKey};
use crate::importer::error::{ImportError, ImportResult};

// ==========================================
// YearInput - 年份输入（整数或字符串）
// ==========================================
pub trait YearInput {
    fn to_year(&self) -> ImportResult<i32>;
}

impl YearInput for i32 {
    fn to_year(&self) -> ImportResult<i32> {
        Ok(*self)
    }
}

impl YearInput for u16 {
    fn to_year(&self) -> ImportResult<i32> {
        Ok(i32::from(*self))
    }
}

impl YearInput for &str {
    fn to_year(&self) -> ImportResult<i32> {
        let trimmed = self.trim();
        if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Err(ImportError::InvalidYear(self.to_string()));
        }
        trimmed
            .parse::<i32>()
            .map_err(|_| ImportError::InvalidYear(self.to_string()))
    }
}

impl YearInput for String {
    fn to_year(&self) -> ImportResult<i32> {
        self.as_str().to_year()
    }
}

impl YearInput for &String {
    fn to_year(&self) -> ImportResult<i32> {
        self.as_str().to_year()
    }
}

// ==========================================
// DateNormalizer
// ==========================================
pub struct DateNormalizer;

impl DateNormalizer {
    /// 月份全称（大小写敏感）→ ReportMonth
    pub fn resolve_month(month_name: &str) -> ImportResult<ReportMonth> {
        ReportMonth::from_name(month_name)
            .ok_or_else(|| ImportError::InvalidMonth(month_name.to_string()))
    }

    /// 生成排序键
    ///
    /// # 返回
    /// - Ok(SortKey): 如 "2020-03"
    /// - Err(InvalidMonth): 月份无法识别
    /// - Err(InvalidYear): 年份无法解析或超出 0-9999
    pub fn to_sort_key<Y: YearInput>(month_name: &str, year: Y) -> ImportResult<SortKey> {
        let month = Self::resolve_month(month_name)?;
        let year = year.to_year()?;
        Self::from_parts(month, year)
    }

    /// 已解析月份 + 年份
    pub fn from_parts(month: ReportMonth, year: i32) -> ImportResult<SortKey> {
        SortKey::new(year, month).ok_or_else(|| ImportError::InvalidYear(year.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_key_basic() {
        let key = DateNormalizer::to_sort_key("March", 2020).unwrap();
        assert_eq!(key.as_str(), "2020-03");
        assert_eq!(key.as_str().len(), 7);
    }

    #[test]
    fn test_sort_key_year_as_string() {
        let key = DateNormalizer::to_sort_key("December", "2021").unwrap();
        assert_eq!(key.as_str(), "2021-12");

        let key = DateNormalizer::to_sort_key("January", " 2019 ").unwrap();
        assert_eq!(key.as_str(), "2019-01");

        let owned = String::from("2018");
        let key = DateNormalizer::to_sort_key("July", &owned).unwrap();
        assert_eq!(key.as_str(), "2018-07");
    }

    #[test]
    fn test_sort_key_lexically_monotonic() {
        let a = DateNormalizer::to_sort_key("January", 2020).unwrap();
        let b = DateNormalizer::to_sort_key("December", 2020).unwrap();
        let c = DateNormalizer::to_sort_key("January", 2021).unwrap();
        assert!(a < b);
        assert!(b < c);
        assert!(a.as_str() < b.as_str() && b.as_str() < c.as_str());
    }

    #[test]
    fn test_all_months_have_seven_char_keys() {
        for month in ReportMonth::ALL {
            let key = DateNormalizer::to_sort_key(month.name(), 2024).unwrap();
            assert_eq!(key.as_str().len(), 7);
            assert!(key.as_str().ends_with(&format!("{:02}", month.index())));
        }
    }

    #[test]
    fn test_invalid_month() {
        let result = DateNormalizer::to_sort_key("march", 2020);
        assert!(matches!(result, Err(ImportError::InvalidMonth(m)) if m == "march"));

        let result = DateNormalizer::to_sort_key("", 2020);
        assert!(matches!(result, Err(ImportError::InvalidMonth(_))));
    }

    #[test]
    fn test_invalid_year() {
        assert!(matches!(
            DateNormalizer::to_sort_key("March", "20x0"),
            Err(ImportError::InvalidYear(_))
        ));
        assert!(matches!(
            DateNormalizer::to_sort_key("March", 12_345),
            Err(ImportError::InvalidYear(_))
        ));
        assert!(matches!(
            DateNormalizer::to_sort_key("March", "-2020"),
            Err(ImportError::InvalidYear(_))
        ));
    }

    #[test]
    fn test_short_year_is_zero_padded() {
        let key = DateNormalizer::to_sort_key("May", 999).unwrap();
        assert_eq!(key.as_str(), "0999-05");
    }
}

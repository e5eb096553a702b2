// ==========================================
// 签证排期库存 - 导入配置
// ==========================================
// 职责: 年份范围、排除工作表、列名、表头定位策略
// 红线: 只含配置值，不含解析逻辑
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// 参考报表使用的年份范围
pub const DEFAULT_FIRST_YEAR: i32 = 2015;
pub const DEFAULT_LAST_YEAR: i32 = 2024;

/// 说明页名称（不含数据）
pub const DEFAULT_EXCLUDED_SHEET: &str = "How to Read This Report";

/// 固定表头偏移模式下跳过的横幅行数
pub const DEFAULT_BANNER_ROWS: usize = 3;

/// 排序键为 4 位年份
pub const MIN_YEAR: i32 = 0;
pub const MAX_YEAR: i32 = 9999;

// ==========================================
// YearRange - 报告年份范围（闭区间）
// ==========================================
// 只能经 new 构造（反序列化同样校验），保证每个年份都能生成排序键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawYearRange")]
pub struct YearRange {
    first: i32,
    last: i32,
}

#[derive(Deserialize)]
struct RawYearRange {
    first: i32,
    last: i32,
}

impl TryFrom<RawYearRange> for YearRange {
    type Error = String;

    fn try_from(raw: RawYearRange) -> Result<Self, Self::Error> {
        YearRange::new(raw.first, raw.last).ok_or_else(|| {
            format!(
                "年份范围无效: {}-{}（需在 {}-{} 内且起始不大于结束）",
                raw.first, raw.last, MIN_YEAR, MAX_YEAR
            )
        })
    }
}

impl YearRange {
    pub fn new(first: i32, last: i32) -> Option<Self> {
        let valid = (MIN_YEAR..=MAX_YEAR).contains(&first)
            && (MIN_YEAR..=MAX_YEAR).contains(&last)
            && first <= last;
        valid.then_some(Self { first, last })
    }

    pub fn first(&self) -> i32 {
        self.first
    }

    pub fn last(&self) -> i32 {
        self.last
    }

    /// 升序遍历
    pub fn years(&self) -> std::ops::RangeInclusive<i32> {
        self.first..=self.last
    }
}

impl Default for YearRange {
    fn default() -> Self {
        Self {
            first: DEFAULT_FIRST_YEAR,
            last: DEFAULT_LAST_YEAR,
        }
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.first, self.last)
    }
}

impl FromStr for YearRange {
    type Err = String;

    /// 格式: "2015-2024"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (first, last) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| format!("年份范围格式错误: {}（期望 YYYY-YYYY）", s))?;
        let first: i32 = first
            .trim()
            .parse()
            .map_err(|_| format!("起始年份无效: {}", first))?;
        let last: i32 = last
            .trim()
            .parse()
            .map_err(|_| format!("结束年份无效: {}", last))?;
        YearRange::new(first, last).ok_or_else(|| {
            format!(
                "年份范围无效: {}（需在 {}-{} 内且起始不大于结束）",
                s, MIN_YEAR, MAX_YEAR
            )
        })
    }
}

// ==========================================
// RowLayout - 表头定位策略
// ==========================================
// FixedOffset: 跳过固定横幅行，下一行即表头（上传/列表接口）
// ScanForHeader: 扫描原始网格，找到同时包含两个标记列名的行
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RowLayout {
    FixedOffset { skip_rows: usize },
    ScanForHeader,
}

impl Default for RowLayout {
    fn default() -> Self {
        RowLayout::FixedOffset {
            skip_rows: DEFAULT_BANNER_ROWS,
        }
    }
}

impl fmt::Display for RowLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowLayout::FixedOffset { skip_rows } => write!(f, "fixed_offset:{}", skip_rows),
            RowLayout::ScanForHeader => write!(f, "scan_for_header"),
        }
    }
}

impl FromStr for RowLayout {
    type Err = String;

    /// 格式: "fixed_offset" / "fixed_offset:3" / "scan_for_header"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().to_lowercase();
        match value.split_once(':') {
            Some(("fixed_offset", n)) => n
                .trim()
                .parse::<usize>()
                .map(|skip_rows| RowLayout::FixedOffset { skip_rows })
                .map_err(|_| format!("横幅行数无效: {}", n)),
            None if value == "fixed_offset" => Ok(RowLayout::default()),
            None if value == "scan_for_header" => Ok(RowLayout::ScanForHeader),
            _ => Err(format!(
                "未知的表头定位策略: {}（fixed_offset[:N] / scan_for_header）",
                s
            )),
        }
    }
}

// ==========================================
// ColumnNames - 报表列名
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub country: String,
    pub preference_category: String,
    pub visa_status: String,
    pub priority_month: String,
    /// 年份列前缀，完整列名为 "{prefix}{year}"
    pub year_column_prefix: String,
}

impl ColumnNames {
    pub fn year_column(&self, year: i32) -> String {
        format!("{}{}", self.year_column_prefix, year)
    }
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            country: "Country Of Chargeability".to_string(),
            preference_category: "Preference Category".to_string(),
            visa_status: "Visa Status".to_string(),
            priority_month: "Priority Date Month".to_string(),
            year_column_prefix: "Priority Date Year - ".to_string(),
        }
    }
}

// ==========================================
// IngestConfig - 导入管道配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    pub year_range: YearRange,
    pub excluded_sheet: String,
    pub columns: ColumnNames,
    /// ScanForHeader 模式下表头行必须同时包含的列名
    pub header_markers: Vec<String>,
    pub row_layout: RowLayout,
}

impl IngestConfig {
    pub fn with_row_layout(mut self, row_layout: RowLayout) -> Self {
        self.row_layout = row_layout;
        self
    }

    pub fn with_year_range(mut self, year_range: YearRange) -> Self {
        self.year_range = year_range;
        self
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        let columns = ColumnNames::default();
        let header_markers = vec![
            columns.preference_category.clone(),
            columns.priority_month.clone(),
        ];
        Self {
            year_range: YearRange::default(),
            excluded_sheet: DEFAULT_EXCLUDED_SHEET.to_string(),
            columns,
            header_markers,
            row_layout: RowLayout::default(),
        }
    }
}

// ==========================================
// StorageConfig - 上传文件存储配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub upload_dir: PathBuf,
    /// 小写扩展名，不含点
    pub allowed_extensions: Vec<String>,
}

impl StorageConfig {
    pub fn is_allowed(&self, file_name: &str) -> bool {
        std::path::Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|ext| {
                let ext = ext.to_lowercase();
                self.allowed_extensions.iter().any(|a| *a == ext)
            })
            .unwrap_or(false)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: crate::app::get_default_upload_dir(),
            allowed_extensions: vec!["xlsx".to_string(), "xls".to_string(), "csv".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_range_parse() {
        let range: YearRange = "2015-2024".parse().unwrap();
        assert_eq!(range, YearRange::default());
        assert_eq!(range.years().count(), 10);
        assert_eq!((range.first(), range.last()), (2015, 2024));

        assert!("2024-2015".parse::<YearRange>().is_err());
        assert!("2015".parse::<YearRange>().is_err());
        assert!("2015-10000".parse::<YearRange>().is_err());
    }

    #[test]
    fn test_year_range_deserialize_validates() {
        let range: YearRange = serde_json::from_str(r#"{"first":2020,"last":2022}"#).unwrap();
        assert_eq!(range, YearRange::new(2020, 2022).unwrap());

        assert!(serde_json::from_str::<YearRange>(r#"{"first":2024,"last":2015}"#).is_err());
        assert!(serde_json::from_str::<YearRange>(r#"{"first":2015,"last":12000}"#).is_err());
        assert!(serde_json::from_str::<YearRange>(r#"{"first":-5,"last":2015}"#).is_err());
        assert!(YearRange::new(-1, 2000).is_none());
    }

    #[test]
    fn test_row_layout_parse() {
        assert_eq!(
            "fixed_offset".parse::<RowLayout>().unwrap(),
            RowLayout::FixedOffset { skip_rows: 3 }
        );
        assert_eq!(
            "fixed_offset:5".parse::<RowLayout>().unwrap(),
            RowLayout::FixedOffset { skip_rows: 5 }
        );
        assert_eq!(
            "Scan_For_Header".parse::<RowLayout>().unwrap(),
            RowLayout::ScanForHeader
        );
        assert!("whatever".parse::<RowLayout>().is_err());
    }

    #[test]
    fn test_row_layout_serde_tag() {
        let json = serde_json::to_value(RowLayout::FixedOffset { skip_rows: 3 }).unwrap();
        assert_eq!(json["mode"], "fixed_offset");
        assert_eq!(json["skip_rows"], 3);

        let layout: RowLayout =
            serde_json::from_str(r#"{"mode":"scan_for_header"}"#).unwrap();
        assert_eq!(layout, RowLayout::ScanForHeader);
    }

    #[test]
    fn test_default_markers_follow_columns() {
        let config = IngestConfig::default();
        assert_eq!(
            config.header_markers,
            vec!["Preference Category", "Priority Date Month"]
        );
        assert_eq!(
            config.columns.year_column(2021),
            "Priority Date Year - 2021"
        );
    }

    #[test]
    fn test_allowed_extensions() {
        let storage = StorageConfig {
            upload_dir: PathBuf::from("/tmp"),
            allowed_extensions: vec!["xlsx".to_string()],
        };
        assert!(storage.is_allowed("eb_inventory_march_2024.XLSX"));
        assert!(!storage.is_allowed("notes.txt"));
        assert!(!storage.is_allowed("no_extension"));
    }
}

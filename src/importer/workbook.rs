// ==========================================
// 签证排期库存 - 工作簿抽象
// ==========================================
// 职责: 与文件格式无关的内存工作簿（工作表名 + 原始网格）
// 提供: 原始网格 + 固定偏移表头行读取 + 表头键控行
// ==========================================

use std::collections::HashMap;

// ==========================================
// CellValue - 单元格值
// ==========================================
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Int(i64),
    Bool(bool),
}

impl CellValue {
    pub fn text<S: Into<String>>(value: S) -> Self {
        CellValue::Text(value.into())
    }

    /// 空单元格或纯空白文本
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// 文本形式（已 TRIM；整数值浮点不带小数位）
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.trim().to_string(),
            CellValue::Number(f) => {
                if f.is_finite() && *f == f.trunc() && f.abs() < 1e15 {
                    format!("{}", *f as i64)
                } else {
                    f.to_string()
                }
            }
            CellValue::Int(i) => i.to_string(),
            CellValue::Bool(b) => b.to_string(),
        }
    }

    /// 解析为非负整数计数
    ///
    /// # 规则
    /// - 整数: 原值（负数拒绝）
    /// - 浮点: 向零截断（非有限值/负数拒绝）
    /// - 文本: TRIM 后去除千分位逗号，按整数或小数（截断）解析
    /// - 空值/布尔: 拒绝
    pub fn as_count(&self) -> Option<u64> {
        match self {
            CellValue::Int(i) => u64::try_from(*i).ok(),
            CellValue::Number(f) => truncate_count(*f),
            CellValue::Text(s) => parse_count_text(s),
            CellValue::Empty | CellValue::Bool(_) => None,
        }
    }
}

fn truncate_count(value: f64) -> Option<u64> {
    if !value.is_finite() || value < 0.0 || value >= u64::MAX as f64 {
        return None;
    }
    Some(value.trunc() as u64)
}

fn parse_count_text(raw: &str) -> Option<u64> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned
        .parse::<u64>()
        .ok()
        .or_else(|| cleaned.parse::<f64>().ok().and_then(truncate_count))
}

// ==========================================
// HeaderKeyedRow - 表头键控行
// ==========================================
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HeaderKeyedRow {
    /// 工作表中的行号（从 1 开始）
    pub row_number: usize,
    pub cells: HashMap<String, CellValue>,
}

impl HeaderKeyedRow {
    /// 由 (列名, 值) 构造
    pub fn from_pairs<K, I>(row_number: usize, pairs: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, CellValue)>,
    {
        Self {
            row_number,
            cells: pairs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// 按位置映射: 表头列名 TRIM，空列名跳过，缺失单元格补空
    pub fn from_positional(row_number: usize, headers: &[CellValue], row: &[CellValue]) -> Self {
        let mut cells = HashMap::with_capacity(headers.len());
        for (col_idx, header) in headers.iter().enumerate() {
            let key = header.to_text();
            if key.is_empty() {
                continue;
            }
            let value = row.get(col_idx).cloned().unwrap_or_default();
            cells.insert(key, value);
        }
        Self { row_number, cells }
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells.get(column)
    }

    /// 非空文本（TRIM 后）
    pub fn text(&self, column: &str) -> Option<String> {
        self.get(column)
            .map(CellValue::to_text)
            .filter(|v| !v.is_empty())
    }

    pub fn is_blank(&self) -> bool {
        self.cells.values().all(CellValue::is_blank)
    }
}

// ==========================================
// Sheet - 工作表（绝对坐标网格）
// ==========================================
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sheet {
    pub name: String,
    /// grid[0] 对应工作表第 1 行，grid[r][0] 对应 A 列
    pub grid: Vec<Vec<CellValue>>,
}

impl Sheet {
    pub fn new<S: Into<String>>(name: S, grid: Vec<Vec<CellValue>>) -> Self {
        Self {
            name: name.into(),
            grid,
        }
    }

    /// 固定偏移读取: 跳过前 skip_rows 行，下一行为表头，其后非空行转换为键控行
    ///
    /// 表头行不存在时返回空列表
    pub fn header_rows(&self, skip_rows: usize) -> Vec<HeaderKeyedRow> {
        let Some(headers) = self.grid.get(skip_rows) else {
            return Vec::new();
        };

        self.grid
            .iter()
            .enumerate()
            .skip(skip_rows + 1)
            .filter(|(_, row)| !row.iter().all(CellValue::is_blank))
            .map(|(idx, row)| HeaderKeyedRow::from_positional(idx + 1, headers, row))
            .collect()
    }
}

// ==========================================
// Workbook - 工作簿
// ==========================================
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_row(values: &[&str]) -> Vec<CellValue> {
        values
            .iter()
            .map(|v| {
                if v.is_empty() {
                    CellValue::Empty
                } else {
                    CellValue::text(*v)
                }
            })
            .collect()
    }

    #[test]
    fn test_as_count_rules() {
        assert_eq!(CellValue::Int(150).as_count(), Some(150));
        assert_eq!(CellValue::Int(-3).as_count(), None);
        assert_eq!(CellValue::Number(42.0).as_count(), Some(42));
        assert_eq!(CellValue::Number(42.9).as_count(), Some(42));
        assert_eq!(CellValue::Number(-1.0).as_count(), None);
        assert_eq!(CellValue::Number(f64::NAN).as_count(), None);
        assert_eq!(CellValue::text(" 150 ").as_count(), Some(150));
        assert_eq!(CellValue::text("1,234").as_count(), Some(1234));
        assert_eq!(CellValue::text("12.7").as_count(), Some(12));
        assert_eq!(CellValue::text("abc").as_count(), None);
        assert_eq!(CellValue::text("").as_count(), None);
        assert_eq!(CellValue::text("-5").as_count(), None);
        assert_eq!(CellValue::Bool(true).as_count(), None);
        assert_eq!(CellValue::Empty.as_count(), None);
    }

    #[test]
    fn test_to_text_whole_number() {
        assert_eq!(CellValue::Number(2021.0).to_text(), "2021");
        assert_eq!(CellValue::Number(1.5).to_text(), "1.5");
        assert_eq!(CellValue::text("  India ").to_text(), "India");
    }

    #[test]
    fn test_from_positional_trims_and_skips_blank_headers() {
        let headers = text_row(&[" Country Of Chargeability ", "", "Visa Status"]);
        let row = text_row(&["India", "ignored"]);

        let keyed = HeaderKeyedRow::from_positional(5, &headers, &row);
        assert_eq!(keyed.row_number, 5);
        assert_eq!(keyed.cells.len(), 2);
        assert_eq!(keyed.text("Country Of Chargeability"), Some("India".to_string()));
        // 缺失单元格补空
        assert_eq!(keyed.get("Visa Status"), Some(&CellValue::Empty));
        assert_eq!(keyed.text("Visa Status"), None);
    }

    #[test]
    fn test_header_rows_skips_banner_and_blank_rows() {
        let sheet = Sheet::new(
            "Data",
            vec![
                text_row(&["Employment-Based Inventory"]),
                text_row(&["As of March 2024"]),
                vec![],
                text_row(&["Country Of Chargeability", "Priority Date Month"]),
                text_row(&["India", "March"]),
                text_row(&["", ""]),
                text_row(&["China", "April"]),
            ],
        );

        let rows = sheet.header_rows(3);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].row_number, 5);
        assert_eq!(rows[1].row_number, 7);
        assert_eq!(rows[1].text("Country Of Chargeability"), Some("China".to_string()));
    }

    #[test]
    fn test_header_rows_short_sheet() {
        let sheet = Sheet::new("Data", vec![text_row(&["only banner"])]);
        assert!(sheet.header_rows(3).is_empty());
    }

    #[test]
    fn test_workbook_keeps_sheet_order() {
        let workbook = Workbook::new(vec![
            Sheet::new("How to Read This Report", vec![]),
            Sheet::new("Data", vec![text_row(&["a"])]),
        ]);
        let names: Vec<&str> = workbook.sheets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["How to Read This Report", "Data"]);
        assert_eq!(workbook.sheets[1].grid.len(), 1);
    }
}

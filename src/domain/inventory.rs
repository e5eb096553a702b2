// ==========================================
// 签证排期库存 - 库存记录与导入报告
// ==========================================
// 职责: 定义标准化库存记录、行级问题、文件级报告
// 红线: 只含数据结构，不含解析逻辑
// ==========================================

use crate::domain::types::{ReportMonth, SortKey};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// InventoryRecord - 标准化库存记录
// ==========================================
// 由 RowTransformer 生成，不可变；一行最多生成"年份范围"条记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    /// 配额国家（非空）
    pub country: String,
    /// 签证类别短码（如 EB1）
    pub visa_category: String,
    /// 签证状态（可为空）
    pub status: String,
    /// 库存所属月份（非文件发布月份）
    pub report_month: ReportMonth,
    /// 库存所属年份
    pub report_year: i32,
    /// YYYY-MM 排序键
    pub sort_key: SortKey,
    /// 待处理案件数
    pub inventory: u64,
    /// 来源文件键
    pub source_file: String,
}

/// 库存合计（饱和加法，单元格可达 u64::MAX）
pub fn saturating_total<'a, I>(records: I) -> u64
where
    I: IntoIterator<Item = &'a InventoryRecord>,
{
    records
        .into_iter()
        .fold(0u64, |acc, r| acc.saturating_add(r.inventory))
}

// ==========================================
// RowIssue - 行级问题（不阻断文件处理）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RowIssue {
    /// 必填列缺失，整行跳过
    MissingField { row: usize, field: String },
    /// 月份无法识别，整行跳过
    InvalidMonth { row: usize, value: String },
    /// 年份列不是整数，仅跳过该年份
    UnparsableCount { row: usize, year: i32, value: String },
    /// 未找到表头行，文件记为空
    NoHeaderRow { sheet: String },
}

// ==========================================
// FileReport - 单文件处理结果
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileReport {
    pub source_file: String,
    pub sheet_name: Option<String>,
    /// 参与转换的数据行数
    pub rows_scanned: usize,
    pub records: Vec<InventoryRecord>,
    pub issues: Vec<RowIssue>,
}

impl FileReport {
    pub fn total_inventory(&self) -> u64 {
        saturating_total(&self.records)
    }
}

// ==========================================
// FileFailure - 单文件失败（不阻断批处理）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFailure {
    pub source_file: String,
    pub reason: String,
}

// ==========================================
// StoredFile - 存储中的工作簿
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFile {
    pub key: String,
    pub size_bytes: u64,
    pub modified_at: Option<DateTime<Utc>>,
}

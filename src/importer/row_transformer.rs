// ==========================================
// 签证排期库存 - 行转换
// ==========================================
// 输入: 一个表头键控行（宽表，每个年份一列）
// 输出: 0..N 条标准化记录（长表，每个年份一条）
// 红线: 单元格/行级问题只记录，不中断
// ==========================================

use crate::config::IngestConfig;
use crate::domain::{InventoryRecord, RowIssue};
use crate::importer::category_extractor::CategoryExtractor;
use crate::importer::date_normalizer::DateNormalizer;
use crate::importer::workbook::HeaderKeyedRow;

// ==========================================
// RowTransform - 单行转换结果
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowTransform {
    pub records: Vec<InventoryRecord>,
    pub issues: Vec<RowIssue>,
}

impl RowTransform {
    fn skipped(issue: Option<RowIssue>) -> Self {
        Self {
            records: Vec::new(),
            issues: issue.into_iter().collect(),
        }
    }
}

pub struct RowTransformer;

impl RowTransformer {
    /// 宽表行 → 长表记录
    ///
    /// # 规则
    /// - 国家/类别标签/月份缺失: 整行跳过（全空行不记录问题）
    /// - 月份无法识别: 整行跳过
    /// - 年份列无法解析为计数: 仅跳过该年份（空单元格不记录问题）
    /// - 记录按年份升序
    pub fn transform(row: &HeaderKeyedRow, source_file: &str, config: &IngestConfig) -> RowTransform {
        let columns = &config.columns;

        let country = row.text(&columns.country);
        let label = row.text(&columns.preference_category);
        let month_name = row.text(&columns.priority_month);

        let (country, label, month_name) = match (country, label, month_name) {
            (Some(c), Some(l), Some(m)) => (c, l, m),
            (country, label, _) => {
                if row.is_blank() {
                    return RowTransform::skipped(None);
                }
                let field = if country.is_none() {
                    &columns.country
                } else if label.is_none() {
                    &columns.preference_category
                } else {
                    &columns.priority_month
                };
                return RowTransform::skipped(Some(RowIssue::MissingField {
                    row: row.row_number,
                    field: field.clone(),
                }));
            }
        };

        let Ok(month) = DateNormalizer::resolve_month(&month_name) else {
            return RowTransform::skipped(Some(RowIssue::InvalidMonth {
                row: row.row_number,
                value: month_name,
            }));
        };

        let visa_category = CategoryExtractor::extract_code(&label);
        let status = row.text(&columns.visa_status).unwrap_or_default();

        let mut result = RowTransform::default();
        for year in config.year_range.years() {
            let Some(cell) = row.get(&columns.year_column(year)) else {
                continue;
            };
            if cell.is_blank() {
                continue;
            }

            let Some(inventory) = cell.as_count() else {
                result.issues.push(RowIssue::UnparsableCount {
                    row: row.row_number,
                    year,
                    value: cell.to_text(),
                });
                continue;
            };

            // YearRange 构造时已限定 0-9999，此处不会失败
            let sort_key = match DateNormalizer::from_parts(month, year) {
                Ok(key) => key,
                Err(_) => continue,
            };

            result.records.push(InventoryRecord {
                country: country.clone(),
                visa_category: visa_category.clone(),
                status: status.clone(),
                report_month: month,
                report_year: year,
                sort_key,
                inventory,
                source_file: source_file.to_string(),
            });
        }

        result
    }
}

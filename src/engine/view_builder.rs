// ==========================================
// 签证排期库存 - 看板视图构建
// ==========================================
// 输入: 全部标准化记录 + 筛选参数
// 输出: 筛选子集 / 月份×年份堆叠表 / 按文件趋势
// 红线: 纯函数，不访问存储
// ==========================================

use crate::domain::{saturating_total, InventoryRecord, ReportMonth, SortKey};
use crate::engine::source_period::{display_label, latest_file, SourcePeriod};
use crate::i18n;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, warn};

/// 不按类别筛选
pub const ALL_CATEGORIES: &str = "__all__";

// ==========================================
// SourceScope - 子集与堆叠表的数据来源
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "scope", content = "file", rename_all = "snake_case")]
pub enum SourceScope {
    /// 发布期最新的文件
    #[default]
    Latest,
    /// 指定文件
    File(String),
    /// 全部文件
    All,
}

// ==========================================
// FilterParams - 筛选参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterParams {
    /// 类别短码或 "__all__"
    pub visa_category: String,
    pub start_month: ReportMonth,
    pub start_year: i32,
    pub end_month: ReportMonth,
    pub end_year: i32,
    pub scope: SourceScope,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            visa_category: ALL_CATEGORIES.to_string(),
            start_month: ReportMonth::January,
            start_year: 2021,
            end_month: ReportMonth::December,
            end_year: 2021,
            scope: SourceScope::Latest,
        }
    }
}

impl FilterParams {
    /// 闭区间 [from, to]；年份超出 0-9999 时返回 None
    pub fn bounds(&self) -> Option<(SortKey, SortKey)> {
        let from = SortKey::new(self.start_year, self.start_month)?;
        let to = SortKey::new(self.end_year, self.end_month)?;
        Some((from, to))
    }

    fn matches_category(&self, record: &InventoryRecord) -> bool {
        self.visa_category == ALL_CATEGORIES || record.visa_category == self.visa_category
    }
}

// ==========================================
// 视图类型
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilteredSubset {
    pub records: Vec<InventoryRecord>,
    pub total_inventory: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthRow {
    pub month: ReportMonth,
    /// 年份 → 库存合计
    pub totals: BTreeMap<i32, u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthYearTable {
    /// 日历顺序（一月 → 十二月），只含出现过的月份
    pub rows: Vec<MonthRow>,
    /// 出现过的年份（升序）
    pub years: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub source_file: String,
    /// 展示标签，如 "March 2024"
    pub label: String,
    /// 文件发布期 "YYYY-MM"；无法解析时为 None
    pub period_key: Option<SortKey>,
    pub inventory: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryOption {
    pub code: String,
    pub display_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardViews {
    /// 子集与堆叠表实际使用的文件（All 时为 None）
    pub source_file: Option<String>,
    pub subset: FilteredSubset,
    pub month_year: MonthYearTable,
    pub trend: Vec<TrendPoint>,
    pub categories: Vec<CategoryOption>,
    pub files: Vec<String>,
}

// ==========================================
// ViewBuilder
// ==========================================
pub struct ViewBuilder;

impl ViewBuilder {
    /// 按类别 + 日期闭区间筛选（字符串比较排序键）
    pub fn filter(records: &[InventoryRecord], params: &FilterParams) -> FilteredSubset {
        let Some((from, to)) = params.bounds() else {
            warn!(
                start_year = params.start_year,
                end_year = params.end_year,
                "筛选年份超出范围，结果为空"
            );
            return FilteredSubset::default();
        };

        let records: Vec<InventoryRecord> = records
            .iter()
            .filter(|r| in_range(r, &from, &to) && params.matches_category(r))
            .cloned()
            .collect();
        let total_inventory = saturating_total(&records);

        FilteredSubset {
            records,
            total_inventory,
        }
    }

    /// 月份×年份堆叠合计
    pub fn month_year_table(records: &[InventoryRecord]) -> MonthYearTable {
        let mut grouped: BTreeMap<ReportMonth, BTreeMap<i32, u64>> = BTreeMap::new();
        let mut years = BTreeSet::new();

        for record in records {
            let total = grouped
                .entry(record.report_month)
                .or_default()
                .entry(record.report_year)
                .or_insert(0);
            *total = total.saturating_add(record.inventory);
            years.insert(record.report_year);
        }

        MonthYearTable {
            rows: grouped
                .into_iter()
                .map(|(month, totals)| MonthRow { month, totals })
                .collect(),
            years: years.into_iter().collect(),
        }
    }

    /// 按来源文件汇总的趋势
    ///
    /// 排序: 按文件发布期升序；无法解析发布期的文件排在最后，按标签排序
    pub fn trend(records: &[InventoryRecord], params: &FilterParams) -> Vec<TrendPoint> {
        let Some((from, to)) = params.bounds() else {
            return Vec::new();
        };

        let mut grouped: HashMap<&str, u64> = HashMap::new();
        for record in records
            .iter()
            .filter(|r| in_range(r, &from, &to) && params.matches_category(r))
        {
            let total = grouped.entry(record.source_file.as_str()).or_insert(0);
            *total = total.saturating_add(record.inventory);
        }

        let mut points: Vec<(Option<SourcePeriod>, TrendPoint)> = grouped
            .into_iter()
            .map(|(file, inventory)| {
                let period = SourcePeriod::from_file_key(file);
                let point = TrendPoint {
                    source_file: file.to_string(),
                    label: display_label(file),
                    period_key: period.and_then(|p| p.sort_key()),
                    inventory,
                };
                (period, point)
            })
            .collect();

        points.sort_by(|(pa, a), (pb, b)| match (pa, pb) {
            (Some(pa), Some(pb)) => pa.cmp(pb).then_with(|| a.source_file.cmp(&b.source_file)),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a
                .label
                .cmp(&b.label)
                .then_with(|| a.source_file.cmp(&b.source_file)),
        });

        points.into_iter().map(|(_, point)| point).collect()
    }

    /// 去重类别（首次出现顺序）
    pub fn categories(records: &[InventoryRecord]) -> Vec<String> {
        let mut seen = BTreeSet::new();
        records
            .iter()
            .filter(|r| seen.insert(r.visa_category.as_str()))
            .map(|r| r.visa_category.clone())
            .collect()
    }

    /// 解析数据来源范围
    ///
    /// # 返回
    /// - Some(key): 子集只取该文件的记录
    /// - None: 取全部记录
    pub fn resolve_scope(files: &[String], scope: &SourceScope) -> Option<String> {
        match scope {
            SourceScope::All => None,
            SourceScope::File(key) => Some(key.clone()),
            SourceScope::Latest => {
                let latest = latest_file(files.iter().map(String::as_str));
                if latest.is_none() && !files.is_empty() {
                    warn!(files = files.len(), "没有可解析发布期的文件，改用全部文件");
                }
                latest.map(str::to_string)
            }
        }
    }

    /// 组装看板
    ///
    /// # 参数
    /// - records: 全部文件的记录
    /// - files: 全部文件键（存储顺序）
    /// - params: 筛选参数
    pub fn build_views(
        records: &[InventoryRecord],
        files: &[String],
        params: &FilterParams,
    ) -> DashboardViews {
        let source_file = Self::resolve_scope(files, &params.scope);
        let subset = match &source_file {
            Some(key) => {
                let scoped: Vec<InventoryRecord> = records
                    .iter()
                    .filter(|r| r.source_file == *key)
                    .cloned()
                    .collect();
                Self::filter(&scoped, params)
            }
            None => Self::filter(records, params),
        };
        let month_year = Self::month_year_table(&subset.records);
        let trend = Self::trend(records, params);
        let categories = Self::categories(records)
            .into_iter()
            .map(|code| CategoryOption {
                display_name: i18n::visa_display_name(&code),
                code,
            })
            .collect();

        debug!(
            source_file = ?source_file,
            subset = subset.records.len(),
            trend_points = trend.len(),
            "看板视图构建完成"
        );

        DashboardViews {
            source_file,
            subset,
            month_year,
            trend,
            categories,
            files: files.to_vec(),
        }
    }
}

fn in_range(record: &InventoryRecord, from: &SortKey, to: &SortKey) -> bool {
    record.sort_key.as_str() >= from.as_str() && record.sort_key.as_str() <= to.as_str()
}

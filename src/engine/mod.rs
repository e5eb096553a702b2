// ==========================================
// 签证排期库存 - 引擎层
// ==========================================
// 职责: 基于标准化记录计算看板视图
// 红线: 引擎为纯计算，不访问存储，不解析文件
// ==========================================

pub mod source_period;
pub mod view_builder;

// 重导出核心引擎
pub use source_period::{display_label, latest_file, SourcePeriod};
pub use view_builder::{
    CategoryOption, DashboardViews, FilterParams, FilteredSubset, MonthRow, MonthYearTable,
    SourceScope, TrendPoint, ViewBuilder, ALL_CATEGORIES,
};

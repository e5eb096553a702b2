// ==========================================
// 签证排期库存 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含文件访问逻辑,不含解析逻辑
// ==========================================

pub mod inventory;
pub mod types;

// 重导出核心类型
pub use inventory::{
    saturating_total, FileFailure, FileReport, InventoryRecord, RowIssue, StoredFile,
};
pub use types::{ReportMonth, SortKey};

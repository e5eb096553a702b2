// ==========================================
// 签证排期库存 - 核心库
// ==========================================
// 输入: 国务院月度签证排期库存工作簿（Excel / CSV）
// 输出: 标准化库存记录 + 看板视图（筛选子集 / 月份×年份 / 按文件趋势）
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "en");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 存储层 - 上传文件
pub mod repository;

// 引擎层 - 看板视图
pub mod engine;

// 导入层 - 工作簿解析与转换
pub mod importer;

// 配置层 - 导入约定与存储位置
pub mod config;

// 日志系统
pub mod logging;

// 性能统计
pub mod perf;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 装配
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{FileFailure, FileReport, InventoryRecord, ReportMonth, RowIssue, SortKey};

// 导入
pub use importer::{Aggregation, FileAggregator, ImportError, Workbook};

// 引擎
pub use engine::{DashboardViews, FilterParams, SourceScope, ViewBuilder};

// API
pub use api::{ApiError, DashboardApi, InventoryApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "签证排期库存";

// ==========================================
// 签证排期库存 - 配置层
// ==========================================
// 职责: 导入约定与存储位置的显式配置
// 来源: JSON 文件 + 环境变量
// ==========================================

pub mod config_manager;
pub mod ingest_config;

// 重导出核心配置类型
pub use config_manager::{config_keys, env_vars, AppConfig, ConfigError, ConfigManager};
pub use ingest_config::{
    ColumnNames, IngestConfig, RowLayout, StorageConfig, YearRange, DEFAULT_BANNER_ROWS,
    DEFAULT_EXCLUDED_SHEET, DEFAULT_FIRST_YEAR, DEFAULT_LAST_YEAR, MAX_YEAR, MIN_YEAR,
};

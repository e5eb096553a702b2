// ==========================================
// 签证排期库存 - 导入层
// ==========================================
// 职责: 工作簿 → 标准化库存记录
// 支持: Excel, CSV
// ==========================================
// 流程: 解析 → 定位数据表 → 行转换（月份/类别标准化）→ 多文件汇总
// ==========================================

// 模块声明
pub mod category_extractor;
pub mod date_normalizer;
pub mod error;
pub mod file_aggregator;
pub mod file_parser;
pub mod inventory_importer_trait;
pub mod row_transformer;
pub mod workbook;
pub mod workbook_locator;

// 重导出核心类型
pub use category_extractor::CategoryExtractor;
pub use date_normalizer::{DateNormalizer, YearInput};
pub use error::{ImportError, ImportResult};
pub use file_aggregator::{Aggregation, FileAggregator};
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use row_transformer::{RowTransform, RowTransformer};
pub use workbook::{CellValue, HeaderKeyedRow, Sheet, Workbook};
pub use workbook_locator::{LocatedSheet, WorkbookLocator};

// 重导出 Trait 接口
pub use inventory_importer_trait::{InventoryImporter, WorkbookParser};

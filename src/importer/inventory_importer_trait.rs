// ==========================================
// 签证排期库存 - 导入 Trait
// ==========================================
// 职责: 定义导入接口（不包含实现）
// ==========================================

use crate::domain::FileReport;
use crate::importer::error::ImportResult;
use crate::importer::file_aggregator::Aggregation;
use crate::importer::workbook::Workbook;
use async_trait::async_trait;

// ==========================================
// WorkbookParser Trait
// ==========================================
// 用途: 原始字节 → 内存工作簿（阶段 0）
// 实现者: ExcelParser, CsvParser, UniversalFileParser
pub trait WorkbookParser: Send + Sync {
    /// 解析工作簿
    ///
    /// # 参数
    /// - file_name: 文件名（用于格式判断与工作表命名）
    /// - bytes: 文件内容
    ///
    /// # 返回
    /// - Ok(Workbook): 全部工作表的原始网格
    /// - Err: 文件损坏、格式不支持
    fn parse_workbook(&self, file_name: &str, bytes: &[u8]) -> ImportResult<Workbook>;
}

// ==========================================
// InventoryImporter Trait
// ==========================================
// 用途: 库存导入主接口
// 实现者: FileAggregator
#[async_trait]
pub trait InventoryImporter: Send + Sync {
    /// 导入单个文件（上传场景）
    ///
    /// # 返回
    /// - Ok(FileReport): 该文件的记录与行级问题
    /// - Err: 文件级错误（无数据表、文件损坏）
    fn import_bytes(&self, source_file: &str, bytes: &[u8]) -> ImportResult<FileReport>;

    /// 批量导入多个文件（并发执行）
    ///
    /// # 说明
    /// - 每个文件独立处理，某个文件失败不影响其他文件
    /// - 输出顺序与输入顺序一致
    async fn batch_import(&self, files: Vec<(String, Vec<u8>)>) -> Aggregation;
}

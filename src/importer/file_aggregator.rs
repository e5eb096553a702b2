// ==========================================
// 签证排期库存 - 多文件汇总
// ==========================================
// 流程: 解析 → 定位数据表 → 逐行转换 → 汇总
// 隔离: 单文件失败只记入 failures，不影响其他文件
// 并发: 每个文件在阻塞线程池中解析，join_all 汇总，保持输入顺序
// ==========================================

use crate::config::IngestConfig;
use crate::domain::{FileFailure, FileReport, InventoryRecord, RowIssue};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::inventory_importer_trait::{InventoryImporter, WorkbookParser};
use crate::importer::row_transformer::RowTransformer;
use crate::importer::workbook::Workbook;
use crate::importer::workbook_locator::WorkbookLocator;
use crate::perf::PerfGuard;
use crate::repository::{FileStore, StoreResult};
use async_trait::async_trait;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// Aggregation - 汇总结果
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Aggregation {
    /// 成功处理的文件（保持输入顺序）
    pub files: Vec<FileReport>,
    pub failures: Vec<FileFailure>,
}

impl Aggregation {
    /// 全部记录（每条记录自带 source_file）
    pub fn all_records(&self) -> Vec<InventoryRecord> {
        self.files
            .iter()
            .flat_map(|f| f.records.iter().cloned())
            .collect()
    }

    pub fn record_count(&self) -> usize {
        self.files.iter().map(|f| f.records.len()).sum()
    }

    pub fn file_keys(&self) -> Vec<String> {
        self.files.iter().map(|f| f.source_file.clone()).collect()
    }

    fn push(&mut self, source_file: String, outcome: ImportResult<FileReport>) {
        match outcome {
            Ok(report) => self.files.push(report),
            Err(e) => self.failures.push(FileFailure {
                source_file,
                reason: e.to_string(),
            }),
        }
    }
}

// ==========================================
// FileAggregator
// ==========================================
#[derive(Clone)]
pub struct FileAggregator {
    config: Arc<IngestConfig>,
    parser: Arc<dyn WorkbookParser>,
}

impl FileAggregator {
    /// # 参数
    /// - config: 导入配置（年份范围、列名、表头定位策略）
    /// - parser: 工作簿解析器
    pub fn new(config: IngestConfig, parser: Arc<dyn WorkbookParser>) -> Self {
        Self {
            config: Arc::new(config),
            parser,
        }
    }

    /// 使用按扩展名分派的默认解析器
    pub fn with_default_parser(config: IngestConfig) -> Self {
        Self::new(config, Arc::new(UniversalFileParser))
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// 处理单个已解析工作簿
    ///
    /// # 返回
    /// - Ok(FileReport): 记录 + 行级问题；未找到表头时为空报告
    /// - Err: 无数据工作表
    pub fn process_workbook(&self, source_file: &str, workbook: &Workbook) -> ImportResult<FileReport> {
        let located = match WorkbookLocator::locate(workbook, &self.config) {
            Ok(located) => located,
            Err(ImportError::NoHeaderRow { sheet }) => {
                warn!(file = %source_file, sheet = %sheet, "未找到表头行，文件按空结果处理");
                return Ok(FileReport {
                    source_file: source_file.to_string(),
                    sheet_name: Some(sheet.clone()),
                    rows_scanned: 0,
                    records: Vec::new(),
                    issues: vec![RowIssue::NoHeaderRow { sheet }],
                });
            }
            Err(e) => return Err(e),
        };

        let mut report = FileReport {
            source_file: source_file.to_string(),
            sheet_name: Some(located.sheet_name),
            rows_scanned: located.rows.len(),
            ..FileReport::default()
        };
        for row in &located.rows {
            let transformed = RowTransformer::transform(row, source_file, &self.config);
            report.records.extend(transformed.records);
            report.issues.extend(transformed.issues);
        }

        debug!(
            file = %source_file,
            rows = report.rows_scanned,
            records = report.records.len(),
            issues = report.issues.len(),
            "文件转换完成"
        );
        Ok(report)
    }

    /// 汇总多个已解析工作簿（同步）
    pub fn aggregate(&self, files: Vec<(String, Workbook)>) -> Aggregation {
        let mut aggregation = Aggregation::default();
        for (key, workbook) in files {
            let outcome = self.process_workbook(&key, &workbook);
            if let Err(e) = &outcome {
                error!(file = %key, error = %e, "文件处理失败");
            }
            aggregation.push(key, outcome);
        }
        aggregation
    }

    /// 汇总存储中的全部文件
    ///
    /// # 说明
    /// - 读取失败、解析失败均记为该文件失败
    /// - 只有列出文件失败时返回错误
    #[instrument(skip(self, store), fields(batch_id))]
    pub async fn aggregate_store(&self, store: &dyn FileStore) -> StoreResult<Aggregation> {
        let batch_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("batch_id", batch_id.as_str());
        let mut perf = PerfGuard::new("aggregate_store");

        let keys: Vec<String> = store.list().await?.into_iter().map(|f| f.key).collect();
        info!(batch_id = %batch_id, count = keys.len(), "开始汇总存储文件");

        let tasks = keys.into_iter().map(|key| async move {
            let outcome = match store.read(&key).await {
                Ok(bytes) => self.import_blocking(key.clone(), bytes).await,
                Err(e) => Err(ImportError::FileReadFailure(e.to_string())),
            };
            (key, outcome)
        });
        let aggregation = Self::collect(join_all(tasks).await);

        perf.set_items(aggregation.record_count());
        info!(
            batch_id = %batch_id,
            files = aggregation.files.len(),
            failed = aggregation.failures.len(),
            records = aggregation.record_count(),
            "存储文件汇总完成"
        );
        Ok(aggregation)
    }

    /// 在阻塞线程池中解析 + 转换
    pub async fn import_blocking(&self, key: String, bytes: Vec<u8>) -> ImportResult<FileReport> {
        self.import_keeping_bytes(key, bytes)
            .await
            .map(|(report, _)| report)
    }

    /// 同 import_blocking，成功时交还原始字节（供随后落盘）
    pub async fn import_keeping_bytes(
        &self,
        key: String,
        bytes: Vec<u8>,
    ) -> ImportResult<(FileReport, Vec<u8>)> {
        let this = self.clone();
        tokio::task::spawn_blocking(move || -> ImportResult<(FileReport, Vec<u8>)> {
            let report = this.import_bytes(&key, &bytes)?;
            Ok((report, bytes))
        })
        .await
        .map_err(|e| ImportError::InternalError(format!("解析任务异常终止: {}", e)))?
    }

    fn collect(outcomes: Vec<(String, ImportResult<FileReport>)>) -> Aggregation {
        let mut aggregation = Aggregation::default();
        for (key, outcome) in outcomes {
            if let Err(e) = &outcome {
                error!(file = %key, error = %e, "文件导入失败");
            }
            aggregation.push(key, outcome);
        }
        aggregation
    }
}

#[async_trait]
impl InventoryImporter for FileAggregator {
    fn import_bytes(&self, source_file: &str, bytes: &[u8]) -> ImportResult<FileReport> {
        let workbook = self.parser.parse_workbook(source_file, bytes)?;
        self.process_workbook(source_file, &workbook)
    }

    /// 批量导入多个文件（并发执行）
    async fn batch_import(&self, files: Vec<(String, Vec<u8>)>) -> Aggregation {
        info!(count = files.len(), "开始批量导入文件");

        let tasks = files.into_iter().map(|(key, bytes)| async move {
            let outcome = self.import_blocking(key.clone(), bytes).await;
            (key, outcome)
        });
        let aggregation = Self::collect(join_all(tasks).await);

        info!(
            success = aggregation.files.len(),
            failed = aggregation.failures.len(),
            "批量导入完成"
        );
        aggregation
    }
}

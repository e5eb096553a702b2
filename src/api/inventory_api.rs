// ==========================================
// 签证排期库存 - 库存文件 API
// ==========================================
// 职责: 上传（先解析后落盘）、列出全部文件记录、删除文件
// 鉴权: 上传/删除需要管理员密码
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::{check_admin_secret, normalize_upload_key};
use crate::config::StorageConfig;
use crate::domain::{FileFailure, InventoryRecord, RowIssue};
use crate::i18n;
use crate::importer::FileAggregator;
use crate::perf::PerfGuard;
use crate::repository::FileStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// 上传响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    /// 规范化后的存储键
    pub source_file: String,
    pub sheet_name: Option<String>,
    pub records: Vec<InventoryRecord>,
    pub issues: Vec<RowIssue>,
    pub total_inventory: u64,
    pub message: String,
}

/// 单个文件的记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileListing {
    pub filename: String,
    pub records: Vec<InventoryRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<RowIssue>,
}

/// 列表响应
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListResponse {
    pub files: Vec<FileListing>,
    /// 读取或解析失败的文件（不影响其他文件）
    pub failures: Vec<FileFailure>,
}

impl ListResponse {
    pub fn all_records(&self) -> Vec<InventoryRecord> {
        self.files
            .iter()
            .flat_map(|f| f.records.iter().cloned())
            .collect()
    }

    pub fn filenames(&self) -> Vec<String> {
        self.files.iter().map(|f| f.filename.clone()).collect()
    }
}

/// 删除响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub filename: String,
    pub message: String,
}

// ==========================================
// InventoryApi
// ==========================================
pub struct InventoryApi {
    store: Arc<dyn FileStore>,
    aggregator: FileAggregator,
    storage: StorageConfig,
    admin_password: Option<String>,
}

impl InventoryApi {
    /// # 参数
    /// - store: 文件存储
    /// - aggregator: 解析 + 转换
    /// - storage: 允许的扩展名
    /// - admin_password: 管理员密码（None 时禁止写操作）
    pub fn new(
        store: Arc<dyn FileStore>,
        aggregator: FileAggregator,
        storage: StorageConfig,
        admin_password: Option<String>,
    ) -> Self {
        Self {
            store,
            aggregator,
            storage,
            admin_password,
        }
    }

    fn authorize(&self, admin_secret: Option<&str>) -> ApiResult<()> {
        check_admin_secret(admin_secret, self.admin_password.as_deref()).map_err(|e| {
            warn!(error = %e, "管理员密码校验失败");
            e
        })
    }

    /// 上传工作簿
    ///
    /// # 流程
    /// 1. 校验管理员密码
    /// 2. 规范化文件名
    /// 3. 解析 + 转换（失败则不落盘）
    /// 4. 写入存储（同名覆盖）
    #[instrument(skip(self, bytes, admin_secret), fields(size = bytes.len()))]
    pub async fn process_upload(
        &self,
        bytes: Vec<u8>,
        original_name: &str,
        admin_secret: Option<&str>,
    ) -> ApiResult<UploadResponse> {
        self.authorize(admin_secret)?;
        let key = normalize_upload_key(original_name, &self.storage)?;
        if bytes.is_empty() {
            return Err(ApiError::InvalidInput(format!("文件为空: {}", key)));
        }

        let mut perf = PerfGuard::new("process_upload");
        let (report, bytes) = self
            .aggregator
            .import_keeping_bytes(key.clone(), bytes)
            .await
            .map_err(|e| {
                warn!(file = %key, error = %e, "上传文件解析失败，未保存");
                ApiError::UploadError(i18n::t_with_args(
                    "upload.parse_failed",
                    &[("file", &key), ("reason", &e.to_string())],
                ))
            })?;

        self.store.write(&key, &bytes).await?;
        perf.set_items(report.records.len());

        let total_inventory = report.total_inventory();
        let message = i18n::t_with_args(
            "upload.saved",
            &[("file", &key), ("records", &report.records.len().to_string())],
        );
        info!(
            file = %key,
            records = report.records.len(),
            issues = report.issues.len(),
            "上传完成"
        );

        Ok(UploadResponse {
            source_file: key,
            sheet_name: report.sheet_name,
            records: report.records,
            issues: report.issues,
            total_inventory,
            message,
        })
    }

    /// 列出全部文件及其记录
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> ApiResult<ListResponse> {
        let aggregation = self.aggregator.aggregate_store(self.store.as_ref()).await?;

        Ok(ListResponse {
            files: aggregation
                .files
                .into_iter()
                .map(|report| FileListing {
                    filename: report.source_file,
                    records: report.records,
                    issues: report.issues,
                })
                .collect(),
            failures: aggregation.failures,
        })
    }

    /// 删除文件
    #[instrument(skip(self, admin_secret))]
    pub async fn delete_file(
        &self,
        filename: &str,
        admin_secret: Option<&str>,
    ) -> ApiResult<DeleteResponse> {
        self.authorize(admin_secret)?;
        let key = filename.trim();
        if key.is_empty() {
            return Err(ApiError::InvalidInput("文件名不能为空".to_string()));
        }

        self.store.delete(key).await?;

        info!(file = %key, "文件已删除");
        Ok(DeleteResponse {
            filename: key.to_string(),
            message: i18n::t_with_args("files.deleted", &[("file", key)]),
        })
    }
}

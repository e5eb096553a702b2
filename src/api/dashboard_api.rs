// ==========================================
// 签证排期库存 - 看板 API
// ==========================================
// 职责: 校验筛选参数，组装看板视图
// 架构: API 层 → InventoryApi（取记录）→ ViewBuilder（纯计算）
// ==========================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::api::error::ApiResult;
use crate::api::inventory_api::InventoryApi;
use crate::api::validator::validate_filter_params;
use crate::domain::{FileFailure, InventoryRecord};
use crate::engine::{DashboardViews, FilterParams, ViewBuilder};
use crate::perf::PerfGuard;

/// 看板响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub views: DashboardViews,
    /// 未能读取的文件
    pub failures: Vec<FileFailure>,
}

// ==========================================
// DashboardApi - 看板 API
// ==========================================
pub struct DashboardApi {
    inventory_api: Arc<InventoryApi>,
}

impl DashboardApi {
    pub fn new(inventory_api: Arc<InventoryApi>) -> Self {
        Self { inventory_api }
    }

    /// 基于给定记录构建视图
    ///
    /// 文件列表取记录中出现过的来源文件（首次出现顺序）；
    /// 没有记录的文件不参与 Latest 选择，需要时使用 build_views_with_files
    pub fn build_views(
        &self,
        records: &[InventoryRecord],
        params: &FilterParams,
    ) -> ApiResult<DashboardViews> {
        let mut files: Vec<String> = Vec::new();
        for record in records {
            if !files.contains(&record.source_file) {
                files.push(record.source_file.clone());
            }
        }
        self.build_views_with_files(records, &files, params)
    }

    /// 基于给定记录与完整文件列表构建视图（含零记录文件）
    pub fn build_views_with_files(
        &self,
        records: &[InventoryRecord],
        files: &[String],
        params: &FilterParams,
    ) -> ApiResult<DashboardViews> {
        validate_filter_params(params)?;
        Ok(ViewBuilder::build_views(records, files, params))
    }

    /// 读取存储中的全部文件并构建视图
    #[instrument(skip(self))]
    pub async fn load_dashboard(&self, params: &FilterParams) -> ApiResult<DashboardResponse> {
        validate_filter_params(params)?;
        let mut perf = PerfGuard::new("load_dashboard");

        let listing = self.inventory_api.list_all().await?;
        let records = listing.all_records();
        let views = self.build_views_with_files(&records, &listing.filenames(), params)?;
        perf.set_items(records.len());

        Ok(DashboardResponse {
            views,
            failures: listing.failures,
        })
    }
}

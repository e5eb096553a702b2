// ==========================================
// 签证排期库存 - API 层
// ==========================================
// 职责: 提供业务 API 接口，供 CLI 或外部服务调用
// ==========================================

pub mod dashboard_api;
pub mod error;
pub mod inventory_api;
pub mod validator;

// 重导出核心类型
pub use dashboard_api::{DashboardApi, DashboardResponse};
pub use error::{ApiError, ApiResult};
pub use inventory_api::{DeleteResponse, FileListing, InventoryApi, ListResponse, UploadResponse};
pub use validator::{
    check_admin_secret, normalize_upload_key, parse_filter_params, validate_filter_params,
};

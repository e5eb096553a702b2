// ==========================================
// 签证排期库存 - 应用层
// ==========================================
// 职责: 装配配置、存储与 API，供 CLI 使用
// ==========================================

pub mod state;

// 重导出
pub use state::{get_default_upload_dir, AppState};

// ==========================================
// 签证排期库存 - 存储层
// ==========================================
// 红线: 存储层不含解析与业务逻辑
// ==========================================
// 职责: 上传工作簿的持久化，屏蔽目录细节
// ==========================================

pub mod error;
pub mod file_store;
pub mod local_file_store;

// 重导出核心类型
pub use error::{StoreError, StoreResult};
pub use file_store::FileStore;
pub use local_file_store::LocalFileStore;

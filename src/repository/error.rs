// ==========================================
// 签证排期库存 - 存储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 存储层错误类型
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("文件未找到: {key}")]
    NotFound { key: String },

    #[error("文件键无效: {0}")]
    InvalidKey(String),

    #[error("存储目录不可用: {path} ({message})")]
    DirectoryUnavailable { path: String, message: String },

    #[error("文件读写失败: {0}")]
    IoError(String),

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::IoError(err.to_string())
    }
}

/// Result 类型别名
pub type StoreResult<T> = Result<T, StoreError>;

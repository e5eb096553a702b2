// ==========================================
// 签证排期库存 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换存储/导入错误为用户可读的错误消息
// ==========================================

use crate::importer::ImportError;
use crate::repository::StoreError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 鉴权错误
    // ==========================================
    #[error("需要管理员密码")]
    PasswordRequired,

    #[error("管理员密码错误")]
    Unauthorized,

    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    // ==========================================
    // 上传/导入错误
    // ==========================================
    #[error("上传失败: {0}")]
    UploadError(String),

    #[error("文件导入失败: {0}")]
    ImportError(String),

    // ==========================================
    // 存储错误
    // ==========================================
    #[error("存储错误: {0}")]
    StorageError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 对应的 HTTP 状态码语义（401/403/400/404/500）
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::PasswordRequired => 401,
            ApiError::Unauthorized => 403,
            ApiError::InvalidInput(_) | ApiError::UploadError(_) | ApiError::ImportError(_) => 400,
            ApiError::NotFound(_) => 404,
            ApiError::StorageError(_) | ApiError::InternalError(_) | ApiError::Other(_) => 500,
        }
    }
}

// ==========================================
// 从 StoreError 转换
// ==========================================
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { key } => ApiError::NotFound(format!("文件 {} 不存在", key)),
            StoreError::InvalidKey(key) => ApiError::InvalidInput(format!("文件名无效: {}", key)),
            StoreError::DirectoryUnavailable { .. } | StoreError::IoError(_) => {
                ApiError::StorageError(err.to_string())
            }
            StoreError::InternalError(msg) => ApiError::InternalError(msg),
            StoreError::Other(err) => ApiError::Other(err),
        }
    }
}

// ==========================================
// 从 ImportError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::InternalError(msg) => ApiError::InternalError(msg),
            ImportError::Other(err) => ApiError::Other(err),
            other => ApiError::ImportError(other.to_string()),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

// ==========================================
// 签证排期库存 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 粒度: 行级/年份级问题记为 RowIssue（如 UnparsableCount），文件级错误只影响该文件
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xlsm/.xls/.xlsb/.ods/.csv）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadFailure(String),

    // ===== 工作簿结构错误 =====
    #[error("未找到数据工作表（已排除: {excluded}）")]
    NoDataSheet { excluded: String },

    #[error("未找到表头行 (工作表 {sheet})")]
    NoHeaderRow { sheet: String },

    // ===== 单元格错误 =====
    #[error("月份无法识别: {0}")]
    InvalidMonth(String),

    #[error("年份无效: {0}（期望 0-9999）")]
    InvalidYear(String),

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ImportError {
    /// 可恢复错误：文件记为空结果，不计入失败
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ImportError::NoHeaderRow { .. })
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadFailure(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::FileReadFailure(format!("CSV 解析失败: {}", err))
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::FileReadFailure(format!("Excel 解析失败: {}", err))
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;

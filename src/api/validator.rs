// ==========================================
// 签证排期库存 - 请求校验
// ==========================================
// 职责: 上传文件名规范化、筛选参数校验、管理员密码校验
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::{StorageConfig, MAX_YEAR, MIN_YEAR};
use crate::domain::ReportMonth;
use crate::engine::FilterParams;
use crate::importer::{DateNormalizer, YearInput};
use std::path::Path;
use tracing::warn;

/// 规范化上传文件名作为存储键
///
/// # 规则
/// - 去除目录部分（/ 与 \ 均视为分隔符）
/// - 去除首尾空白，内部连续空白替换为单个 "_"
/// - 扩展名必须在允许列表中
pub fn normalize_upload_key(original_name: &str, storage: &StorageConfig) -> ApiResult<String> {
    let base = original_name
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or_default();
    let key = base.split_whitespace().collect::<Vec<_>>().join("_");

    if key.is_empty() || key == "." || key == ".." {
        return Err(ApiError::InvalidInput(format!(
            "文件名无效: {:?}",
            original_name
        )));
    }
    if Path::new(&key).file_stem().map_or(true, |s| s.is_empty()) || !storage.is_allowed(&key) {
        return Err(ApiError::InvalidInput(format!(
            "不支持的文件类型: {}（允许: {}）",
            key,
            storage.allowed_extensions.join(", ")
        )));
    }
    Ok(key)
}

/// 管理员密码校验
///
/// # 返回
/// - Err(PasswordRequired): 调用方未提供密码
/// - Err(Unauthorized): 密码不匹配，或服务端未配置密码
pub fn check_admin_secret(provided: Option<&str>, configured: Option<&str>) -> ApiResult<()> {
    let provided = match provided {
        Some(p) if !p.is_empty() => p,
        _ => return Err(ApiError::PasswordRequired),
    };
    match configured {
        Some(expected) if !expected.is_empty() && expected == provided => Ok(()),
        _ => Err(ApiError::Unauthorized),
    }
}

/// 从字符串构造筛选参数（CLI / 外部调用）
pub fn parse_filter_params(
    visa_category: Option<&str>,
    start: Option<(&str, &str)>,
    end: Option<(&str, &str)>,
) -> ApiResult<FilterParams> {
    let mut params = FilterParams::default();
    if let Some(category) = visa_category {
        let category = category.trim();
        if category.is_empty() {
            return Err(ApiError::InvalidInput("类别不能为空".to_string()));
        }
        params.visa_category = category.to_string();
    }
    if let Some((month, year)) = start {
        let (month, year) = parse_month_year(month, year)?;
        params.start_month = month;
        params.start_year = year;
    }
    if let Some((month, year)) = end {
        let (month, year) = parse_month_year(month, year)?;
        params.end_month = month;
        params.end_year = year;
    }
    validate_filter_params(&params)?;
    Ok(params)
}

/// 日期区间必须可构造排序键
///
/// 起点晚于终点不是错误: 闭区间为空，视图结果为空
pub fn validate_filter_params(params: &FilterParams) -> ApiResult<()> {
    let (from, to) = params
        .bounds()
        .ok_or_else(|| {
            ApiError::InvalidInput(format!("年份超出范围（{}-{}）", MIN_YEAR, MAX_YEAR))
        })?;
    if from > to {
        warn!(from = %from, to = %to, "起始日期晚于结束日期，筛选结果为空");
    }
    Ok(())
}

fn parse_month_year(month: &str, year: &str) -> ApiResult<(ReportMonth, i32)> {
    let month = DateNormalizer::resolve_month(month.trim())
        .map_err(|e| ApiError::InvalidInput(e.to_string()))?;
    let year = year
        .to_year()
        .and_then(|y| DateNormalizer::from_parts(month, y).map(|_| y))
        .map_err(|e| ApiError::InvalidInput(e.to_string()))?;
    Ok((month, year))
}

// ==========================================
// 签证排期库存 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、环境变量覆写
// 来源: JSON 配置文件（可选） + 环境变量
// ==========================================

use crate::config::ingest_config::{IngestConfig, RowLayout, StorageConfig, YearRange};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    pub const UPLOAD_DIR: &str = "storage.upload_dir";
    pub const ALLOWED_EXTENSIONS: &str = "storage.allowed_extensions";
    pub const YEAR_RANGE: &str = "ingest.year_range";
    pub const EXCLUDED_SHEET: &str = "ingest.excluded_sheet";
    pub const ROW_LAYOUT: &str = "ingest.row_layout";
    pub const HEADER_MARKERS: &str = "ingest.header_markers";
}

/// 环境变量名
pub mod env_vars {
    pub const CONFIG_PATH: &str = "VISA_INVENTORY_CONFIG";
    pub const UPLOAD_DIR: &str = "VISA_INVENTORY_UPLOAD_DIR";
    pub const YEAR_RANGE: &str = "VISA_INVENTORY_YEAR_RANGE";
    pub const ROW_LAYOUT: &str = "VISA_INVENTORY_ROW_LAYOUT";
    pub const EXCLUDED_SHEET: &str = "VISA_INVENTORY_EXCLUDED_SHEET";
    pub const ADMIN_PASSWORD: &str = "ADMIN_PASSWORD";
}

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败 ({path}): {message}")]
    ConfigReadError { path: String, message: String },

    #[error("配置值格式错误 (key: {key}, value: {value}): {message}")]
    ConfigValueError {
        key: String,
        value: String,
        message: String,
    },

    #[error("配置解析失败: {0}")]
    ParseError(#[from] serde_json::Error),
}

// ==========================================
// AppConfig - 全局配置
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub ingest: IngestConfig,
    pub storage: StorageConfig,
    /// 管理口令（上传/删除时校验）
    #[serde(skip_serializing)]
    pub admin_password: Option<String>,
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: AppConfig,
    source: Option<PathBuf>,
}

impl ConfigManager {
    /// 直接使用给定配置
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            source: None,
        }
    }

    /// 标准加载流程
    ///
    /// 1. 若设置了 VISA_INVENTORY_CONFIG，读取该 JSON 文件；否则使用默认值
    /// 2. 应用环境变量覆写
    pub fn load() -> Result<Self, ConfigError> {
        let mut manager = match std::env::var(env_vars::CONFIG_PATH) {
            Ok(path) if !path.trim().is_empty() => Self::from_file(path.trim())?,
            _ => Self::new(AppConfig::default()),
        };
        manager.apply_env_overrides()?;
        info!(
            source = ?manager.source,
            upload_dir = %manager.config.storage.upload_dir.display(),
            year_range = %manager.config.ingest.year_range,
            row_layout = %manager.config.ingest.row_layout,
            "配置加载完成"
        );
        Ok(manager)
    }

    /// 从 JSON 文件读取配置（缺省字段使用默认值）
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::ConfigReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let config: AppConfig = serde_json::from_str(&raw)?;
        debug!(path = %path.display(), "配置文件读取成功");
        Ok(Self {
            config,
            source: Some(path.to_path_buf()),
        })
    }

    /// 使用进程环境变量覆写
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// 使用给定查找函数覆写（空值忽略）
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(dir) = get(env_vars::UPLOAD_DIR) {
            self.config.storage.upload_dir = PathBuf::from(dir);
        }

        if let Some(value) = get(env_vars::YEAR_RANGE) {
            self.config.ingest.year_range =
                value
                    .parse::<YearRange>()
                    .map_err(|message| ConfigError::ConfigValueError {
                        key: config_keys::YEAR_RANGE.to_string(),
                        value: value.clone(),
                        message,
                    })?;
        }

        if let Some(value) = get(env_vars::ROW_LAYOUT) {
            self.config.ingest.row_layout =
                value
                    .parse::<RowLayout>()
                    .map_err(|message| ConfigError::ConfigValueError {
                        key: config_keys::ROW_LAYOUT.to_string(),
                        value: value.clone(),
                        message,
                    })?;
        }

        if let Some(value) = get(env_vars::EXCLUDED_SHEET) {
            self.config.ingest.excluded_sheet = value;
        }

        if let Some(value) = get(env_vars::ADMIN_PASSWORD) {
            self.config.admin_password = Some(value);
        }

        Ok(())
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn ingest_config(&self) -> &IngestConfig {
        &self.config.ingest
    }

    pub fn storage_config(&self) -> &StorageConfig {
        &self.config.storage
    }

    pub fn admin_password(&self) -> Option<&str> {
        self.config.admin_password.as_deref()
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// 按配置键读取（字符串形式，供日志/接口展示）
    pub fn get_global_config_value(&self, key: &str) -> Option<String> {
        let ingest = &self.config.ingest;
        let storage = &self.config.storage;
        match key {
            config_keys::UPLOAD_DIR => Some(storage.upload_dir.display().to_string()),
            config_keys::ALLOWED_EXTENSIONS => Some(storage.allowed_extensions.join(",")),
            config_keys::YEAR_RANGE => Some(ingest.year_range.to_string()),
            config_keys::EXCLUDED_SHEET => Some(ingest.excluded_sheet.clone()),
            config_keys::ROW_LAYOUT => Some(ingest.row_layout.to_string()),
            config_keys::HEADER_MARKERS => Some(ingest.header_markers.join(",")),
            _ => None,
        }
    }

    /// 配置快照（JSON，不含口令）
    pub fn get_config_snapshot(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(&self.config)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_overrides_applied() {
        let mut manager = ConfigManager::new(AppConfig::default());
        manager
            .apply_overrides(lookup_from(&[
                (env_vars::UPLOAD_DIR, "/srv/uploads"),
                (env_vars::YEAR_RANGE, "2016-2025"),
                (env_vars::ROW_LAYOUT, "scan_for_header"),
                (env_vars::ADMIN_PASSWORD, "secret"),
            ]))
            .unwrap();

        assert_eq!(
            manager.storage_config().upload_dir,
            PathBuf::from("/srv/uploads")
        );
        assert_eq!(manager.ingest_config().year_range, YearRange::new(2016, 2025).unwrap());
        assert_eq!(manager.ingest_config().row_layout, RowLayout::ScanForHeader);
        assert_eq!(manager.admin_password(), Some("secret"));
    }

    #[test]
    fn test_blank_override_ignored() {
        let mut manager = ConfigManager::new(AppConfig::default());
        manager
            .apply_overrides(lookup_from(&[(env_vars::EXCLUDED_SHEET, "   ")]))
            .unwrap();
        assert_eq!(
            manager.ingest_config().excluded_sheet,
            "How to Read This Report"
        );
    }

    #[test]
    fn test_invalid_override_rejected() {
        let mut manager = ConfigManager::new(AppConfig::default());
        let result = manager.apply_overrides(lookup_from(&[(env_vars::YEAR_RANGE, "abc")]));
        match result {
            Err(ConfigError::ConfigValueError { key, .. }) => {
                assert_eq!(key, config_keys::YEAR_RANGE);
            }
            other => panic!("Expected ConfigValueError, got {:?}", other),
        }
    }

    #[test]
    fn test_snapshot_hides_password() {
        let mut config = AppConfig::default();
        config.admin_password = Some("secret".to_string());
        let manager = ConfigManager::new(config);

        let snapshot = manager.get_config_snapshot().unwrap();
        assert!(!snapshot.contains("secret"));
        assert!(snapshot.contains("Priority Date Month"));
    }

    #[test]
    fn test_get_global_config_value() {
        let manager = ConfigManager::new(AppConfig::default());
        assert_eq!(
            manager.get_global_config_value(config_keys::ROW_LAYOUT),
            Some("fixed_offset:3".to_string())
        );
        assert_eq!(
            manager.get_global_config_value(config_keys::YEAR_RANGE),
            Some("2015-2024".to_string())
        );
        assert_eq!(manager.get_global_config_value("unknown"), None);
    }
}

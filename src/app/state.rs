// ==========================================
// 签证排期库存 - 应用状态
// ==========================================
// 职责: 按配置装配存储、导入器与 API 实例
// ==========================================

use std::path::PathBuf;
use std::sync::Arc;

use crate::api::{DashboardApi, InventoryApi};
use crate::config::{env_vars, ConfigManager};
use crate::importer::FileAggregator;
use crate::repository::{FileStore, LocalFileStore};

/// 应用状态
///
/// 包含所有API实例和共享资源
pub struct AppState {
    /// 配置
    pub config: ConfigManager,

    /// 文件存储
    pub store: Arc<dyn FileStore>,

    /// 库存文件API
    pub inventory_api: Arc<InventoryApi>,

    /// 看板API
    pub dashboard_api: Arc<DashboardApi>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - config: 已加载的配置
    ///
    /// # 返回
    /// - Ok(AppState): 应用状态实例
    /// - Err(String): 初始化错误（上传目录不可用）
    pub fn new(config: ConfigManager) -> Result<Self, String> {
        let storage = config.storage_config().clone();
        tracing::info!("初始化AppState，上传目录: {}", storage.upload_dir.display());

        let store: Arc<dyn FileStore> = Arc::new(
            LocalFileStore::open(&storage.upload_dir, storage.allowed_extensions.clone())
                .map_err(|e| format!("无法打开上传目录: {}", e))?,
        );

        if config.admin_password().is_none() {
            tracing::warn!("未配置 ADMIN_PASSWORD，上传与删除将被拒绝");
        }

        let aggregator = FileAggregator::with_default_parser(config.ingest_config().clone());
        let inventory_api = Arc::new(InventoryApi::new(
            store.clone(),
            aggregator,
            storage,
            config.admin_password().map(str::to_string),
        ));
        let dashboard_api = Arc::new(DashboardApi::new(inventory_api.clone()));

        Ok(Self {
            config,
            store,
            inventory_api,
            dashboard_api,
        })
    }

    /// 按环境加载配置并装配
    pub fn from_env() -> Result<Self, String> {
        let config = ConfigManager::load().map_err(|e| format!("配置加载失败: {}", e))?;
        Self::new(config)
    }
}

/// 默认上传目录
///
/// 优先级: VISA_INVENTORY_UPLOAD_DIR > 用户数据目录 > ./uploads
pub fn get_default_upload_dir() -> PathBuf {
    // 允许通过环境变量显式指定上传目录（便于调试/测试/CI）
    if let Ok(path) = std::env::var(env_vars::UPLOAD_DIR) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }

    match dirs::data_dir() {
        // 开发环境使用独立目录，避免污染正式数据
        #[cfg(debug_assertions)]
        Some(data_dir) => data_dir.join("visa-inventory-dev").join("uploads"),
        #[cfg(not(debug_assertions))]
        Some(data_dir) => data_dir.join("visa-inventory").join("uploads"),
        None => PathBuf::from("./uploads"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use tempfile::TempDir;

    #[test]
    fn test_app_state_creates_upload_dir() {
        let dir = TempDir::new().unwrap();
        let mut app_config = AppConfig::default();
        app_config.storage.upload_dir = dir.path().join("nested").join("uploads");

        let state = AppState::new(ConfigManager::new(app_config)).unwrap();
        assert!(dir.path().join("nested").join("uploads").is_dir());
        assert!(state.config.admin_password().is_none());
    }
}

// ==========================================
// 签证排期库存 - 文件存储 Trait
// ==========================================
// 职责: 定义工作簿文件的存取接口（不包含解析逻辑）
// 红线: 存储层不理解文件内容，只做 CRUD
// ==========================================

use crate::domain::StoredFile;
use crate::repository::error::StoreResult;
use async_trait::async_trait;

// ==========================================
// FileStore Trait
// ==========================================
// 用途: 上传工作簿的持久化
// 实现者: LocalFileStore（本地目录）
#[async_trait]
pub trait FileStore: Send + Sync {
    /// 列出全部工作簿（按键名升序）
    async fn list(&self) -> StoreResult<Vec<StoredFile>>;

    /// 读取文件内容
    ///
    /// # 返回
    /// - Err(NotFound): 键不存在
    async fn read(&self, key: &str) -> StoreResult<Vec<u8>>;

    /// 写入文件（同名覆盖，后写者胜出）
    async fn write(&self, key: &str, bytes: &[u8]) -> StoreResult<()>;

    /// 删除文件
    ///
    /// # 返回
    /// - Err(NotFound): 键不存在
    async fn delete(&self, key: &str) -> StoreResult<()>;
}

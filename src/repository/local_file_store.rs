// ==========================================
// 签证排期库存 - 本地目录文件存储
// ==========================================
// 布局: 每个上传文件一份，文件名即键
// 并发: 同一键的写入/删除串行（每键一把 tokio Mutex）
// ==========================================

use crate::domain::StoredFile;
use crate::repository::error::{StoreError, StoreResult};
use crate::repository::file_store::FileStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};
use uuid::Uuid;

pub struct LocalFileStore {
    root: PathBuf,
    /// 小写扩展名，不含点；list 只返回这些扩展名的文件
    allowed_extensions: Vec<String>,
    key_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl LocalFileStore {
    /// 打开存储目录（不存在时创建）
    pub fn open<P: AsRef<Path>>(root: P, allowed_extensions: Vec<String>) -> StoreResult<Self> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root).map_err(|e| StoreError::DirectoryUnavailable {
            path: root.display().to_string(),
            message: e.to_string(),
        })?;

        info!(root = %root.display(), "本地文件存储已就绪");
        Ok(Self {
            root,
            allowed_extensions: allowed_extensions
                .into_iter()
                .map(|e| e.to_lowercase())
                .collect(),
            key_locks: Mutex::new(HashMap::new()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> StoreResult<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }

    fn is_listed(&self, file_name: &str) -> bool {
        Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|ext| {
                let ext = ext.to_lowercase();
                self.allowed_extensions.iter().any(|a| *a == ext)
            })
            .unwrap_or(false)
    }

    async fn lock_for(&self, key: &str) -> Arc<Mutex<()>> {
        let mut locks = self.key_locks.lock().await;
        locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// 无其他等待者时移除该键的锁（持有 map 锁期间计数不会增加）
    async fn release_lock(&self, key: &str, lock: Arc<Mutex<()>>) {
        let mut locks = self.key_locks.lock().await;
        if Arc::strong_count(&lock) == 2 {
            locks.remove(key);
        }
    }

    /// 先写临时文件再改名，读者不会看到半个文件
    async fn write_atomic(&self, key: &str, path: &Path, bytes: &[u8]) -> StoreResult<()> {
        let tmp_path = self.root.join(format!(".{}.{}.tmp", key, Uuid::new_v4()));
        tokio::fs::write(&tmp_path, bytes).await?;
        if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(e.into());
        }
        Ok(())
    }

    #[cfg(test)]
    async fn tracked_locks(&self) -> usize {
        self.key_locks.lock().await.len()
    }
}

/// 键只能是单个文件名
fn validate_key(key: &str) -> StoreResult<()> {
    let invalid = key.is_empty()
        || key == "."
        || key == ".."
        || key.contains('/')
        || key.contains('\\')
        || key.contains('\0');
    if invalid {
        return Err(StoreError::InvalidKey(key.to_string()));
    }
    Ok(())
}

fn not_found_or(key: &str, err: std::io::Error) -> StoreError {
    if err.kind() == ErrorKind::NotFound {
        StoreError::NotFound {
            key: key.to_string(),
        }
    } else {
        StoreError::from(err)
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn list(&self) -> StoreResult<Vec<StoredFile>> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let Ok(key) = entry.file_name().into_string() else {
                continue;
            };
            if !self.is_listed(&key) {
                continue;
            }
            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }
            files.push(StoredFile {
                key,
                size_bytes: metadata.len(),
                modified_at: metadata.modified().ok().map(DateTime::<Utc>::from),
            });
        }

        files.sort_by(|a, b| a.key.cmp(&b.key));
        debug!(count = files.len(), "列出存储文件");
        Ok(files)
    }

    async fn read(&self, key: &str) -> StoreResult<Vec<u8>> {
        let path = self.path_for(key)?;
        tokio::fs::read(&path).await.map_err(|e| not_found_or(key, e))
    }

    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    async fn write(&self, key: &str, bytes: &[u8]) -> StoreResult<()> {
        let path = self.path_for(key)?;
        let lock = self.lock_for(key).await;
        let result = {
            let _guard = lock.lock().await;
            self.write_atomic(key, &path, bytes).await
        };
        self.release_lock(key, lock).await;
        result?;

        info!(key = %key, "文件已保存");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, key: &str) -> StoreResult<()> {
        let path = self.path_for(key)?;
        let lock = self.lock_for(key).await;
        let result = {
            let _guard = lock.lock().await;
            tokio::fs::remove_file(&path)
                .await
                .map_err(|e| not_found_or(key, e))
        };
        self.release_lock(key, lock).await;
        result?;

        info!(key = %key, "文件已删除");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> LocalFileStore {
        LocalFileStore::open(
            dir.path().join("uploads"),
            vec!["xlsx".to_string(), "csv".to_string()],
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_write_read_list_delete() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        store.write("b_file.csv", b"x,y").await.unwrap();
        store.write("a_file.xlsx", b"zip").await.unwrap();
        std::fs::write(store.root().join("notes.txt"), b"ignored").unwrap();

        let keys: Vec<String> = store.list().await.unwrap().into_iter().map(|f| f.key).collect();
        assert_eq!(keys, vec!["a_file.xlsx", "b_file.csv"]);

        assert_eq!(store.read("b_file.csv").await.unwrap(), b"x,y");

        store.delete("b_file.csv").await.unwrap();
        assert!(matches!(
            store.read("b_file.csv").await,
            Err(StoreError::NotFound { .. })
        ));
        assert!(matches!(
            store.delete("b_file.csv").await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_overwrite_keeps_last_write() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        store.write("same.csv", b"first").await.unwrap();
        store.write("same.csv", b"second").await.unwrap();

        let files = store.list().await.unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].size_bytes, 6);
        assert!(files[0].modified_at.is_some());
        assert_eq!(store.read("same.csv").await.unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_concurrent_writes_same_key() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(store(&dir));

        let tasks: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .write("race.csv", format!("writer-{}", i).as_bytes())
                        .await
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let content = String::from_utf8(store.read("race.csv").await.unwrap()).unwrap();
        assert!(content.starts_with("writer-"));
        assert_eq!(store.list().await.unwrap().len(), 1);
        assert_eq!(store.tracked_locks().await, 0);
    }

    #[tokio::test]
    async fn test_key_locks_released_after_operations() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        for i in 0..5 {
            let key = format!("file_{}.csv", i);
            store.write(&key, b"x").await.unwrap();
            store.delete(&key).await.unwrap();
        }
        assert!(store.delete("missing.csv").await.is_err());
        assert_eq!(store.tracked_locks().await, 0);
    }

    #[tokio::test]
    async fn test_rejects_path_like_keys() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        for key in ["", "..", "../escape.csv", "nested/file.csv"] {
            assert!(matches!(
                store.write(key, b"x").await,
                Err(StoreError::InvalidKey(_))
            ));
        }
    }
}

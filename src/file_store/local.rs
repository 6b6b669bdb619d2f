use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use super::{FileStore, StorageHint, StoredFile};
use crate::config::AppConfig;
use crate::errors::{InternHubError, Result};
use crate::models::submissions::requests::FilePayload;

/// 写入本地上传目录的文件存储
pub struct LocalFileStore {
    dir: PathBuf,
    public_base_url: String,
}

impl LocalFileStore {
    pub fn new(dir: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config() -> Self {
        let config = AppConfig::get();
        Self::new(&config.upload.dir, &config.upload.public_base_url)
    }

    fn extension_of(file_name: &str) -> String {
        Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{}", ext.to_lowercase()))
            .unwrap_or_else(|| ".bin".to_string())
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn put(&self, file: &FilePayload, hint: &StorageHint) -> Result<StoredFile> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| InternHubError::storage_failure(format!("创建上传目录失败: {e}")))?;

        let stored_name = format!(
            "{}-{}{}",
            chrono::Utc::now().timestamp(),
            Uuid::new_v4(),
            Self::extension_of(&file.file_name)
        );
        let path = self.dir.join(&stored_name);
        tokio::fs::write(&path, &file.bytes)
            .await
            .map_err(|e| InternHubError::storage_failure(format!("写入文件失败: {e}")))?;

        debug!(
            "Stored {} bytes for assignment {} / {} as {}",
            file.size(),
            hint.assignment_id,
            hint.intern_username,
            stored_name
        );

        Ok(StoredFile {
            file_url: format!("{}/{}", self.public_base_url, stored_name),
            file_name: file.file_name.clone(),
            stored_name,
        })
    }

    async fn remove(&self, stored: &StoredFile) -> Result<()> {
        // 只接受本存储生成的文件名
        if stored.stored_name.contains('/') || stored.stored_name.contains("..") {
            return Err(InternHubError::file_operation(format!(
                "refusing to remove '{}'",
                stored.stored_name
            )));
        }
        tokio::fs::remove_file(self.dir.join(&stored.stored_name))
            .await
            .map_err(InternHubError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf(name: &str) -> FilePayload {
        FilePayload {
            file_name: name.to_string(),
            content_type: "application/pdf".to_string(),
            bytes: b"%PDF-1.7 test".to_vec(),
        }
    }

    fn hint() -> StorageHint {
        StorageHint {
            assignment_id: 7,
            intern_username: "alice".to_string(),
        }
    }

    #[tokio::test]
    async fn put_writes_file_and_builds_url() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFileStore::new(dir.path().join("uploads"), "/uploads/");

        let stored = store.put(&pdf("Report.PDF"), &hint()).await.unwrap();
        assert_eq!(stored.file_name, "Report.PDF");
        assert!(stored.stored_name.ends_with(".pdf"));
        assert_eq!(stored.file_url, format!("/uploads/{}", stored.stored_name));

        let on_disk = std::fs::read(dir.path().join("uploads").join(&stored.stored_name)).unwrap();
        assert_eq!(on_disk, b"%PDF-1.7 test");
    }

    #[tokio::test]
    async fn remove_deletes_stored_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFileStore::new(dir.path(), "/uploads");

        let stored = store.put(&pdf("a.pdf"), &hint()).await.unwrap();
        store.remove(&stored).await.unwrap();
        assert!(!dir.path().join(&stored.stored_name).exists());
        assert!(store.remove(&stored).await.is_err());
    }

    #[tokio::test]
    async fn remove_rejects_paths() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFileStore::new(dir.path(), "/uploads");
        let bogus = StoredFile {
            file_url: String::new(),
            file_name: String::new(),
            stored_name: "../etc/passwd".to_string(),
        };
        assert!(store.remove(&bogus).await.is_err());
    }

    #[tokio::test]
    async fn unwritable_directory_is_storage_failure() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();
        let store = LocalFileStore::new(blocker.join("nested"), "/uploads");

        let err = store.put(&pdf("a.pdf"), &hint()).await.unwrap_err();
        assert_eq!(err.code(), "E015");
    }
}

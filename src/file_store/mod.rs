//! 文件存储协作者
//!
//! 提交工作流只通过 [`FileStore`] 存取 PDF 提交，存储失败与校验失败是不同的错误。

mod local;

pub use local::LocalFileStore;

use async_trait::async_trait;
use serde::Serialize;

use crate::errors::Result;
use crate::models::submissions::requests::FilePayload;

/// 命名提示
#[derive(Debug, Clone)]
pub struct StorageHint {
    pub assignment_id: i64,
    pub intern_username: String,
}

/// 存储后的持久引用
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredFile {
    pub file_url: String,
    // 原始文件名
    pub file_name: String,
    // 存储中的键
    pub stored_name: String,
}

#[async_trait]
pub trait FileStore: Send + Sync {
    async fn put(&self, file: &FilePayload, hint: &StorageHint) -> Result<StoredFile>;
    async fn remove(&self, stored: &StoredFile) -> Result<()>;
}

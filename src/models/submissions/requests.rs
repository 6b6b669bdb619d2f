use serde::Deserialize;
use ts_rs::TS;

use super::entities::SubmissionType;

/// JSON 提交请求（链接类提交）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "submission.ts")]
pub struct SubmitRequest {
    #[serde(default = "default_submission_type")]
    pub submission_type: SubmissionType,
    pub submission_content: Option<String>,
}

fn default_submission_type() -> SubmissionType {
    SubmissionType::Link
}

/// 评审请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "submission.ts")]
pub struct ReviewRequest {
    pub rating: i32,
    #[serde(default)]
    pub comments: String,
}

/// 上传的文件内容
#[derive(Debug, Clone)]
pub struct FilePayload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl FilePayload {
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// 提交工作流的输入
#[derive(Debug, Clone)]
pub struct SubmissionPayload {
    pub submission_type: SubmissionType,
    pub content: Option<String>,
    pub file: Option<FilePayload>,
}

impl SubmissionPayload {
    pub fn link(url: impl Into<String>) -> Self {
        Self {
            submission_type: SubmissionType::Link,
            content: Some(url.into()),
            file: None,
        }
    }

    pub fn pdf(file: FilePayload) -> Self {
        Self {
            submission_type: SubmissionType::Pdf,
            content: None,
            file: Some(file),
        }
    }
}

impl From<SubmitRequest> for SubmissionPayload {
    fn from(req: SubmitRequest) -> Self {
        Self {
            submission_type: req.submission_type,
            content: req.submission_content,
            file: None,
        }
    }
}

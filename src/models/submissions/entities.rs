use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 提交类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "submission.ts")]
pub enum SubmissionType {
    Link,
    Pdf,
}

impl SubmissionType {
    pub const LINK: &'static str = "link";
    pub const PDF: &'static str = "pdf";

    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionType::Link => Self::LINK,
            SubmissionType::Pdf => Self::PDF,
        }
    }
}

impl std::fmt::Display for SubmissionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SubmissionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            SubmissionType::LINK => Ok(SubmissionType::Link),
            SubmissionType::PDF => Ok(SubmissionType::Pdf),
            other => Err(format!(
                "Invalid submission type: '{other}'. Supported types: link, pdf"
            )),
        }
    }
}

// 单个提交的状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "submission.ts")]
pub enum SubmissionStatus {
    Submitted,
    UnderReview,
    Reviewed,
}

impl SubmissionStatus {
    pub const SUBMITTED: &'static str = "submitted";
    pub const UNDER_REVIEW: &'static str = "under_review";
    pub const REVIEWED: &'static str = "reviewed";

    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Submitted => Self::SUBMITTED,
            SubmissionStatus::UnderReview => Self::UNDER_REVIEW,
            SubmissionStatus::Reviewed => Self::REVIEWED,
        }
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            SubmissionStatus::SUBMITTED => Ok(SubmissionStatus::Submitted),
            SubmissionStatus::UNDER_REVIEW => Ok(SubmissionStatus::UnderReview),
            SubmissionStatus::REVIEWED => Ok(SubmissionStatus::Reviewed),
            _ => Err(format!("Invalid submission status: '{s}'")),
        }
    }
}

/// 导师评审记录，重复评审直接覆盖
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "submission.ts")]
pub struct MentorReview {
    pub rating: i32,
    pub comments: String,
    pub reviewed_at: DateTime<Utc>,
    pub reviewed_by: String,
}

/// 实习生对某个作业的唯一一次提交
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "submission.ts")]
pub struct Submission {
    pub id: i64,
    pub assignment_id: i64,
    pub intern_username: String,
    pub submission_type: SubmissionType,
    // link 类型时为 URL
    pub submission_content: Option<String>,
    // pdf 类型时由文件存储返回
    pub file_url: Option<String>,
    pub file_name: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub is_late_submission: bool,
    pub status: SubmissionStatus,
    pub mentor_review: Option<MentorReview>,
}

impl Submission {
    pub fn is_reviewed(&self) -> bool {
        self.status == SubmissionStatus::Reviewed
    }
}

/// 逗号分隔的提交类型列表（数据库存储格式）
pub fn join_submission_types(types: &[SubmissionType]) -> String {
    types
        .iter()
        .map(SubmissionType::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

pub fn parse_submission_types(raw: &str) -> Result<Vec<SubmissionType>, String> {
    raw.split(',')
        .filter(|part| !part.trim().is_empty())
        .map(str::parse)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submission_type_list_storage_format() {
        let types = vec![SubmissionType::Link, SubmissionType::Pdf];
        assert_eq!(join_submission_types(&types), "link,pdf");
        assert_eq!(parse_submission_types("link, pdf").unwrap(), types);
        assert_eq!(parse_submission_types("").unwrap(), vec![]);
        assert!(parse_submission_types("link,zip").is_err());
    }
}

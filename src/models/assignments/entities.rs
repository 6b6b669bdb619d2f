use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ts_rs::TS;

use crate::models::submissions::entities::{Submission, SubmissionType};

// 作业生命周期状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "assignment.ts")]
pub enum AssignmentStatus {
    Pending,
    Posted,
    Active,
    UnderReview,
    Reviewed,
    Completed,
}

impl AssignmentStatus {
    pub const PENDING: &'static str = "pending";
    pub const POSTED: &'static str = "posted";
    pub const ACTIVE: &'static str = "active";
    pub const UNDER_REVIEW: &'static str = "under_review";
    pub const REVIEWED: &'static str = "reviewed";
    pub const COMPLETED: &'static str = "completed";

    pub const ALL: [AssignmentStatus; 6] = [
        AssignmentStatus::Pending,
        AssignmentStatus::Posted,
        AssignmentStatus::Active,
        AssignmentStatus::UnderReview,
        AssignmentStatus::Reviewed,
        AssignmentStatus::Completed,
    ];

    /// 允许新提交的状态
    pub fn is_open_for_submissions(&self) -> bool {
        matches!(
            self,
            AssignmentStatus::Posted | AssignmentStatus::Active | AssignmentStatus::UnderReview
        )
    }

    /// 实习生可见的状态
    pub fn is_intern_visible(&self) -> bool {
        !matches!(self, AssignmentStatus::Pending)
    }

    pub fn intern_visible() -> &'static [AssignmentStatus] {
        &[
            AssignmentStatus::Posted,
            AssignmentStatus::Active,
            AssignmentStatus::UnderReview,
            AssignmentStatus::Reviewed,
            AssignmentStatus::Completed,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentStatus::Pending => Self::PENDING,
            AssignmentStatus::Posted => Self::POSTED,
            AssignmentStatus::Active => Self::ACTIVE,
            AssignmentStatus::UnderReview => Self::UNDER_REVIEW,
            AssignmentStatus::Reviewed => Self::REVIEWED,
            AssignmentStatus::Completed => Self::COMPLETED,
        }
    }
}

impl std::fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AssignmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AssignmentStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Invalid assignment status: '{s}'"))
    }
}

/// 作业分发对象：团队全部实习生，或显式名单
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AssignedTo {
    #[default]
    All,
    Interns(Vec<String>),
}

impl AssignedTo {
    pub const ALL: &'static str = "all";

    pub fn explicit_interns(&self) -> &[String] {
        match self {
            AssignedTo::All => &[],
            AssignedTo::Interns(list) => list,
        }
    }

    /// 显式名单中是否包含该实习生；`All` 时需另外核对团队成员
    pub fn lists(&self, username: &str) -> bool {
        self.explicit_interns().iter().any(|u| u == username)
    }
}

impl Serialize for AssignedTo {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            AssignedTo::All => serializer.serialize_str(AssignedTo::ALL),
            AssignedTo::Interns(list) => list.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for AssignedTo {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Keyword(String),
            List(Vec<String>),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Keyword(k) if k == AssignedTo::ALL => Ok(AssignedTo::All),
            Raw::Keyword(k) => Err(serde::de::Error::custom(format!(
                "assigned_to must be \"all\" or a list of usernames, got '{k}'"
            ))),
            Raw::List(list) => Ok(AssignedTo::Interns(list)),
        }
    }
}

/// 作业记录，内含全部提交
///
/// `status`、`accepts_submissions`、`revision` 与 `submissions` 只能经由
/// 工作流修改，外部只读。
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "assignment.ts")]
pub struct Assignment {
    pub id: i64,
    pub organization_id: String,
    pub organization_name: String,
    pub team_name: String,
    // 创建者用户名
    pub assignment_from: String,
    pub assignment_name: String,
    pub description: Option<String>,
    pub instructions: Option<String>,
    #[ts(type = "\"all\" | Array<string>")]
    pub assigned_to: AssignedTo,
    pub deadline: Option<DateTime<Utc>>,
    pub(crate) status: AssignmentStatus,
    pub(crate) accepts_submissions: bool,
    pub max_file_size: i64,
    pub allowed_submission_types: Vec<SubmissionType>,
    pub allow_late_submission: bool,
    // 旧版汇总反馈，只写一次
    pub(crate) mentor_feedback: Option<String>,
    pub(crate) revision: i64,
    pub(crate) submissions: Vec<Submission>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Assignment {
    pub fn status(&self) -> AssignmentStatus {
        self.status
    }

    pub fn accepts_submissions(&self) -> bool {
        self.accepts_submissions
    }

    pub fn revision(&self) -> i64 {
        self.revision
    }

    pub fn submissions(&self) -> &[Submission] {
        &self.submissions
    }

    pub fn mentor_feedback(&self) -> Option<&str> {
        self.mentor_feedback.as_deref()
    }

    pub fn submission_of(&self, intern_username: &str) -> Option<&Submission> {
        self.submissions
            .iter()
            .find(|s| s.intern_username == intern_username)
    }

    pub fn allows_type(&self, submission_type: SubmissionType) -> bool {
        self.allowed_submission_types.contains(&submission_type)
    }

    /// 实习生视图只保留本人提交
    pub fn restrict_to_intern(mut self, intern_username: &str) -> Self {
        self.submissions
            .retain(|s| s.intern_username == intern_username);
        self
    }
}

//! 存储层写入参数
//!
//! 工作流在纯逻辑中决定要写什么，存储层只负责原子地落库。

use chrono::{DateTime, Utc};

use crate::models::{
    accounts::entities::Role,
    assignments::entities::{AssignedTo, AssignmentStatus},
    submissions::entities::{MentorReview, SubmissionType},
    teams::entities::TeamRole,
};

/// 新作业（初始状态固定为 pending、不接收提交、revision 为 0）
#[derive(Debug, Clone)]
pub struct NewAssignment {
    pub organization_id: String,
    pub organization_name: String,
    pub team_name: String,
    pub assignment_from: String,
    pub assignment_name: String,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub assigned_to: AssignedTo,
    pub deadline: Option<DateTime<Utc>>,
    pub max_file_size: i64,
    pub allowed_submission_types: Vec<SubmissionType>,
    pub allow_late_submission: bool,
    pub created_at: DateTime<Utc>,
}

/// 可编辑字段的变更，`None` 表示不修改
#[derive(Debug, Clone, Default)]
pub struct AssignmentChanges {
    pub assignment_name: Option<String>,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub assigned_to: Option<AssignedTo>,
    pub deadline: Option<DateTime<Utc>>,
    pub max_file_size: Option<i64>,
    pub allowed_submission_types: Option<Vec<SubmissionType>>,
    pub allow_late_submission: Option<bool>,
    pub updated_at: DateTime<Utc>,
}

/// 状态流转的写入内容
#[derive(Debug, Clone, PartialEq)]
pub struct StatusChange {
    pub status: AssignmentStatus,
    pub accepts_submissions: bool,
    pub updated_at: DateTime<Utc>,
}

/// 待插入的提交
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub assignment_id: i64,
    pub intern_username: String,
    pub submission_type: SubmissionType,
    pub submission_content: Option<String>,
    pub file_url: Option<String>,
    pub file_name: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub is_late_submission: bool,
}

/// 提交写入结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionInsert {
    Inserted(i64),
    // 作业已不在可提交状态
    Closed,
    // 该实习生已有提交
    Duplicate,
}

/// 评审写入内容
#[derive(Debug, Clone)]
pub struct ReviewRecord {
    pub intern_username: String,
    pub review: MentorReview,
    // 评审后重新推导出的作业状态
    pub assignment_status: AssignmentStatus,
    pub accepts_submissions: bool,
    // 仅在旧版反馈为空时写入
    pub mentor_feedback: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewStaffAccount {
    pub username: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub role: Role,
    pub organization_id: String,
    pub organization_name: String,
}

#[derive(Debug, Clone)]
pub struct NewInternAccount {
    pub username: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub organization_id: String,
    pub organization_name: String,
}

#[derive(Debug, Clone)]
pub struct NewTeam {
    pub team_name: String,
    pub organization_id: String,
    pub organization_name: String,
    pub members: Vec<(String, TeamRole)>,
}

/// 作业列表的可见范围
#[derive(Debug, Clone, PartialEq)]
pub enum AssignmentScope {
    // 组织管理员：组织内全部作业
    Organization {
        organization_id: String,
        organization_name: String,
    },
    // 员工：自己创建的作业
    CreatedBy {
        organization_id: String,
        organization_name: String,
        username: String,
    },
    // 实习生：分发给自己且处于可见状态的作业
    Intern {
        organization_id: String,
        organization_name: String,
        username: String,
        team_names: Vec<String>,
    },
}

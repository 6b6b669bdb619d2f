use chrono::{DateTime, Utc};
use serde::Deserialize;
use ts_rs::TS;

use super::entities::{AssignedTo, AssignmentStatus};
use crate::models::common::pagination::PaginationQuery;
use crate::models::submissions::entities::SubmissionType;

/// 创建作业请求
///
/// 状态与是否接收提交不在请求中，未知字段直接拒绝。
#[derive(Debug, Clone, Deserialize, TS)]
#[serde(deny_unknown_fields)]
#[ts(export, export_to = "assignment.ts")]
pub struct CreateAssignmentRequest {
    pub team_name: String,
    pub assignment_name: String,
    pub description: Option<String>,
    pub instructions: Option<String>,
    #[serde(default)]
    #[ts(type = "\"all\" | Array<string> | null")]
    pub assigned_to: Option<AssignedTo>,
    pub deadline: Option<DateTime<Utc>>, // ISO 8601，如 "2026-01-24T12:00:00Z"
    pub max_file_size: Option<i64>,
    pub allowed_submission_types: Option<Vec<SubmissionType>>,
    pub allow_late_submission: Option<bool>,
}

/// 更新作业请求（只含可编辑字段）
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[serde(deny_unknown_fields)]
#[ts(export, export_to = "assignment.ts")]
pub struct UpdateAssignmentRequest {
    pub assignment_name: Option<String>,
    pub description: Option<String>,
    pub instructions: Option<String>,
    #[serde(default)]
    #[ts(type = "\"all\" | Array<string> | null")]
    pub assigned_to: Option<AssignedTo>,
    pub deadline: Option<DateTime<Utc>>,
    pub max_file_size: Option<i64>,
    pub allowed_submission_types: Option<Vec<SubmissionType>>,
    pub allow_late_submission: Option<bool>,
}

/// 状态流转请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "assignment.ts")]
pub struct TransitionRequest {
    pub status: AssignmentStatus,
}

/// 作业列表查询参数（HTTP 请求）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "assignment.ts")]
pub struct AssignmentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<AssignmentStatus>,
    pub team_name: Option<String>,
    pub search: Option<String>,
}

// 存储层使用的查询参数
#[derive(Debug, Clone, Default)]
pub struct AssignmentListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub status: Option<AssignmentStatus>,
    pub team_name: Option<String>,
    pub search: Option<String>,
}

impl From<AssignmentListParams> for AssignmentListQuery {
    fn from(params: AssignmentListParams) -> Self {
        Self {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            status: params.status,
            team_name: params.team_name,
            search: params.search,
        }
    }
}

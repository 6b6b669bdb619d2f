use serde::Serialize;
use ts_rs::TS;

use super::entities::{Assignment, AssignmentStatus};
use crate::models::common::pagination::PaginationInfo;

/// 状态流转结果
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "assignment.ts")]
pub struct TransitionResponse {
    pub assignment_id: i64,
    pub old_status: AssignmentStatus,
    pub new_status: AssignmentStatus,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "assignment.ts")]
pub struct AssignmentListResponse {
    pub items: Vec<Assignment>,
    pub pagination: PaginationInfo,
}

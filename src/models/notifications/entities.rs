use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 通知类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "notification.ts")]
pub enum NotificationKind {
    AssignmentPosted,
    AssignmentActivated,
    SubmissionReceived,
    SubmissionReviewed,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::AssignmentPosted => "assignment_posted",
            NotificationKind::AssignmentActivated => "assignment_activated",
            NotificationKind::SubmissionReceived => "submission_received",
            NotificationKind::SubmissionReviewed => "submission_reviewed",
        }
    }
}

impl std::str::FromStr for NotificationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "assignment_posted" => Ok(NotificationKind::AssignmentPosted),
            "assignment_activated" => Ok(NotificationKind::AssignmentActivated),
            "submission_received" => Ok(NotificationKind::SubmissionReceived),
            "submission_reviewed" => Ok(NotificationKind::SubmissionReviewed),
            _ => Err(format!("Invalid notification kind: '{s}'")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "notification.ts")]
pub struct Notification {
    pub id: i64,
    pub recipient: String,
    pub kind: NotificationKind,
    pub title: String,
    pub content: String,
    pub assignment_id: Option<i64>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// 待投递的通知
#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    pub recipient: String,
    pub kind: NotificationKind,
    pub title: String,
    pub content: String,
    pub assignment_id: Option<i64>,
}

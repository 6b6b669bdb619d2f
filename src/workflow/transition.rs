//! 状态流转引擎
//!
//! 流转表与目标状态校验都是纯函数，持久化由调用方按 revision 比较交换完成。

use chrono::{DateTime, Utc};

use crate::errors::{InternHubError, Result};
use crate::models::assignments::entities::{Assignment, AssignmentStatus};
use crate::storage::StatusChange;

impl AssignmentStatus {
    /// 当前状态允许到达的目标状态
    pub fn allowed_targets(&self) -> &'static [AssignmentStatus] {
        use AssignmentStatus::*;
        match self {
            Pending => &[Posted, Active],
            Posted => &[Active, UnderReview, Completed],
            Active => &[UnderReview, Completed],
            UnderReview => &[Reviewed, Active, Completed],
            Reviewed => &[Completed],
            Completed => &[],
        }
    }

    pub fn can_transition_to(&self, target: AssignmentStatus) -> bool {
        self.allowed_targets().contains(&target)
    }

    pub fn is_terminal(&self) -> bool {
        self.allowed_targets().is_empty()
    }
}

/// 进入某状态后是否接收提交
///
/// posted/active 打开，completed/reviewed 关闭，其余保持不变。
pub fn accepts_after(target: AssignmentStatus, current: bool) -> bool {
    match target {
        AssignmentStatus::Posted | AssignmentStatus::Active => true,
        AssignmentStatus::Reviewed | AssignmentStatus::Completed => false,
        AssignmentStatus::Pending | AssignmentStatus::UnderReview => current,
    }
}

/// 一次已通过校验的流转
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionPlan {
    pub old_status: AssignmentStatus,
    pub change: StatusChange,
}

/// 校验流转表与目标状态的前置条件（不含操作者授权）
pub fn plan_transition(
    assignment: &Assignment,
    target: AssignmentStatus,
    now: DateTime<Utc>,
) -> Result<TransitionPlan> {
    let current = assignment.status();
    if !current.can_transition_to(target) {
        return Err(InternHubError::invalid_transition(format!(
            "cannot move assignment from {current} to {target}"
        )));
    }

    match target {
        AssignmentStatus::Posted | AssignmentStatus::Active => match assignment.deadline {
            None => {
                return Err(InternHubError::precondition_failed(format!(
                    "a deadline is required before the assignment can become {target}"
                )));
            }
            Some(deadline) if deadline <= now => {
                return Err(InternHubError::precondition_failed(
                    "deadline must be in the future",
                ));
            }
            Some(_) => {}
        },
        AssignmentStatus::UnderReview => {
            if assignment.submissions().is_empty() {
                return Err(InternHubError::precondition_failed(
                    "cannot review an assignment without submissions",
                ));
            }
        }
        AssignmentStatus::Reviewed => {
            if assignment.submissions().is_empty() {
                return Err(InternHubError::precondition_failed(
                    "cannot mark reviewed without submissions",
                ));
            }
            let pending = assignment
                .submissions()
                .iter()
                .filter(|s| !s.is_reviewed())
                .count();
            if pending > 0 {
                return Err(InternHubError::precondition_failed(format!(
                    "{pending} submission(s) have not been reviewed"
                )));
            }
        }
        AssignmentStatus::Completed | AssignmentStatus::Pending => {}
    }

    Ok(TransitionPlan {
        old_status: current,
        change: StatusChange {
            status: target,
            accepts_submissions: accepts_after(target, assignment.accepts_submissions()),
            updated_at: now,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::submissions::entities::SubmissionStatus;
    use crate::workflow::testing::{assignment, submission};
    use chrono::Duration;

    #[test]
    fn table_matches_lifecycle() {
        use AssignmentStatus::*;
        assert!(Pending.can_transition_to(Posted));
        assert!(Pending.can_transition_to(Active));
        assert!(!Pending.can_transition_to(Reviewed));
        assert!(UnderReview.can_transition_to(Active));
        assert!(!Reviewed.can_transition_to(UnderReview));
        assert!(Completed.is_terminal());
        assert!(!Reviewed.is_terminal());
    }

    #[test]
    fn posting_opens_submissions() {
        let now = Utc::now();
        let a = assignment(AssignmentStatus::Pending);
        let plan = plan_transition(&a, AssignmentStatus::Posted, now).unwrap();
        assert_eq!(plan.old_status, AssignmentStatus::Pending);
        assert_eq!(plan.change.status, AssignmentStatus::Posted);
        assert!(plan.change.accepts_submissions);
    }

    #[test]
    fn posting_requires_future_deadline() {
        let now = Utc::now();
        let mut a = assignment(AssignmentStatus::Pending);
        a.deadline = None;
        let err = plan_transition(&a, AssignmentStatus::Posted, now).unwrap_err();
        assert_eq!(err.code(), "E014");

        a.deadline = Some(now - Duration::days(1));
        let err = plan_transition(&a, AssignmentStatus::Active, now).unwrap_err();
        assert!(err.message().contains("deadline must be in the future"));

        // 截止时间等于当前时间也不行
        a.deadline = Some(now);
        assert!(plan_transition(&a, AssignmentStatus::Posted, now).is_err());
    }

    #[test]
    fn completing_closes_submissions() {
        let mut a = assignment(AssignmentStatus::Posted);
        a.accepts_submissions = true;
        let plan = plan_transition(&a, AssignmentStatus::Completed, Utc::now()).unwrap();
        assert!(!plan.change.accepts_submissions);
    }

    #[test]
    fn under_review_requires_submissions() {
        let a = assignment(AssignmentStatus::Active);
        assert!(plan_transition(&a, AssignmentStatus::UnderReview, Utc::now()).is_err());

        let mut a = assignment(AssignmentStatus::Active);
        a.accepts_submissions = true;
        a.submissions.push(submission("alice", SubmissionStatus::Submitted));
        let plan = plan_transition(&a, AssignmentStatus::UnderReview, Utc::now()).unwrap();
        assert!(plan.change.accepts_submissions);
    }

    #[test]
    fn reviewed_requires_every_submission_reviewed() {
        let mut a = assignment(AssignmentStatus::UnderReview);
        a.submissions.push(submission("alice", SubmissionStatus::Reviewed));
        a.submissions.push(submission("bob", SubmissionStatus::Submitted));
        let err = plan_transition(&a, AssignmentStatus::Reviewed, Utc::now()).unwrap_err();
        assert!(err.message().contains("1 submission(s)"));

        a.submissions[1].status = SubmissionStatus::Reviewed;
        let plan = plan_transition(&a, AssignmentStatus::Reviewed, Utc::now()).unwrap();
        assert!(!plan.change.accepts_submissions);
    }

    #[test]
    fn pending_to_reviewed_is_invalid() {
        let a = assignment(AssignmentStatus::Pending);
        let err = plan_transition(&a, AssignmentStatus::Reviewed, Utc::now()).unwrap_err();
        assert_eq!(err.code(), "E013");
    }
}

//! 评审规则

use chrono::{DateTime, Utc};

use crate::errors::{InternHubError, Result};
use crate::models::accounts::entities::Account;
use crate::models::assignments::entities::{Assignment, AssignmentStatus};
use crate::models::submissions::entities::{MentorReview, Submission, SubmissionStatus};
use crate::storage::ReviewRecord;

use super::access::{require_owner_or_admin, require_staff_in_org};
use super::transition::accepts_after;

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

pub fn validate_rating(rating: i32) -> Result<()> {
    if (MIN_RATING..=MAX_RATING).contains(&rating) {
        Ok(())
    } else {
        Err(InternHubError::precondition_failed(
            "rating must be between 1 and 5",
        ))
    }
}

/// 评审后的作业状态：全部已评审则为 reviewed，否则回到 under_review
pub fn derive_status(current: AssignmentStatus, submissions: &[Submission]) -> AssignmentStatus {
    if current == AssignmentStatus::Completed {
        return current;
    }
    let all_reviewed = !submissions.is_empty() && submissions.iter().all(Submission::is_reviewed);
    if all_reviewed {
        AssignmentStatus::Reviewed
    } else {
        AssignmentStatus::UnderReview
    }
}

/// 旧版汇总反馈只在为空时写入一次
pub fn legacy_feedback(existing: Option<&str>, rating: i32, comments: &str) -> Option<String> {
    if existing.is_some() {
        return None;
    }
    if comments.trim().is_empty() {
        Some(format!("Rating: {rating}/5"))
    } else {
        Some(format!("Rating: {rating}/5 - {}", comments.trim()))
    }
}

/// 一次已通过校验的评审
#[derive(Debug, Clone)]
pub struct ReviewPlan {
    pub old_status: AssignmentStatus,
    pub record: ReviewRecord,
    // 评审后的提交
    pub submission: Submission,
}

pub fn plan_review(
    assignment: &Assignment,
    intern_username: &str,
    rating: i32,
    comments: &str,
    reviewer: &Account,
    now: DateTime<Utc>,
) -> Result<ReviewPlan> {
    let staff = require_staff_in_org(reviewer, assignment)?;
    validate_rating(rating)?;
    require_owner_or_admin(staff, assignment)?;

    let Some(existing) = assignment.submission_of(intern_username) else {
        return Err(InternHubError::not_found(format!(
            "submission not found for intern '{intern_username}'"
        )));
    };

    let review = MentorReview {
        rating,
        comments: comments.to_string(),
        reviewed_at: now,
        reviewed_by: staff.username.clone(),
    };
    let mut submission = existing.clone();
    submission.status = SubmissionStatus::Reviewed;
    submission.mentor_review = Some(review.clone());

    let after: Vec<Submission> = assignment
        .submissions()
        .iter()
        .map(|s| {
            if s.intern_username == intern_username {
                submission.clone()
            } else {
                s.clone()
            }
        })
        .collect();
    let status = derive_status(assignment.status(), &after);

    Ok(ReviewPlan {
        old_status: assignment.status(),
        record: ReviewRecord {
            intern_username: intern_username.to_string(),
            review,
            assignment_status: status,
            accepts_submissions: if status == assignment.status() {
                assignment.accepts_submissions()
            } else {
                accepts_after(status, assignment.accepts_submissions())
            },
            mentor_feedback: legacy_feedback(assignment.mentor_feedback(), rating, comments),
        },
        submission,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::accounts::entities::Role;
    use crate::workflow::testing::{assignment, intern, staff, submission};

    fn under_review_with(interns: &[(&str, SubmissionStatus)]) -> Assignment {
        let mut a = assignment(AssignmentStatus::UnderReview);
        for (name, status) in interns {
            a.submissions.push(submission(name, *status));
        }
        a
    }

    #[test]
    fn rating_bounds() {
        assert!(validate_rating(1).is_ok());
        assert!(validate_rating(5).is_ok());
        assert!(validate_rating(0).is_err());
        assert_eq!(validate_rating(6).unwrap_err().message(), "rating must be between 1 and 5");
    }

    #[test]
    fn derived_status() {
        use SubmissionStatus::*;
        let done = vec![submission("a", Reviewed), submission("b", Reviewed)];
        let half = vec![submission("a", Reviewed), submission("b", Submitted)];
        assert_eq!(derive_status(AssignmentStatus::UnderReview, &done), AssignmentStatus::Reviewed);
        assert_eq!(derive_status(AssignmentStatus::UnderReview, &half), AssignmentStatus::UnderReview);
        assert_eq!(derive_status(AssignmentStatus::Active, &half), AssignmentStatus::UnderReview);
        // 新提交未评审时从 reviewed 回到 under_review
        assert_eq!(derive_status(AssignmentStatus::Reviewed, &half), AssignmentStatus::UnderReview);
        assert_eq!(derive_status(AssignmentStatus::Completed, &half), AssignmentStatus::Completed);
        assert_eq!(derive_status(AssignmentStatus::Completed, &done), AssignmentStatus::Completed);
    }

    #[test]
    fn legacy_feedback_written_once() {
        assert_eq!(
            legacy_feedback(None, 4, " Good work "),
            Some("Rating: 4/5 - Good work".to_string())
        );
        assert_eq!(legacy_feedback(None, 2, ""), Some("Rating: 2/5".to_string()));
        assert_eq!(legacy_feedback(Some("Rating: 4/5"), 1, "x"), None);
    }

    #[test]
    fn precondition_order() {
        let a = under_review_with(&[("alice", SubmissionStatus::Submitted)]);
        let now = Utc::now();

        // 实习生不能评审，即使评分也不合法
        let err = plan_review(&a, "alice", 9, "", &intern("bob"), now).unwrap_err();
        assert_eq!(err.code(), "E012");

        // 非创建者员工：评分错误先于归属检查
        let other = staff("other", Role::Employee);
        let err = plan_review(&a, "alice", 9, "", &other, now).unwrap_err();
        assert_eq!(err.code(), "E014");
        let err = plan_review(&a, "alice", 3, "", &other, now).unwrap_err();
        assert_eq!(err.code(), "E012");

        let err = plan_review(&a, "nobody", 3, "", &staff("mentor", Role::Employee), now).unwrap_err();
        assert_eq!(err.code(), "E008");
    }

    #[test]
    fn review_of_last_submission_marks_reviewed() {
        let mut a = under_review_with(&[("alice", SubmissionStatus::Submitted)]);
        a.accepts_submissions = true;
        let plan = plan_review(&a, "alice", 4, "Good work", &staff("boss", Role::Admin), Utc::now()).unwrap();

        assert_eq!(plan.record.assignment_status, AssignmentStatus::Reviewed);
        assert!(!plan.record.accepts_submissions);
        assert_eq!(plan.submission.status, SubmissionStatus::Reviewed);
        let review = plan.submission.mentor_review.unwrap();
        assert_eq!((review.rating, review.reviewed_by.as_str()), (4, "boss"));
        assert_eq!(plan.record.mentor_feedback.as_deref(), Some("Rating: 4/5 - Good work"));
    }

    #[test]
    fn partial_review_keeps_under_review() {
        let mut a = under_review_with(&[
            ("alice", SubmissionStatus::Submitted),
            ("bob", SubmissionStatus::Submitted),
        ]);
        a.accepts_submissions = true;
        a.mentor_feedback = Some("Rating: 5/5".into());
        let plan = plan_review(&a, "bob", 2, "", &staff("mentor", Role::Employee), Utc::now()).unwrap();
        assert_eq!(plan.record.assignment_status, AssignmentStatus::UnderReview);
        assert!(plan.record.accepts_submissions);
        assert!(plan.record.mentor_feedback.is_none());
    }
}

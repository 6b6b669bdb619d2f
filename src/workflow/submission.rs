//! 提交资格与内容校验
//!
//! 资格检查按固定顺序进行，每一步都是独立的失败原因。

use chrono::{DateTime, Utc};

use crate::errors::{InternHubError, Result};
use crate::models::accounts::entities::{AccountInfo, InternAccount};
use crate::models::assignments::entities::Assignment;
use crate::models::submissions::entities::SubmissionType;
use crate::models::submissions::requests::{FilePayload, SubmissionPayload};
use crate::utils::file_magic::is_pdf;
use crate::utils::validate::is_absolute_url;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// 校验后的提交内容
#[derive(Debug, Clone)]
pub enum ValidatedPayload {
    Link(String),
    Pdf(FilePayload),
}

/// 提交资格（实习生已在实习生分区中解析）
///
/// `addressed` 表示作业是否分发给了该实习生。
pub fn check_eligibility(
    assignment: &Assignment,
    intern: &InternAccount,
    addressed: bool,
    submission_type: SubmissionType,
    now: DateTime<Utc>,
) -> Result<()> {
    if !intern.same_organization(&assignment.organization_id, &assignment.organization_name)
        || !addressed
    {
        return Err(InternHubError::unauthorized(format!(
            "'{}' is not authorized to submit to assignment {}",
            intern.username, assignment.id
        )));
    }

    if !assignment.accepts_submissions() {
        return Err(InternHubError::precondition_failed(
            "assignment is not accepting submissions",
        ));
    }

    if !assignment.status().is_open_for_submissions() {
        return Err(InternHubError::precondition_failed(format!(
            "assignment is {}, submissions are closed",
            assignment.status()
        )));
    }

    if !assignment.allow_late_submission && is_past_deadline(assignment, now) {
        return Err(InternHubError::precondition_failed("deadline passed"));
    }

    if assignment.submission_of(&intern.username).is_some() {
        return Err(InternHubError::precondition_failed("already submitted"));
    }

    if !assignment.allows_type(submission_type) {
        return Err(InternHubError::precondition_failed(format!(
            "submission type '{submission_type}' is not allowed for this assignment"
        )));
    }

    Ok(())
}

/// 按提交类型校验内容
pub fn validate_payload(assignment: &Assignment, payload: SubmissionPayload) -> Result<ValidatedPayload> {
    match payload.submission_type {
        SubmissionType::Link => {
            let url = payload.content.unwrap_or_default().trim().to_string();
            if url.is_empty() || !is_absolute_url(&url) {
                return Err(InternHubError::precondition_failed("invalid URL"));
            }
            Ok(ValidatedPayload::Link(url))
        }
        SubmissionType::Pdf => {
            let Some(file) = payload.file else {
                return Err(InternHubError::precondition_failed(
                    "a PDF file is required for pdf submissions",
                ));
            };
            let content_type = file
                .content_type
                .split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .to_ascii_lowercase();
            if content_type != PDF_CONTENT_TYPE {
                return Err(InternHubError::precondition_failed(format!(
                    "file must be {PDF_CONTENT_TYPE}, got '{}'",
                    file.content_type
                )));
            }
            if file.size() as i64 > assignment.max_file_size {
                return Err(InternHubError::precondition_failed(format!(
                    "file exceeds the maximum size of {} bytes",
                    assignment.max_file_size
                )));
            }
            if !is_pdf(&file.bytes) {
                return Err(InternHubError::precondition_failed(
                    "file content is not a PDF document",
                ));
            }
            Ok(ValidatedPayload::Pdf(file))
        }
    }
}

pub fn is_past_deadline(assignment: &Assignment, now: DateTime<Utc>) -> bool {
    assignment.deadline.is_some_and(|deadline| now > deadline)
}

/// 迟交标记：只有允许迟交的作业才可能为真
pub fn is_late(assignment: &Assignment, now: DateTime<Utc>) -> bool {
    assignment.allow_late_submission && is_past_deadline(assignment, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assignments::entities::AssignmentStatus;
    use crate::models::submissions::entities::SubmissionStatus;
    use crate::workflow::testing::{assignment, intern_account, submission};
    use chrono::Duration;

    fn open() -> Assignment {
        assignment(AssignmentStatus::Posted)
    }

    fn pdf(bytes: &[u8], content_type: &str) -> SubmissionPayload {
        SubmissionPayload::pdf(FilePayload {
            file_name: "report.pdf".into(),
            content_type: content_type.into(),
            bytes: bytes.to_vec(),
        })
    }

    #[test]
    fn eligible_intern_passes() {
        let a = open();
        let alice = intern_account("alice");
        assert!(check_eligibility(&a, &alice, true, SubmissionType::Link, Utc::now()).is_ok());
    }

    #[test]
    fn checks_run_in_order() {
        let now = Utc::now();
        let alice = intern_account("alice");

        // 组织不匹配优先于其它原因
        let mut a = open();
        a.organization_id = "org-9".into();
        a.accepts_submissions = false;
        let err = check_eligibility(&a, &alice, true, SubmissionType::Link, now).unwrap_err();
        assert_eq!(err.code(), "E012");

        let err = check_eligibility(&open(), &alice, false, SubmissionType::Link, now).unwrap_err();
        assert_eq!(err.code(), "E012");

        let mut a = open();
        a.accepts_submissions = false;
        let err = check_eligibility(&a, &alice, true, SubmissionType::Link, now).unwrap_err();
        assert!(err.message().contains("not accepting"));

        let mut a = assignment(AssignmentStatus::Reviewed);
        a.accepts_submissions = true;
        let err = check_eligibility(&a, &alice, true, SubmissionType::Link, now).unwrap_err();
        assert!(err.message().contains("closed"));

        let mut a = open();
        a.deadline = Some(now - Duration::hours(1));
        a.submissions.push(submission("alice", SubmissionStatus::Submitted));
        let err = check_eligibility(&a, &alice, true, SubmissionType::Link, now).unwrap_err();
        assert_eq!(err.message(), "deadline passed");

        let mut a = open();
        a.submissions.push(submission("alice", SubmissionStatus::Submitted));
        let err = check_eligibility(&a, &alice, true, SubmissionType::Link, now).unwrap_err();
        assert_eq!(err.message(), "already submitted");

        let mut a = open();
        a.allowed_submission_types = vec![SubmissionType::Link];
        let err = check_eligibility(&a, &alice, true, SubmissionType::Pdf, now).unwrap_err();
        assert!(err.message().contains("'pdf' is not allowed"));
    }

    #[test]
    fn late_submissions_only_when_allowed() {
        let now = Utc::now();
        let alice = intern_account("alice");
        let mut a = open();
        a.deadline = Some(now - Duration::minutes(5));
        assert!(!is_late(&a, now));

        a.allow_late_submission = true;
        assert!(check_eligibility(&a, &alice, true, SubmissionType::Link, now).is_ok());
        assert!(is_late(&a, now));

        a.deadline = Some(now + Duration::minutes(5));
        assert!(!is_late(&a, now));
    }

    #[test]
    fn link_must_be_absolute_url() {
        let a = open();
        assert!(matches!(
            validate_payload(&a, SubmissionPayload::link(" https://github.com/alice/repo ")),
            Ok(ValidatedPayload::Link(url)) if url == "https://github.com/alice/repo"
        ));
        // 任意协议只要带主机名即可
        assert!(matches!(
            validate_payload(&a, SubmissionPayload::link("ftp://files.example.com/x")),
            Ok(ValidatedPayload::Link(_))
        ));
        for bad in ["", "   ", "github.com/alice", "/relative/path", "https://"] {
            let err = validate_payload(&a, SubmissionPayload::link(bad)).unwrap_err();
            assert_eq!(err.message(), "invalid URL", "accepted {bad:?}");
        }
    }

    #[test]
    fn pdf_checks_type_size_and_magic() {
        let mut a = open();
        a.max_file_size = 16;

        assert!(validate_payload(&a, pdf(b"%PDF-1.4 small", "application/pdf")).is_ok());
        assert!(validate_payload(&a, pdf(b"%PDF-1.4", "application/pdf; charset=binary")).is_ok());

        let err = validate_payload(&a, pdf(b"%PDF-1.4", "image/png")).unwrap_err();
        assert!(err.message().contains("application/pdf"));

        let err = validate_payload(&a, pdf(b"%PDF-1.4 far too large", "application/pdf")).unwrap_err();
        assert!(err.message().contains("16 bytes"));

        let err = validate_payload(&a, pdf(b"GIF89a", "application/pdf")).unwrap_err();
        assert!(err.message().contains("not a PDF"));

        let missing = SubmissionPayload {
            submission_type: SubmissionType::Pdf,
            content: None,
            file: None,
        };
        assert_eq!(validate_payload(&a, missing).unwrap_err().code(), "E014");
    }
}

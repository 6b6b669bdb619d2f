use chrono::{Duration, Utc};
use sea_orm::{ConnectOptions, Database};

use super::SeaOrmStorage;
use crate::errors::InternHubError;
use crate::models::accounts::entities::Role;
use crate::models::assignments::entities::{AssignedTo, AssignmentStatus};
use crate::models::assignments::requests::AssignmentListQuery;
use crate::models::notifications::entities::{NewNotification, NotificationKind};
use crate::models::submissions::entities::{MentorReview, SubmissionStatus, SubmissionType};
use crate::models::teams::entities::TeamRole;
use crate::storage::{
    AssignmentChanges, AssignmentScope, NewAssignment, NewInternAccount, NewStaffAccount,
    NewSubmission, NewTeam, ReviewRecord, StatusChange, Storage, SubmissionInsert,
};

async fn storage() -> SeaOrmStorage {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).sqlx_logging(false);
    let db = Database::connect(opt).await.unwrap();
    let storage = SeaOrmStorage::with_connection(db).await.unwrap();

    storage
        .create_staff_account_if_absent(NewStaffAccount {
            username: "mentor".into(),
            email: None,
            display_name: Some("Mentor".into()),
            role: Role::Employee,
            organization_id: "org-1".into(),
            organization_name: "Acme".into(),
        })
        .await
        .unwrap();
    for name in ["alice", "bob"] {
        storage
            .create_intern_account_if_absent(NewInternAccount {
                username: name.into(),
                email: None,
                display_name: None,
                organization_id: "org-1".into(),
                organization_name: "Acme".into(),
            })
            .await
            .unwrap();
    }
    storage
        .create_team_if_absent(NewTeam {
            team_name: "core".into(),
            organization_id: "org-1".into(),
            organization_name: "Acme".into(),
            members: vec![
                ("mentor".into(), TeamRole::Mentor),
                ("alice".into(), TeamRole::Intern),
                ("bob".into(), TeamRole::Intern),
            ],
        })
        .await
        .unwrap();
    storage
}

fn new_assignment(name: &str, assigned_to: AssignedTo) -> NewAssignment {
    let now = Utc::now();
    NewAssignment {
        organization_id: "org-1".into(),
        organization_name: "Acme".into(),
        team_name: "core".into(),
        assignment_from: "mentor".into(),
        assignment_name: name.into(),
        description: None,
        instructions: None,
        assigned_to,
        deadline: Some(now + Duration::days(7)),
        max_file_size: 1_048_576,
        allowed_submission_types: vec![SubmissionType::Link, SubmissionType::Pdf],
        allow_late_submission: false,
        created_at: now,
    }
}

fn open_change(status: AssignmentStatus) -> StatusChange {
    StatusChange {
        status,
        accepts_submissions: status.is_open_for_submissions(),
        updated_at: Utc::now(),
    }
}

fn link_submission(assignment_id: i64, intern: &str) -> NewSubmission {
    NewSubmission {
        assignment_id,
        intern_username: intern.into(),
        submission_type: SubmissionType::Link,
        submission_content: Some("https://example.com/work".into()),
        file_url: None,
        file_name: None,
        submitted_at: Utc::now(),
        is_late_submission: false,
    }
}

fn intern_scope(username: &str, teams: &[&str]) -> AssignmentScope {
    AssignmentScope::Intern {
        organization_id: "org-1".into(),
        organization_name: "Acme".into(),
        username: username.into(),
        team_names: teams.iter().map(|t| t.to_string()).collect(),
    }
}

#[tokio::test]
async fn directory_records_are_created_once() {
    let storage = storage().await;

    let again = storage
        .create_intern_account_if_absent(NewInternAccount {
            username: "alice".into(),
            email: None,
            display_name: None,
            organization_id: "org-1".into(),
            organization_name: "Acme".into(),
        })
        .await
        .unwrap();
    assert!(!again);

    let team = storage.get_team("core", "org-1").await.unwrap().unwrap();
    assert_eq!(team.mentors, vec!["mentor".to_string()]);
    assert_eq!(team.interns.len(), 2);
    assert!(storage.get_team("core", "org-2").await.unwrap().is_none());
    assert_eq!(
        storage.list_intern_team_names("alice", "org-1").await.unwrap(),
        vec!["core".to_string()]
    );
}

#[tokio::test]
async fn created_assignment_starts_pending() {
    let storage = storage().await;
    let created = storage
        .create_assignment(new_assignment(
            "Week 1",
            AssignedTo::Interns(vec!["alice".into()]),
        ))
        .await
        .unwrap();

    let loaded = storage.get_assignment(created.id).await.unwrap().unwrap();
    assert_eq!(loaded.status(), AssignmentStatus::Pending);
    assert!(!loaded.accepts_submissions());
    assert_eq!(loaded.revision(), 0);
    assert_eq!(
        loaded.assigned_to,
        AssignedTo::Interns(vec!["alice".into()])
    );
    assert!(storage.get_assignment(created.id + 1).await.unwrap().is_none());
}

#[tokio::test]
async fn status_change_is_compare_and_swap() {
    let storage = storage().await;
    let id = storage
        .create_assignment(new_assignment("Week 1", AssignedTo::All))
        .await
        .unwrap()
        .id;

    assert!(
        storage
            .apply_status_change(id, 0, open_change(AssignmentStatus::Posted))
            .await
            .unwrap()
    );
    // 旧 revision 的写入被拒绝
    assert!(
        !storage
            .apply_status_change(id, 0, open_change(AssignmentStatus::Completed))
            .await
            .unwrap()
    );

    let loaded = storage.get_assignment(id).await.unwrap().unwrap();
    assert_eq!(loaded.status(), AssignmentStatus::Posted);
    assert!(loaded.accepts_submissions());
    assert_eq!(loaded.revision(), 1);
}

#[tokio::test]
async fn details_update_replaces_assignees() {
    let storage = storage().await;
    let id = storage
        .create_assignment(new_assignment("Week 1", AssignedTo::All))
        .await
        .unwrap()
        .id;

    let changes = AssignmentChanges {
        assignment_name: Some("Week 1 (revised)".into()),
        assigned_to: Some(AssignedTo::Interns(vec!["bob".into()])),
        updated_at: Utc::now(),
        ..Default::default()
    };
    assert!(storage.update_assignment_details(id, 0, changes.clone()).await.unwrap());
    assert!(!storage.update_assignment_details(id, 0, changes).await.unwrap());

    let loaded = storage.get_assignment(id).await.unwrap().unwrap();
    assert_eq!(loaded.assignment_name, "Week 1 (revised)");
    assert_eq!(loaded.assigned_to, AssignedTo::Interns(vec!["bob".into()]));
    assert_eq!(loaded.revision(), 1);
}

#[tokio::test]
async fn submission_insert_guards_state_and_uniqueness() {
    let storage = storage().await;
    let id = storage
        .create_assignment(new_assignment("Week 1", AssignedTo::All))
        .await
        .unwrap()
        .id;

    // pending 作业不接收提交
    assert_eq!(
        storage.insert_submission(link_submission(id, "alice")).await.unwrap(),
        SubmissionInsert::Closed
    );

    storage
        .apply_status_change(id, 0, open_change(AssignmentStatus::Posted))
        .await
        .unwrap();
    assert!(matches!(
        storage.insert_submission(link_submission(id, "alice")).await.unwrap(),
        SubmissionInsert::Inserted(_)
    ));
    assert_eq!(
        storage.insert_submission(link_submission(id, "alice")).await.unwrap(),
        SubmissionInsert::Duplicate
    );

    let loaded = storage.get_assignment(id).await.unwrap().unwrap();
    assert_eq!(loaded.status(), AssignmentStatus::UnderReview);
    assert_eq!(loaded.revision(), 2);
    assert_eq!(loaded.submissions().len(), 1);
    assert_eq!(
        loaded.submission_of("alice").unwrap().status,
        SubmissionStatus::Submitted
    );
}

#[tokio::test]
async fn submission_insert_rechecks_types_and_deadline() {
    let storage = storage().await;
    let id = storage
        .create_assignment(new_assignment("Week 1", AssignedTo::All))
        .await
        .unwrap()
        .id;
    storage
        .apply_status_change(id, 0, open_change(AssignmentStatus::Posted))
        .await
        .unwrap();

    // 校验之后类型被收窄为仅 pdf
    let narrowed = AssignmentChanges {
        allowed_submission_types: Some(vec![SubmissionType::Pdf]),
        updated_at: Utc::now(),
        ..Default::default()
    };
    assert!(storage.update_assignment_details(id, 1, narrowed).await.unwrap());
    assert_eq!(
        storage.insert_submission(link_submission(id, "alice")).await.unwrap(),
        SubmissionInsert::Closed
    );

    // 截止时间被提前且不允许迟交
    let moved = AssignmentChanges {
        allowed_submission_types: Some(vec![SubmissionType::Link, SubmissionType::Pdf]),
        deadline: Some(Utc::now() - Duration::hours(1)),
        updated_at: Utc::now(),
        ..Default::default()
    };
    assert!(storage.update_assignment_details(id, 2, moved).await.unwrap());
    assert_eq!(
        storage.insert_submission(link_submission(id, "alice")).await.unwrap(),
        SubmissionInsert::Closed
    );

    let late_ok = AssignmentChanges {
        allow_late_submission: Some(true),
        updated_at: Utc::now(),
        ..Default::default()
    };
    assert!(storage.update_assignment_details(id, 3, late_ok).await.unwrap());
    assert!(matches!(
        storage.insert_submission(link_submission(id, "alice")).await.unwrap(),
        SubmissionInsert::Inserted(_)
    ));

    let loaded = storage.get_assignment(id).await.unwrap().unwrap();
    assert_eq!(loaded.revision(), 5);
    assert_eq!(loaded.status(), AssignmentStatus::UnderReview);
}

#[tokio::test]
async fn review_overwrites_and_checks_revision() {
    let storage = storage().await;
    let id = storage
        .create_assignment(new_assignment("Week 1", AssignedTo::All))
        .await
        .unwrap()
        .id;
    storage
        .apply_status_change(id, 0, open_change(AssignmentStatus::Posted))
        .await
        .unwrap();
    storage
        .insert_submission(link_submission(id, "alice"))
        .await
        .unwrap();

    let record = |rating: i32, feedback: Option<&str>| ReviewRecord {
        intern_username: "alice".into(),
        review: MentorReview {
            rating,
            comments: format!("rated {rating}"),
            reviewed_at: Utc::now(),
            reviewed_by: "mentor".into(),
        },
        assignment_status: AssignmentStatus::UnderReview,
        accepts_submissions: true,
        mentor_feedback: feedback.map(str::to_string),
    };

    assert!(storage.record_review(id, 2, record(3, Some("rated 3"))).await.unwrap());
    assert!(!storage.record_review(id, 2, record(5, None)).await.unwrap());
    assert!(storage.record_review(id, 3, record(5, None)).await.unwrap());

    let loaded = storage.get_assignment(id).await.unwrap().unwrap();
    let submission = loaded.submission_of("alice").unwrap();
    assert_eq!(submission.status, SubmissionStatus::Reviewed);
    assert_eq!(submission.mentor_review.as_ref().unwrap().rating, 5);
    assert_eq!(loaded.mentor_feedback(), Some("rated 3"));

    let mut missing = record(4, None);
    missing.intern_username = "bob".into();
    assert!(matches!(
        storage.record_review(id, 4, missing).await,
        Err(InternHubError::NotFound(_))
    ));
    // 失败的评审不推进 revision
    assert_eq!(storage.get_assignment(id).await.unwrap().unwrap().revision(), 4);
}

#[tokio::test]
async fn intern_scope_hides_pending_and_unaddressed() {
    let storage = storage().await;
    let for_all = storage
        .create_assignment(new_assignment("For everyone", AssignedTo::All))
        .await
        .unwrap()
        .id;
    let for_bob = storage
        .create_assignment(new_assignment(
            "For bob",
            AssignedTo::Interns(vec!["bob".into()]),
        ))
        .await
        .unwrap()
        .id;
    storage
        .create_assignment(new_assignment("Still pending", AssignedTo::All))
        .await
        .unwrap();
    for id in [for_all, for_bob] {
        storage
            .apply_status_change(id, 0, open_change(AssignmentStatus::Posted))
            .await
            .unwrap();
    }

    let alice = storage
        .list_assignments_with_pagination(
            intern_scope("alice", &["core"]),
            AssignmentListQuery::default(),
        )
        .await
        .unwrap();
    let ids: Vec<i64> = alice.items.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![for_all]);

    let bob = storage
        .list_assignments_with_pagination(
            intern_scope("bob", &["core"]),
            AssignmentListQuery::default(),
        )
        .await
        .unwrap();
    assert_eq!(bob.pagination.total, 2);

    let org = storage
        .list_assignments_with_pagination(
            AssignmentScope::Organization {
                organization_id: "org-1".into(),
                organization_name: "Acme".into(),
            },
            AssignmentListQuery::default(),
        )
        .await
        .unwrap();
    assert_eq!(org.pagination.total, 3);
}

#[tokio::test]
async fn search_treats_wildcards_literally() {
    let storage = storage().await;
    storage
        .create_assignment(new_assignment("100% coverage", AssignedTo::All))
        .await
        .unwrap();
    storage
        .create_assignment(new_assignment("1000 lines", AssignedTo::All))
        .await
        .unwrap();

    let scope = AssignmentScope::CreatedBy {
        organization_id: "org-1".into(),
        organization_name: "Acme".into(),
        username: "mentor".into(),
    };
    let found = storage
        .list_assignments_with_pagination(
            scope,
            AssignmentListQuery {
                search: Some("0%".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(found.items.len(), 1);
    assert_eq!(found.items[0].assignment_name, "100% coverage");
}

#[tokio::test]
async fn notifications_are_paged_per_recipient() {
    let storage = storage().await;
    for i in 0..3 {
        storage
            .create_notification(NewNotification {
                recipient: "alice".into(),
                kind: NotificationKind::AssignmentPosted,
                title: format!("Posted {i}"),
                content: String::new(),
                assignment_id: None,
            })
            .await
            .unwrap();
    }
    storage
        .create_notification(NewNotification {
            recipient: "bob".into(),
            kind: NotificationKind::SubmissionReviewed,
            title: "Reviewed".into(),
            content: String::new(),
            assignment_id: Some(1),
        })
        .await
        .unwrap();

    let page = storage
        .list_notifications_with_pagination("alice", 1, 2)
        .await
        .unwrap();
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.pagination.total, 3);
    assert_eq!(page.pagination.total_pages, 2);
    assert!(page.items.iter().all(|n| n.recipient == "alice" && !n.is_read));
}

//! 测试夹具与内存替身
//!
//! `MemoryStorage` 复刻 SeaORM 存储的原子语义：revision 比较交换、
//! 提交的条件更新与唯一约束。

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, Utc};

use crate::errors::{InternHubError, Result};
use crate::file_store::{FileStore, StorageHint, StoredFile};
use crate::models::{
    PaginationInfo,
    accounts::entities::{Account, InternAccount, Role, StaffAccount},
    assignments::{
        entities::{AssignedTo, Assignment, AssignmentStatus},
        requests::AssignmentListQuery,
        responses::AssignmentListResponse,
    },
    common::pagination::clamp_page,
    notifications::{
        entities::{NewNotification, Notification},
        responses::NotificationListResponse,
    },
    submissions::{
        entities::{Submission, SubmissionStatus, SubmissionType},
        requests::FilePayload,
    },
    teams::entities::{Team, TeamRole},
};
use crate::notifier::NotificationSink;
use crate::storage::{
    AssignmentChanges, AssignmentScope, NewAssignment, NewInternAccount, NewStaffAccount,
    NewSubmission, NewTeam, ReviewRecord, StatusChange, Storage, SubmissionInsert,
};

pub const ORG_ID: &str = "org-1";
pub const ORG_NAME: &str = "Acme";

pub fn staff_account(username: &str, role: Role) -> StaffAccount {
    StaffAccount {
        id: 1,
        username: username.to_string(),
        email: None,
        display_name: None,
        role,
        organization_id: ORG_ID.to_string(),
        organization_name: ORG_NAME.to_string(),
        created_at: Utc::now(),
    }
}

pub fn staff(username: &str, role: Role) -> Account {
    Account::Staff(staff_account(username, role))
}

pub fn intern_account(username: &str) -> InternAccount {
    InternAccount {
        id: 1,
        username: username.to_string(),
        email: None,
        display_name: None,
        organization_id: ORG_ID.to_string(),
        organization_name: ORG_NAME.to_string(),
        created_at: Utc::now(),
    }
}

pub fn intern(username: &str) -> Account {
    Account::Intern(intern_account(username))
}

/// "core" 团队：导师 mentor，实习生 alice / bob / carol
pub fn team() -> Team {
    Team {
        id: 1,
        team_name: "core".to_string(),
        organization_id: ORG_ID.to_string(),
        organization_name: ORG_NAME.to_string(),
        mentors: vec!["mentor".to_string()],
        interns: vec!["alice".to_string(), "bob".to_string(), "carol".to_string()],
        panelists: vec!["judge".to_string()],
        created_at: Utc::now(),
    }
}

/// 由 mentor 创建、截止时间在一周后的作业
pub fn assignment(status: AssignmentStatus) -> Assignment {
    let now = Utc::now();
    Assignment {
        id: 1,
        organization_id: ORG_ID.to_string(),
        organization_name: ORG_NAME.to_string(),
        team_name: "core".to_string(),
        assignment_from: "mentor".to_string(),
        assignment_name: "Week 1".to_string(),
        description: None,
        instructions: None,
        assigned_to: AssignedTo::All,
        deadline: Some(now + Duration::days(7)),
        status,
        accepts_submissions: status.is_open_for_submissions(),
        max_file_size: 1_048_576,
        allowed_submission_types: vec![SubmissionType::Link, SubmissionType::Pdf],
        allow_late_submission: false,
        mentor_feedback: None,
        revision: 0,
        submissions: Vec::new(),
        created_at: now,
        updated_at: now,
    }
}

pub fn submission(intern_username: &str, status: SubmissionStatus) -> Submission {
    Submission {
        id: 0,
        assignment_id: 1,
        intern_username: intern_username.to_string(),
        submission_type: SubmissionType::Link,
        submission_content: Some(format!("https://example.com/{intern_username}")),
        file_url: None,
        file_name: None,
        submitted_at: Utc::now(),
        is_late_submission: false,
        status,
        mentor_review: None,
    }
}

pub fn pdf_file(bytes: &[u8]) -> FilePayload {
    FilePayload {
        file_name: "report.pdf".to_string(),
        content_type: "application/pdf".to_string(),
        bytes: bytes.to_vec(),
    }
}

#[derive(Default)]
struct MemoryState {
    staff: Vec<StaffAccount>,
    interns: Vec<InternAccount>,
    teams: Vec<Team>,
    assignments: Vec<Assignment>,
    notifications: Vec<Notification>,
    next_id: i64,
}

impl MemoryState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn assignment_mut(&mut self, id: i64) -> Option<&mut Assignment> {
        self.assignments.iter_mut().find(|a| a.id == id)
    }
}

/// 内存存储，所有写入在一把锁内完成
#[derive(Default)]
pub struct MemoryStorage {
    state: Mutex<MemoryState>,
    // 置位后所有写入失败，模拟数据库故障
    fail_writes: Mutex<bool>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// 带 core 团队与默认账号的组织
    pub fn seeded() -> Self {
        let storage = Self::new();
        {
            let mut state = storage.state.lock().unwrap();
            state.staff.push(staff_account("mentor", Role::Employee));
            state.staff.push(staff_account("other", Role::Employee));
            state.staff.push(staff_account("boss", Role::Admin));
            for name in ["alice", "bob", "carol", "dave"] {
                state.interns.push(intern_account(name));
            }
            let mut outsider = intern_account("eve");
            outsider.organization_id = "org-2".into();
            outsider.organization_name = "Globex".into();
            state.interns.push(outsider);
            state.teams.push(team());
            state.next_id = 100;
        }
        storage
    }

    /// 直接写入作业，绕过创建校验（用于构造截止时间已过等场景）
    pub fn put_assignment(&self, mut assignment: Assignment) -> i64 {
        let mut state = self.state.lock().unwrap();
        assignment.id = state.next_id();
        let id = assignment.id;
        state.assignments.push(assignment);
        id
    }

    pub fn snapshot(&self, id: i64) -> Option<Assignment> {
        let state = self.state.lock().unwrap();
        state.assignments.iter().find(|a| a.id == id).cloned()
    }

    /// 模拟并发写入：revision 前进而内容不变
    pub fn bump_revision(&self, id: i64) {
        let mut state = self.state.lock().unwrap();
        if let Some(a) = state.assignment_mut(id) {
            a.revision += 1;
        }
    }

    pub fn fail_writes(&self, fail: bool) {
        *self.fail_writes.lock().unwrap() = fail;
    }

    fn check_writable(&self) -> Result<()> {
        if *self.fail_writes.lock().unwrap() {
            Err(InternHubError::database_operation("simulated write failure"))
        } else {
            Ok(())
        }
    }
}

fn page_of<T: Clone>(items: &[T], page: Option<i64>, size: Option<i64>) -> (Vec<T>, PaginationInfo) {
    let (page, size) = clamp_page(page, size);
    let start = ((page - 1) * size) as usize;
    let slice = items
        .iter()
        .skip(start)
        .take(size as usize)
        .cloned()
        .collect();
    (slice, PaginationInfo::new(page, size, items.len() as i64))
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get_staff_account(&self, username: &str) -> Result<Option<StaffAccount>> {
        let state = self.state.lock().unwrap();
        Ok(state.staff.iter().find(|a| a.username == username).cloned())
    }

    async fn get_intern_account(&self, username: &str) -> Result<Option<InternAccount>> {
        let state = self.state.lock().unwrap();
        Ok(state.interns.iter().find(|a| a.username == username).cloned())
    }

    async fn create_staff_account_if_absent(&self, account: NewStaffAccount) -> Result<bool> {
        self.check_writable()?;
        let mut state = self.state.lock().unwrap();
        if state.staff.iter().any(|a| a.username == account.username) {
            return Ok(false);
        }
        let id = state.next_id();
        state.staff.push(StaffAccount {
            id,
            username: account.username,
            email: account.email,
            display_name: account.display_name,
            role: account.role,
            organization_id: account.organization_id,
            organization_name: account.organization_name,
            created_at: Utc::now(),
        });
        Ok(true)
    }

    async fn create_intern_account_if_absent(&self, account: NewInternAccount) -> Result<bool> {
        self.check_writable()?;
        let mut state = self.state.lock().unwrap();
        if state.interns.iter().any(|a| a.username == account.username) {
            return Ok(false);
        }
        let id = state.next_id();
        state.interns.push(InternAccount {
            id,
            username: account.username,
            email: account.email,
            display_name: account.display_name,
            organization_id: account.organization_id,
            organization_name: account.organization_name,
            created_at: Utc::now(),
        });
        Ok(true)
    }

    async fn get_team(&self, team_name: &str, organization_id: &str) -> Result<Option<Team>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .teams
            .iter()
            .find(|t| t.team_name == team_name && t.organization_id == organization_id)
            .cloned())
    }

    async fn list_intern_team_names(
        &self,
        username: &str,
        organization_id: &str,
    ) -> Result<Vec<String>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .teams
            .iter()
            .filter(|t| t.organization_id == organization_id && t.has_intern(username))
            .map(|t| t.team_name.clone())
            .collect())
    }

    async fn create_team_if_absent(&self, team: NewTeam) -> Result<bool> {
        self.check_writable()?;
        let mut state = self.state.lock().unwrap();
        if state
            .teams
            .iter()
            .any(|t| t.team_name == team.team_name && t.organization_id == team.organization_id)
        {
            return Ok(false);
        }
        let id = state.next_id();
        let mut created = Team {
            id,
            team_name: team.team_name,
            organization_id: team.organization_id,
            organization_name: team.organization_name,
            mentors: Vec::new(),
            interns: Vec::new(),
            panelists: Vec::new(),
            created_at: Utc::now(),
        };
        for (username, role) in team.members {
            match role {
                TeamRole::Mentor => created.mentors.push(username),
                TeamRole::Intern => created.interns.push(username),
                TeamRole::Panelist => created.panelists.push(username),
            }
        }
        state.teams.push(created);
        Ok(true)
    }

    async fn create_assignment(&self, new: NewAssignment) -> Result<Assignment> {
        self.check_writable()?;
        let mut state = self.state.lock().unwrap();
        let assignment = Assignment {
            id: state.next_id(),
            organization_id: new.organization_id,
            organization_name: new.organization_name,
            team_name: new.team_name,
            assignment_from: new.assignment_from,
            assignment_name: new.assignment_name,
            description: new.description,
            instructions: new.instructions,
            assigned_to: new.assigned_to,
            deadline: new.deadline,
            status: AssignmentStatus::Pending,
            accepts_submissions: false,
            max_file_size: new.max_file_size,
            allowed_submission_types: new.allowed_submission_types,
            allow_late_submission: new.allow_late_submission,
            mentor_feedback: None,
            revision: 0,
            submissions: Vec::new(),
            created_at: new.created_at,
            updated_at: new.created_at,
        };
        state.assignments.push(assignment.clone());
        Ok(assignment)
    }

    async fn get_assignment(&self, id: i64) -> Result<Option<Assignment>> {
        Ok(self.snapshot(id))
    }

    async fn list_assignments_with_pagination(
        &self,
        scope: AssignmentScope,
        query: AssignmentListQuery,
    ) -> Result<AssignmentListResponse> {
        let state = self.state.lock().unwrap();
        let mut matched: Vec<Assignment> = state
            .assignments
            .iter()
            .filter(|a| match &scope {
                AssignmentScope::Organization {
                    organization_id,
                    organization_name,
                } => &a.organization_id == organization_id && &a.organization_name == organization_name,
                AssignmentScope::CreatedBy {
                    organization_id,
                    organization_name,
                    username,
                } => {
                    &a.organization_id == organization_id
                        && &a.organization_name == organization_name
                        && &a.assignment_from == username
                }
                AssignmentScope::Intern {
                    organization_id,
                    organization_name,
                    username,
                    team_names,
                } => {
                    &a.organization_id == organization_id
                        && &a.organization_name == organization_name
                        && a.status.is_intern_visible()
                        && match &a.assigned_to {
                            AssignedTo::All => team_names.contains(&a.team_name),
                            AssignedTo::Interns(list) => list.contains(username),
                        }
                }
            })
            .filter(|a| query.status.is_none_or(|s| a.status == s))
            .filter(|a| {
                query
                    .team_name
                    .as_ref()
                    .is_none_or(|t| t.trim().is_empty() || a.team_name == t.trim())
            })
            .filter(|a| {
                query
                    .search
                    .as_ref()
                    .is_none_or(|s| a.assignment_name.contains(s.trim()))
            })
            .cloned()
            .collect();
        matched.sort_by(|x, y| y.created_at.cmp(&x.created_at).then(y.id.cmp(&x.id)));

        let (items, pagination) = page_of(&matched, query.page, query.size);
        Ok(AssignmentListResponse { items, pagination })
    }

    async fn update_assignment_details(
        &self,
        id: i64,
        expected_revision: i64,
        changes: AssignmentChanges,
    ) -> Result<bool> {
        self.check_writable()?;
        let mut state = self.state.lock().unwrap();
        let Some(a) = state.assignment_mut(id) else {
            return Ok(false);
        };
        if a.revision != expected_revision {
            return Ok(false);
        }
        if let Some(v) = changes.assignment_name {
            a.assignment_name = v;
        }
        if let Some(v) = changes.description {
            a.description = Some(v);
        }
        if let Some(v) = changes.instructions {
            a.instructions = Some(v);
        }
        if let Some(v) = changes.assigned_to {
            a.assigned_to = v;
        }
        if let Some(v) = changes.deadline {
            a.deadline = Some(v);
        }
        if let Some(v) = changes.max_file_size {
            a.max_file_size = v;
        }
        if let Some(v) = changes.allowed_submission_types {
            a.allowed_submission_types = v;
        }
        if let Some(v) = changes.allow_late_submission {
            a.allow_late_submission = v;
        }
        a.revision += 1;
        a.updated_at = changes.updated_at;
        Ok(true)
    }

    async fn apply_status_change(
        &self,
        id: i64,
        expected_revision: i64,
        change: StatusChange,
    ) -> Result<bool> {
        self.check_writable()?;
        let mut state = self.state.lock().unwrap();
        match state.assignment_mut(id) {
            Some(a) if a.revision == expected_revision => {
                a.status = change.status;
                a.accepts_submissions = change.accepts_submissions;
                a.updated_at = change.updated_at;
                a.revision += 1;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn insert_submission(&self, new: NewSubmission) -> Result<SubmissionInsert> {
        self.check_writable()?;
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        let Some(a) = state.assignment_mut(new.assignment_id) else {
            return Ok(SubmissionInsert::Closed);
        };
        let past_deadline = a
            .deadline
            .is_some_and(|deadline| new.submitted_at > deadline && !a.allow_late_submission);
        if !a.accepts_submissions
            || !a.status.is_open_for_submissions()
            || !a.allows_type(new.submission_type)
            || past_deadline
        {
            return Ok(SubmissionInsert::Closed);
        }
        if a.submission_of(&new.intern_username).is_some() {
            return Ok(SubmissionInsert::Duplicate);
        }
        a.status = AssignmentStatus::UnderReview;
        a.revision += 1;
        a.updated_at = new.submitted_at;
        a.submissions.push(Submission {
            id,
            assignment_id: new.assignment_id,
            intern_username: new.intern_username,
            submission_type: new.submission_type,
            submission_content: new.submission_content,
            file_url: new.file_url,
            file_name: new.file_name,
            submitted_at: new.submitted_at,
            is_late_submission: new.is_late_submission,
            status: SubmissionStatus::Submitted,
            mentor_review: None,
        });
        Ok(SubmissionInsert::Inserted(id))
    }

    async fn record_review(
        &self,
        assignment_id: i64,
        expected_revision: i64,
        record: ReviewRecord,
    ) -> Result<bool> {
        self.check_writable()?;
        let mut state = self.state.lock().unwrap();
        let Some(a) = state.assignment_mut(assignment_id) else {
            return Ok(false);
        };
        if a.revision != expected_revision {
            return Ok(false);
        }
        let Some(sub) = a
            .submissions
            .iter_mut()
            .find(|s| s.intern_username == record.intern_username)
        else {
            return Err(InternHubError::not_found("submission not found"));
        };
        sub.status = SubmissionStatus::Reviewed;
        sub.mentor_review = Some(record.review.clone());
        a.status = record.assignment_status;
        a.accepts_submissions = record.accepts_submissions;
        if let Some(feedback) = record.mentor_feedback {
            a.mentor_feedback = Some(feedback);
        }
        a.updated_at = record.review.reviewed_at;
        a.revision += 1;
        Ok(true)
    }

    async fn create_notification(&self, new: NewNotification) -> Result<Notification> {
        self.check_writable()?;
        let mut state = self.state.lock().unwrap();
        let notification = Notification {
            id: state.next_id(),
            recipient: new.recipient,
            kind: new.kind,
            title: new.title,
            content: new.content,
            assignment_id: new.assignment_id,
            is_read: false,
            created_at: Utc::now(),
        };
        state.notifications.push(notification.clone());
        Ok(notification)
    }

    async fn list_notifications_with_pagination(
        &self,
        recipient: &str,
        page: i64,
        size: i64,
    ) -> Result<NotificationListResponse> {
        let state = self.state.lock().unwrap();
        let mine: Vec<Notification> = state
            .notifications
            .iter()
            .rev()
            .filter(|n| n.recipient == recipient)
            .cloned()
            .collect();
        let (items, pagination) = page_of(&mine, Some(page), Some(size));
        Ok(NotificationListResponse { items, pagination })
    }
}

/// 记录存取的内存文件存储
#[derive(Default)]
pub struct MemoryFileStore {
    pub stored: Mutex<Vec<StoredFile>>,
    pub removed: Mutex<Vec<StoredFile>>,
    pub fail: Mutex<bool>,
}

impl MemoryFileStore {
    pub fn failing() -> Self {
        let store = Self::default();
        *store.fail.lock().unwrap() = true;
        store
    }

    pub fn stored_count(&self) -> usize {
        self.stored.lock().unwrap().len()
    }

    pub fn removed_count(&self) -> usize {
        self.removed.lock().unwrap().len()
    }
}

#[async_trait]
impl FileStore for MemoryFileStore {
    async fn put(&self, file: &FilePayload, hint: &StorageHint) -> Result<StoredFile> {
        if *self.fail.lock().unwrap() {
            return Err(InternHubError::storage_failure("disk full"));
        }
        let stored_name = format!("{}-{}.pdf", hint.assignment_id, hint.intern_username);
        let stored = StoredFile {
            file_url: format!("/uploads/{stored_name}"),
            file_name: file.file_name.clone(),
            stored_name,
        };
        self.stored.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn remove(&self, stored: &StoredFile) -> Result<()> {
        self.removed.lock().unwrap().push(stored.clone());
        Ok(())
    }
}

/// 只记录不投递的通知接收端
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<NewNotification>>,
}

impl RecordingNotifier {
    pub fn recipients(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|n| n.recipient.clone())
            .collect()
    }
}

impl NotificationSink for RecordingNotifier {
    fn notify(&self, notification: NewNotification) {
        self.sent.lock().unwrap().push(notification);
    }
}

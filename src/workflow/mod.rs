//! 作业工作流核心
//!
//! - `transition`: 状态流转表与目标状态校验
//! - `submission`: 提交资格与内容校验
//! - `review`: 评分校验与评审后状态推导
//! - `access`: 组织 / 团队 / 归属范围内的访问规则
//! - `directory`: 账号目录
//!
//! [`AssignmentWorkflow`] 负责把这些纯规则与存储、文件存储、通知串起来。
//! 所有状态变更都以单次条件写入落库，竞争失败返回 `Conflict`。

pub mod access;
pub mod directory;
pub mod review;
pub mod submission;
pub mod transition;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};

pub use directory::AccountDirectory;

use crate::config::AppConfig;
use crate::errors::{InternHubError, Result};
use crate::file_store::{FileStore, StorageHint, StoredFile};
use crate::models::{
    accounts::entities::{Account, AccountInfo, Role},
    assignments::{
        entities::{AssignedTo, Assignment, AssignmentStatus},
        requests::{AssignmentListQuery, CreateAssignmentRequest, UpdateAssignmentRequest},
        responses::{AssignmentListResponse, TransitionResponse},
    },
    notifications::entities::{NewNotification, NotificationKind},
    submissions::{
        entities::{Submission, SubmissionStatus, SubmissionType},
        requests::SubmissionPayload,
    },
    teams::entities::Team,
};
use crate::notifier::NotificationSink;
use crate::storage::{
    AssignmentChanges, AssignmentScope, NewAssignment, NewSubmission, Storage, SubmissionInsert,
};

use submission::ValidatedPayload;

/// 作业字段的默认值与上限
#[derive(Debug, Clone)]
pub struct WorkflowLimits {
    pub default_max_file_size: i64,
    pub default_submission_types: Vec<SubmissionType>,
    // 上传硬上限，作业的 max_file_size 不得超过
    pub max_upload_size: i64,
}

impl Default for WorkflowLimits {
    fn default() -> Self {
        Self {
            default_max_file_size: 1_048_576,
            default_submission_types: vec![SubmissionType::Link, SubmissionType::Pdf],
            max_upload_size: 10 * 1_048_576,
        }
    }
}

impl WorkflowLimits {
    pub fn from_config() -> Self {
        let config = AppConfig::get();
        let mut types = Vec::new();
        for raw in &config.workflow.default_submission_types {
            match raw.parse::<SubmissionType>() {
                Ok(t) if !types.contains(&t) => types.push(t),
                Ok(_) => {}
                Err(e) => warn!("Ignoring default submission type: {}", e),
            }
        }
        if types.is_empty() {
            types = Self::default().default_submission_types;
        }
        Self {
            default_max_file_size: config.workflow.default_max_file_size,
            default_submission_types: types,
            max_upload_size: config.upload.max_size as i64,
        }
    }
}

fn log_failure(operation: &str, assignment_id: i64, err: &InternHubError) {
    if err.is_business_rejection() {
        warn!(
            "{} rejected for assignment {}: {}",
            operation, assignment_id, err
        );
    } else {
        error!(
            "{} failed for assignment {}: {}",
            operation, assignment_id, err
        );
    }
}

fn conflict(assignment_id: i64) -> InternHubError {
    InternHubError::conflict(format!(
        "assignment {assignment_id} was modified concurrently, please retry"
    ))
}

pub struct AssignmentWorkflow {
    storage: Arc<dyn Storage>,
    directory: AccountDirectory,
    file_store: Arc<dyn FileStore>,
    notifier: Arc<dyn NotificationSink>,
    limits: WorkflowLimits,
}

impl AssignmentWorkflow {
    pub fn new(
        storage: Arc<dyn Storage>,
        directory: AccountDirectory,
        file_store: Arc<dyn FileStore>,
        notifier: Arc<dyn NotificationSink>,
        limits: WorkflowLimits,
    ) -> Self {
        Self {
            storage,
            directory,
            file_store,
            notifier,
            limits,
        }
    }

    pub fn directory(&self) -> &AccountDirectory {
        &self.directory
    }

    pub fn limits(&self) -> &WorkflowLimits {
        &self.limits
    }

    async fn load(&self, id: i64) -> Result<Assignment> {
        self.storage
            .get_assignment(id)
            .await?
            .ok_or_else(|| InternHubError::not_found(format!("assignment {id} not found")))
    }

    async fn team_of(&self, assignment: &Assignment) -> Result<Option<Team>> {
        self.storage
            .get_team(&assignment.team_name, &assignment.organization_id)
            .await
    }

    /// 只有 "all" 分发才需要团队成员表
    async fn is_addressed(&self, assignment: &Assignment, intern_username: &str) -> Result<bool> {
        let team = match assignment.assigned_to {
            AssignedTo::All => self.team_of(assignment).await?,
            AssignedTo::Interns(_) => None,
        };
        Ok(access::is_addressed_to(assignment, intern_username, team.as_ref()))
    }

    fn check_max_file_size(&self, size: i64) -> Result<()> {
        if size < 1 || size > self.limits.max_upload_size {
            return Err(InternHubError::validation(format!(
                "max_file_size must be between 1 and {} bytes",
                self.limits.max_upload_size
            )));
        }
        Ok(())
    }

    fn normalize_types(types: Vec<SubmissionType>) -> Result<Vec<SubmissionType>> {
        let mut unique = Vec::with_capacity(types.len());
        for t in types {
            if !unique.contains(&t) {
                unique.push(t);
            }
        }
        if unique.is_empty() {
            return Err(InternHubError::validation(
                "allowed_submission_types must not be empty",
            ));
        }
        Ok(unique)
    }

    fn check_assignees(assigned_to: &AssignedTo, team: &Team) -> Result<()> {
        let AssignedTo::Interns(list) = assigned_to else {
            return Ok(());
        };
        if list.is_empty() {
            return Err(InternHubError::validation(
                "assigned_to must be \"all\" or a non-empty list of interns",
            ));
        }
        if let Some(stranger) = list.iter().find(|u| !team.has_intern(u)) {
            return Err(InternHubError::validation(format!(
                "'{stranger}' is not an intern of team '{}'",
                team.team_name
            )));
        }
        Ok(())
    }

    /// 新作业总是 pending 且不接收提交
    pub async fn create_assignment(
        &self,
        req: CreateAssignmentRequest,
        actor: &Account,
    ) -> Result<Assignment> {
        let result = self.create_assignment_inner(req, actor).await;
        match &result {
            Ok(a) => info!(
                "Assignment {} created by {} in team '{}'",
                a.id, a.assignment_from, a.team_name
            ),
            Err(e) => log_failure("create", 0, e),
        }
        result
    }

    async fn create_assignment_inner(
        &self,
        req: CreateAssignmentRequest,
        actor: &Account,
    ) -> Result<Assignment> {
        let Some(staff) = actor.as_staff() else {
            return Err(InternHubError::unauthorized(
                "only staff accounts may create assignments",
            ));
        };

        let team_name = req.team_name.trim();
        let team = self
            .storage
            .get_team(team_name, &staff.organization_id)
            .await?
            .ok_or_else(|| InternHubError::not_found(format!("team '{team_name}' not found")))?;
        access::authorize_create(actor, &team)?;

        let assignment_name = req.assignment_name.trim().to_string();
        if assignment_name.is_empty() {
            return Err(InternHubError::validation("assignment_name must not be empty"));
        }

        let now = Utc::now();
        if let Some(deadline) = req.deadline
            && deadline <= now
        {
            return Err(InternHubError::precondition_failed(
                "deadline must be in the future",
            ));
        }

        let max_file_size = req.max_file_size.unwrap_or(self.limits.default_max_file_size);
        self.check_max_file_size(max_file_size)?;
        let allowed_submission_types = Self::normalize_types(
            req.allowed_submission_types
                .unwrap_or_else(|| self.limits.default_submission_types.clone()),
        )?;
        let assigned_to = req.assigned_to.unwrap_or_default();
        Self::check_assignees(&assigned_to, &team)?;

        self.storage
            .create_assignment(NewAssignment {
                organization_id: staff.organization_id.clone(),
                organization_name: staff.organization_name.clone(),
                team_name: team.team_name.clone(),
                assignment_from: staff.username.clone(),
                assignment_name,
                description: req.description,
                instructions: req.instructions,
                assigned_to,
                deadline: req.deadline,
                max_file_size,
                allowed_submission_types,
                allow_late_submission: req.allow_late_submission.unwrap_or(false),
                created_at: now,
            })
            .await
    }

    /// 编辑可编辑字段，状态与是否接收提交不在其中
    pub async fn update_assignment(
        &self,
        id: i64,
        req: UpdateAssignmentRequest,
        actor: &Account,
    ) -> Result<Assignment> {
        let result = self.update_assignment_inner(id, req, actor).await;
        match &result {
            Ok(a) => info!("Assignment {} updated (revision {})", id, a.revision()),
            Err(e) => log_failure("update", id, e),
        }
        result
    }

    async fn update_assignment_inner(
        &self,
        id: i64,
        req: UpdateAssignmentRequest,
        actor: &Account,
    ) -> Result<Assignment> {
        let assignment = self.load(id).await?;
        access::authorize_manage(actor, &assignment)?;

        if assignment.status() == AssignmentStatus::Completed {
            return Err(InternHubError::precondition_failed(
                "completed assignments cannot be edited",
            ));
        }

        let now = Utc::now();
        let assignment_name = match req.assignment_name {
            Some(name) if name.trim().is_empty() => {
                return Err(InternHubError::validation("assignment_name must not be empty"));
            }
            other => other.map(|n| n.trim().to_string()),
        };
        if let Some(deadline) = req.deadline
            && deadline <= now
        {
            return Err(InternHubError::precondition_failed(
                "deadline must be in the future",
            ));
        }
        if let Some(size) = req.max_file_size {
            self.check_max_file_size(size)?;
        }
        let allowed_submission_types = req
            .allowed_submission_types
            .map(Self::normalize_types)
            .transpose()?;
        if let Some(ref assigned_to) = req.assigned_to {
            let team = self.team_of(&assignment).await?.ok_or_else(|| {
                InternHubError::not_found(format!("team '{}' not found", assignment.team_name))
            })?;
            Self::check_assignees(assigned_to, &team)?;
        }

        let changes = AssignmentChanges {
            assignment_name,
            description: req.description,
            instructions: req.instructions,
            assigned_to: req.assigned_to,
            deadline: req.deadline,
            max_file_size: req.max_file_size,
            allowed_submission_types,
            allow_late_submission: req.allow_late_submission,
            updated_at: now,
        };
        if !self
            .storage
            .update_assignment_details(id, assignment.revision(), changes)
            .await?
        {
            return Err(conflict(id));
        }
        self.load(id).await
    }

    /// 单个作业，实习生视图只含本人提交
    pub async fn get_assignment(&self, id: i64, actor: &Account) -> Result<Assignment> {
        let assignment = self.load(id).await?;
        let team = match (actor, &assignment.assigned_to) {
            (Account::Intern(_), AssignedTo::All) => self.team_of(&assignment).await?,
            _ => None,
        };
        if !access::can_view(actor, &assignment, team.as_ref()) {
            return Err(InternHubError::unauthorized(format!(
                "'{}' is not authorized to view assignment {}",
                actor.username(),
                id
            )));
        }
        Ok(match actor {
            Account::Intern(intern) => assignment.restrict_to_intern(&intern.username),
            Account::Staff(_) => assignment,
        })
    }

    /// 按角色限定范围的分页列表
    pub async fn list_assignments(
        &self,
        query: AssignmentListQuery,
        actor: &Account,
    ) -> Result<AssignmentListResponse> {
        let scope = match actor {
            Account::Staff(staff) if staff.role == Role::Admin => AssignmentScope::Organization {
                organization_id: staff.organization_id.clone(),
                organization_name: staff.organization_name.clone(),
            },
            Account::Staff(staff) => AssignmentScope::CreatedBy {
                organization_id: staff.organization_id.clone(),
                organization_name: staff.organization_name.clone(),
                username: staff.username.clone(),
            },
            Account::Intern(intern) => AssignmentScope::Intern {
                organization_id: intern.organization_id.clone(),
                organization_name: intern.organization_name.clone(),
                username: intern.username.clone(),
                team_names: self
                    .storage
                    .list_intern_team_names(&intern.username, &intern.organization_id)
                    .await?,
            },
        };

        let mut response = self
            .storage
            .list_assignments_with_pagination(scope, query)
            .await?;
        if let Account::Intern(intern) = actor {
            response.items = response
                .items
                .into_iter()
                .map(|a| a.restrict_to_intern(&intern.username))
                .collect();
        }
        Ok(response)
    }

    /// 由操作者发起的状态流转
    pub async fn transition(
        &self,
        id: i64,
        target: AssignmentStatus,
        actor: &Account,
    ) -> Result<TransitionResponse> {
        let result = self.transition_inner(id, target, actor).await;
        match &result {
            Ok(r) => info!(
                "Assignment {} moved {} -> {} by {}",
                id,
                r.old_status,
                r.new_status,
                actor.username()
            ),
            Err(e) => log_failure("transition", id, e),
        }
        result
    }

    async fn transition_inner(
        &self,
        id: i64,
        target: AssignmentStatus,
        actor: &Account,
    ) -> Result<TransitionResponse> {
        let assignment = self.load(id).await?;
        access::authorize_manage(actor, &assignment)?;
        let plan = transition::plan_transition(&assignment, target, Utc::now())?;

        if !self
            .storage
            .apply_status_change(id, assignment.revision(), plan.change.clone())
            .await?
        {
            return Err(conflict(id));
        }

        if matches!(target, AssignmentStatus::Posted | AssignmentStatus::Active) {
            self.notify_addressed_interns(&assignment, target).await;
        }

        Ok(TransitionResponse {
            assignment_id: id,
            old_status: plan.old_status,
            new_status: plan.change.status,
        })
    }

    async fn notify_addressed_interns(&self, assignment: &Assignment, target: AssignmentStatus) {
        let recipients = match &assignment.assigned_to {
            AssignedTo::Interns(list) => list.clone(),
            AssignedTo::All => match self.team_of(assignment).await {
                Ok(Some(team)) => team.interns,
                Ok(None) => Vec::new(),
                Err(e) => {
                    warn!(
                        "Skipping notifications for assignment {}: {}",
                        assignment.id, e
                    );
                    Vec::new()
                }
            },
        };
        let kind = if target == AssignmentStatus::Posted {
            NotificationKind::AssignmentPosted
        } else {
            NotificationKind::AssignmentActivated
        };
        for recipient in recipients {
            self.notifier.notify(NewNotification {
                recipient,
                kind,
                title: format!("New assignment: {}", assignment.assignment_name),
                content: format!(
                    "Assignment '{}' in team '{}' is now {}",
                    assignment.assignment_name, assignment.team_name, target
                ),
                assignment_id: Some(assignment.id),
            });
        }
    }

    /// 实习生提交，每个作业每人一次
    pub async fn submit(
        &self,
        id: i64,
        intern_username: &str,
        payload: SubmissionPayload,
    ) -> Result<Submission> {
        let result = self.submit_inner(id, intern_username, payload).await;
        match &result {
            Ok(s) => info!(
                "Submission {} recorded for assignment {} by {} (late: {})",
                s.id, id, intern_username, s.is_late_submission
            ),
            Err(e) => log_failure("submit", id, e),
        }
        result
    }

    async fn submit_inner(
        &self,
        id: i64,
        intern_username: &str,
        payload: SubmissionPayload,
    ) -> Result<Submission> {
        let assignment = self.load(id).await?;
        let intern = self
            .directory
            .find_intern(intern_username)
            .await?
            .ok_or_else(|| InternHubError::not_found("user not found"))?;

        let now = Utc::now();
        let addressed = self.is_addressed(&assignment, &intern.username).await?;
        submission::check_eligibility(
            &assignment,
            &intern,
            addressed,
            payload.submission_type,
            now,
        )?;
        let validated = submission::validate_payload(&assignment, payload)?;

        let (submission_type, submission_content, stored) = match validated {
            ValidatedPayload::Link(url) => (SubmissionType::Link, Some(url), None),
            ValidatedPayload::Pdf(file) => {
                let hint = StorageHint {
                    assignment_id: id,
                    intern_username: intern.username.clone(),
                };
                let stored = self.file_store.put(&file, &hint).await.map_err(|e| {
                    InternHubError::storage_failure(format!("存储提交文件失败: {}", e.message()))
                })?;
                (SubmissionType::Pdf, None, Some(stored))
            }
        };

        let new = NewSubmission {
            assignment_id: id,
            intern_username: intern.username.clone(),
            submission_type,
            submission_content,
            file_url: stored.as_ref().map(|f| f.file_url.clone()),
            file_name: stored.as_ref().map(|f| f.file_name.clone()),
            submitted_at: now,
            is_late_submission: submission::is_late(&assignment, now),
        };

        let inserted = match self.storage.insert_submission(new.clone()).await {
            Ok(SubmissionInsert::Inserted(submission_id)) => submission_id,
            Ok(SubmissionInsert::Closed) => {
                self.discard(stored.as_ref()).await;
                return Err(InternHubError::precondition_failed(
                    "assignment is no longer accepting submissions",
                ));
            }
            Ok(SubmissionInsert::Duplicate) => {
                self.discard(stored.as_ref()).await;
                return Err(InternHubError::precondition_failed("already submitted"));
            }
            Err(e) => {
                self.discard(stored.as_ref()).await;
                return Err(e);
            }
        };

        if assignment.status() != AssignmentStatus::UnderReview {
            info!(
                "Assignment {} moved {} -> {} by first submission",
                id,
                assignment.status(),
                AssignmentStatus::UnderReview
            );
        }
        self.notifier.notify(NewNotification {
            recipient: assignment.assignment_from.clone(),
            kind: NotificationKind::SubmissionReceived,
            title: format!("New submission: {}", assignment.assignment_name),
            content: format!("{} submitted to '{}'", intern.username, assignment.assignment_name),
            assignment_id: Some(id),
        });

        Ok(Submission {
            id: inserted,
            assignment_id: id,
            intern_username: new.intern_username,
            submission_type: new.submission_type,
            submission_content: new.submission_content,
            file_url: new.file_url,
            file_name: new.file_name,
            submitted_at: new.submitted_at,
            is_late_submission: new.is_late_submission,
            status: SubmissionStatus::Submitted,
            mentor_review: None,
        })
    }

    // 提交未落库时删除已存储的文件，失败只记录
    async fn discard(&self, stored: Option<&StoredFile>) {
        if let Some(file) = stored
            && let Err(e) = self.file_store.remove(file).await
        {
            warn!("Failed to remove orphaned file {}: {}", file.stored_name, e);
        }
    }

    /// 导师或管理员评审一份提交，重复评审覆盖前一次
    pub async fn review(
        &self,
        id: i64,
        intern_username: &str,
        rating: i32,
        comments: &str,
        reviewer_username: &str,
    ) -> Result<Submission> {
        let result = self
            .review_inner(id, intern_username, rating, comments, reviewer_username)
            .await;
        match &result {
            Ok(_) => info!(
                "Submission of {} on assignment {} reviewed by {} (rating {})",
                intern_username, id, reviewer_username, rating
            ),
            Err(e) => log_failure("review", id, e),
        }
        result
    }

    async fn review_inner(
        &self,
        id: i64,
        intern_username: &str,
        rating: i32,
        comments: &str,
        reviewer_username: &str,
    ) -> Result<Submission> {
        let assignment = self.load(id).await?;
        let reviewer = self
            .directory
            .find_staff(reviewer_username)
            .await?
            .map(Account::Staff)
            .ok_or_else(|| InternHubError::unauthorized("not authorized to review"))?;

        let plan = review::plan_review(
            &assignment,
            intern_username,
            rating,
            comments,
            &reviewer,
            Utc::now(),
        )?;
        let new_status = plan.record.assignment_status;

        if !self
            .storage
            .record_review(id, assignment.revision(), plan.record)
            .await?
        {
            return Err(conflict(id));
        }

        if new_status != plan.old_status {
            info!(
                "Assignment {} moved {} -> {} after review",
                id, plan.old_status, new_status
            );
        }
        self.notifier.notify(NewNotification {
            recipient: intern_username.to_string(),
            kind: NotificationKind::SubmissionReviewed,
            title: format!("Submission reviewed: {}", assignment.assignment_name),
            content: format!("Your submission received a rating of {rating}/5"),
            assignment_id: Some(id),
        });

        Ok(plan.submission)
    }
}

use std::sync::Arc;

use crate::errors::Result;
use crate::models::{
    accounts::entities::{InternAccount, StaffAccount},
    assignments::{entities::Assignment, requests::AssignmentListQuery, responses::AssignmentListResponse},
    notifications::{entities::{NewNotification, Notification}, responses::NotificationListResponse},
    teams::entities::Team,
};

pub mod records;
pub mod sea_orm_storage;

pub use records::*;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 账号目录（只读，种子导入除外）
    async fn get_staff_account(&self, username: &str) -> Result<Option<StaffAccount>>;
    async fn get_intern_account(&self, username: &str) -> Result<Option<InternAccount>>;
    // 已存在则跳过，返回是否新建
    async fn create_staff_account_if_absent(&self, account: NewStaffAccount) -> Result<bool>;
    async fn create_intern_account_if_absent(&self, account: NewInternAccount) -> Result<bool>;

    /// 团队目录
    async fn get_team(&self, team_name: &str, organization_id: &str) -> Result<Option<Team>>;
    // 实习生在组织内所属的团队名
    async fn list_intern_team_names(
        &self,
        username: &str,
        organization_id: &str,
    ) -> Result<Vec<String>>;
    async fn create_team_if_absent(&self, team: NewTeam) -> Result<bool>;

    /// 作业
    async fn create_assignment(&self, assignment: NewAssignment) -> Result<Assignment>;
    // 含分发名单与全部提交
    async fn get_assignment(&self, id: i64) -> Result<Option<Assignment>>;
    async fn list_assignments_with_pagination(
        &self,
        scope: AssignmentScope,
        query: AssignmentListQuery,
    ) -> Result<AssignmentListResponse>;
    // revision 不匹配时不写入并返回 false
    async fn update_assignment_details(
        &self,
        id: i64,
        expected_revision: i64,
        changes: AssignmentChanges,
    ) -> Result<bool>;
    async fn apply_status_change(
        &self,
        id: i64,
        expected_revision: i64,
        change: StatusChange,
    ) -> Result<bool>;

    /// 提交与评审
    // 单个事务：仅在作业仍可提交时推进状态并插入提交
    async fn insert_submission(&self, submission: NewSubmission) -> Result<SubmissionInsert>;
    // 单个事务：按 revision 比较交换作业状态并覆盖评审
    async fn record_review(
        &self,
        assignment_id: i64,
        expected_revision: i64,
        record: ReviewRecord,
    ) -> Result<bool>;

    /// 通知
    async fn create_notification(&self, notification: NewNotification) -> Result<Notification>;
    async fn list_notifications_with_pagination(
        &self,
        recipient: &str,
        page: i64,
        size: i64,
    ) -> Result<NotificationListResponse>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}

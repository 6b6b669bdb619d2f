//! 作业存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::assignment_assignees::{
    ActiveModel as AssigneeActiveModel, Column as AssigneeColumn, Entity as AssignmentAssignees,
};
use crate::entity::assignments::{ActiveModel, Column, Entity as Assignments, Model};
use crate::entity::submissions::{Column as SubmissionColumn, Entity as Submissions};
use crate::errors::{InternHubError, Result};
use crate::models::{
    PaginationInfo,
    assignments::{
        entities::{AssignedTo, Assignment, AssignmentStatus},
        requests::AssignmentListQuery,
        responses::AssignmentListResponse,
    },
    common::pagination::clamp_page,
    submissions::entities::{Submission, join_submission_types},
};
use crate::storage::{AssignmentChanges, AssignmentScope, NewAssignment, StatusChange};
use crate::utils::escape_like_pattern;
use sea_orm::sea_query::{Expr, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, QueryTrait, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建作业（含显式分发名单）
    pub async fn create_assignment_impl(&self, new: NewAssignment) -> Result<Assignment> {
        let now = new.created_at.timestamp();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| InternHubError::database_operation(format!("开启事务失败: {e}")))?;

        let model = ActiveModel {
            organization_id: Set(new.organization_id),
            organization_name: Set(new.organization_name),
            team_name: Set(new.team_name),
            assignment_from: Set(new.assignment_from),
            assignment_name: Set(new.assignment_name),
            description: Set(new.description),
            instructions: Set(new.instructions),
            assigned_to_all: Set(new.assigned_to == AssignedTo::All),
            deadline: Set(new.deadline.map(|dt| dt.timestamp())),
            status: Set(AssignmentStatus::PENDING.to_string()),
            accepts_submissions: Set(false),
            max_file_size: Set(new.max_file_size),
            allowed_submission_types: Set(join_submission_types(&new.allowed_submission_types)),
            allow_late_submission: Set(new.allow_late_submission),
            mentor_feedback: Set(None),
            revision: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| InternHubError::database_operation(format!("创建作业失败: {e}")))?;

        let assignees = new.assigned_to.explicit_interns().to_vec();
        replace_assignees(&txn, model.id, &assignees).await?;

        txn.commit()
            .await
            .map_err(|e| InternHubError::database_operation(format!("提交事务失败: {e}")))?;

        model.into_assignment(assignees, Vec::new())
    }

    /// 通过 ID 获取作业
    pub async fn get_assignment_impl(&self, id: i64) -> Result<Option<Assignment>> {
        let model = Assignments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| InternHubError::database_operation(format!("查询作业失败: {e}")))?;

        match model {
            Some(model) => Ok(self.hydrate(vec![model]).await?.pop()),
            None => Ok(None),
        }
    }

    /// 按可见范围分页列出作业，最新的在前
    pub async fn list_assignments_with_pagination_impl(
        &self,
        scope: AssignmentScope,
        query: AssignmentListQuery,
    ) -> Result<AssignmentListResponse> {
        let (page, size) = clamp_page(query.page, query.size);

        let mut select = Assignments::find();

        match scope {
            AssignmentScope::Organization {
                organization_id,
                organization_name,
            } => {
                select = select
                    .filter(Column::OrganizationId.eq(organization_id))
                    .filter(Column::OrganizationName.eq(organization_name));
            }
            AssignmentScope::CreatedBy {
                organization_id,
                organization_name,
                username,
            } => {
                select = select
                    .filter(Column::OrganizationId.eq(organization_id))
                    .filter(Column::OrganizationName.eq(organization_name))
                    .filter(Column::AssignmentFrom.eq(username));
            }
            AssignmentScope::Intern {
                organization_id,
                organization_name,
                username,
                team_names,
            } => {
                let visible: Vec<&str> = AssignmentStatus::intern_visible()
                    .iter()
                    .map(AssignmentStatus::as_str)
                    .collect();
                let explicit = AssignmentAssignees::find()
                    .select_only()
                    .column(AssigneeColumn::AssignmentId)
                    .filter(AssigneeColumn::InternUsername.eq(username))
                    .into_query();

                // 显式名单，或 "all" 且属于该团队
                let mut addressed = Condition::any().add(Column::Id.in_subquery(explicit));
                if !team_names.is_empty() {
                    addressed = addressed.add(
                        Condition::all()
                            .add(Column::AssignedToAll.eq(true))
                            .add(Column::TeamName.is_in(team_names)),
                    );
                }

                select = select
                    .filter(Column::OrganizationId.eq(organization_id))
                    .filter(Column::OrganizationName.eq(organization_name))
                    .filter(Column::Status.is_in(visible))
                    .filter(addressed);
            }
        }

        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.as_str()));
        }

        if let Some(ref team_name) = query.team_name
            && !team_name.trim().is_empty()
        {
            select = select.filter(Column::TeamName.eq(team_name.trim()));
        }

        // 按名称搜索
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Column::AssignmentName.like(LikeExpr::new(format!("%{escaped}%")).escape('\\')),
            );
        }

        select = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size as u64);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| InternHubError::database_operation(format!("查询作业总数失败: {e}")))?;

        let models = paginator
            .fetch_page((page - 1) as u64)
            .await
            .map_err(|e| InternHubError::database_operation(format!("查询作业列表失败: {e}")))?;

        Ok(AssignmentListResponse {
            items: self.hydrate(models).await?,
            pagination: PaginationInfo::new(page, size, total as i64),
        })
    }

    /// 按 revision 比较交换更新可编辑字段
    pub async fn update_assignment_details_impl(
        &self,
        id: i64,
        expected_revision: i64,
        changes: AssignmentChanges,
    ) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| InternHubError::database_operation(format!("开启事务失败: {e}")))?;

        let mut update = Assignments::update_many()
            .col_expr(Column::Revision, Expr::value(expected_revision + 1))
            .col_expr(Column::UpdatedAt, Expr::value(changes.updated_at.timestamp()));

        if let Some(name) = changes.assignment_name {
            update = update.col_expr(Column::AssignmentName, Expr::value(name));
        }
        if let Some(description) = changes.description {
            update = update.col_expr(Column::Description, Expr::value(description));
        }
        if let Some(instructions) = changes.instructions {
            update = update.col_expr(Column::Instructions, Expr::value(instructions));
        }
        if let Some(ref assigned_to) = changes.assigned_to {
            update = update.col_expr(
                Column::AssignedToAll,
                Expr::value(*assigned_to == AssignedTo::All),
            );
        }
        if let Some(deadline) = changes.deadline {
            update = update.col_expr(Column::Deadline, Expr::value(deadline.timestamp()));
        }
        if let Some(max_file_size) = changes.max_file_size {
            update = update.col_expr(Column::MaxFileSize, Expr::value(max_file_size));
        }
        if let Some(ref types) = changes.allowed_submission_types {
            update = update.col_expr(
                Column::AllowedSubmissionTypes,
                Expr::value(join_submission_types(types)),
            );
        }
        if let Some(allow_late) = changes.allow_late_submission {
            update = update.col_expr(Column::AllowLateSubmission, Expr::value(allow_late));
        }

        let result = update
            .filter(Column::Id.eq(id))
            .filter(Column::Revision.eq(expected_revision))
            .exec(&txn)
            .await
            .map_err(|e| InternHubError::database_operation(format!("更新作业失败: {e}")))?;

        if result.rows_affected == 0 {
            txn.rollback()
                .await
                .map_err(|e| InternHubError::database_operation(format!("回滚事务失败: {e}")))?;
            return Ok(false);
        }

        if let Some(assigned_to) = changes.assigned_to {
            replace_assignees(&txn, id, assigned_to.explicit_interns()).await?;
        }

        txn.commit()
            .await
            .map_err(|e| InternHubError::database_operation(format!("提交事务失败: {e}")))?;
        Ok(true)
    }

    /// 按 revision 比较交换写入状态流转
    pub async fn apply_status_change_impl(
        &self,
        id: i64,
        expected_revision: i64,
        change: StatusChange,
    ) -> Result<bool> {
        let result = Assignments::update_many()
            .col_expr(Column::Status, Expr::value(change.status.as_str()))
            .col_expr(
                Column::AcceptsSubmissions,
                Expr::value(change.accepts_submissions),
            )
            .col_expr(Column::Revision, Expr::value(expected_revision + 1))
            .col_expr(Column::UpdatedAt, Expr::value(change.updated_at.timestamp()))
            .filter(Column::Id.eq(id))
            .filter(Column::Revision.eq(expected_revision))
            .exec(&self.db)
            .await
            .map_err(|e| InternHubError::database_operation(format!("更新作业状态失败: {e}")))?;

        Ok(result.rows_affected == 1)
    }

    /// 批量加载分发名单与提交，保持传入顺序
    async fn hydrate(&self, models: Vec<Model>) -> Result<Vec<Assignment>> {
        if models.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i64> = models.iter().map(|m| m.id).collect();

        let mut assignees: HashMap<i64, Vec<String>> = HashMap::new();
        for row in AssignmentAssignees::find()
            .filter(AssigneeColumn::AssignmentId.is_in(ids.clone()))
            .order_by_asc(AssigneeColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| InternHubError::database_operation(format!("查询分发名单失败: {e}")))?
        {
            assignees
                .entry(row.assignment_id)
                .or_default()
                .push(row.intern_username);
        }

        let mut submissions: HashMap<i64, Vec<Submission>> = HashMap::new();
        for row in Submissions::find()
            .filter(SubmissionColumn::AssignmentId.is_in(ids))
            .order_by_asc(SubmissionColumn::SubmittedAt)
            .order_by_asc(SubmissionColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| InternHubError::database_operation(format!("查询提交失败: {e}")))?
        {
            let assignment_id = row.assignment_id;
            submissions
                .entry(assignment_id)
                .or_default()
                .push(row.into_submission()?);
        }

        models
            .into_iter()
            .map(|m| {
                let id = m.id;
                m.into_assignment(
                    assignees.remove(&id).unwrap_or_default(),
                    submissions.remove(&id).unwrap_or_default(),
                )
            })
            .collect()
    }
}

/// 用新名单替换作业的显式分发名单
async fn replace_assignees<C: ConnectionTrait>(
    db: &C,
    assignment_id: i64,
    interns: &[String],
) -> Result<()> {
    AssignmentAssignees::delete_many()
        .filter(AssigneeColumn::AssignmentId.eq(assignment_id))
        .exec(db)
        .await
        .map_err(|e| InternHubError::database_operation(format!("清理分发名单失败: {e}")))?;

    for intern in interns {
        AssigneeActiveModel {
            assignment_id: Set(assignment_id),
            intern_username: Set(intern.clone()),
            ..Default::default()
        }
        .insert(db)
        .await
        .map_err(|e| InternHubError::database_operation(format!("写入分发名单失败: {e}")))?;
    }
    Ok(())
}

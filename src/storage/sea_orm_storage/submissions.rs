//! 提交与评审存储操作

use super::SeaOrmStorage;
use crate::entity::assignments::{Column as AssignmentColumn, Entity as Assignments};
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions};
use crate::errors::{InternHubError, Result};
use crate::models::assignments::entities::AssignmentStatus;
use crate::models::submissions::entities::SubmissionStatus;
use crate::storage::{NewSubmission, ReviewRecord, SubmissionInsert};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseTransaction, EntityTrait, QueryFilter, Set,
    SqlErr, TransactionTrait,
};

impl SeaOrmStorage {
    /// 插入提交
    ///
    /// 同一事务中先做带条件的作业更新（仍接收提交、处于可提交状态、提交类型
    /// 仍被允许、未过截止时间或允许迟交时推进到 under_review 并递增 revision），
    /// 再插入提交行；唯一索引保证同一实习生只能提交一次。
    pub async fn insert_submission_impl(&self, new: NewSubmission) -> Result<SubmissionInsert> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| InternHubError::database_operation(format!("开启事务失败: {e}")))?;

        let open: Vec<&str> = AssignmentStatus::ALL
            .iter()
            .filter(|s| s.is_open_for_submissions())
            .map(AssignmentStatus::as_str)
            .collect();

        let guarded = Assignments::update_many()
            .col_expr(
                AssignmentColumn::Status,
                Expr::value(AssignmentStatus::UNDER_REVIEW),
            )
            .col_expr(AssignmentColumn::Revision, Expr::cust("revision + 1"))
            .col_expr(
                AssignmentColumn::UpdatedAt,
                Expr::value(new.submitted_at.timestamp()),
            )
            .filter(AssignmentColumn::Id.eq(new.assignment_id))
            .filter(AssignmentColumn::AcceptsSubmissions.eq(true))
            .filter(AssignmentColumn::Status.is_in(open))
            .filter(type_allowed(new.submission_type.as_str()))
            .filter(
                Condition::any()
                    .add(AssignmentColumn::AllowLateSubmission.eq(true))
                    .add(AssignmentColumn::Deadline.is_null())
                    .add(AssignmentColumn::Deadline.gte(new.submitted_at.timestamp())),
            )
            .exec(&txn)
            .await
            .map_err(|e| InternHubError::database_operation(format!("更新作业状态失败: {e}")))?;

        if guarded.rows_affected == 0 {
            rollback(txn).await?;
            return Ok(SubmissionInsert::Closed);
        }

        let inserted = ActiveModel {
            assignment_id: Set(new.assignment_id),
            intern_username: Set(new.intern_username),
            submission_type: Set(new.submission_type.to_string()),
            submission_content: Set(new.submission_content),
            file_url: Set(new.file_url),
            file_name: Set(new.file_name),
            submitted_at: Set(new.submitted_at.timestamp()),
            is_late_submission: Set(new.is_late_submission),
            status: Set(SubmissionStatus::SUBMITTED.to_string()),
            ..Default::default()
        }
        .insert(&txn)
        .await;

        match inserted {
            Ok(model) => {
                txn.commit().await.map_err(|e| {
                    InternHubError::database_operation(format!("提交事务失败: {e}"))
                })?;
                Ok(SubmissionInsert::Inserted(model.id))
            }
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                rollback(txn).await?;
                Ok(SubmissionInsert::Duplicate)
            }
            Err(e) => Err(InternHubError::database_operation(format!(
                "创建提交失败: {e}"
            ))),
        }
    }

    /// 写入评审：作业按 revision 比较交换，提交行覆盖评审字段
    pub async fn record_review_impl(
        &self,
        assignment_id: i64,
        expected_revision: i64,
        record: ReviewRecord,
    ) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| InternHubError::database_operation(format!("开启事务失败: {e}")))?;

        let mut update = Assignments::update_many()
            .col_expr(
                AssignmentColumn::Status,
                Expr::value(record.assignment_status.as_str()),
            )
            .col_expr(
                AssignmentColumn::AcceptsSubmissions,
                Expr::value(record.accepts_submissions),
            )
            .col_expr(AssignmentColumn::Revision, Expr::value(expected_revision + 1))
            .col_expr(
                AssignmentColumn::UpdatedAt,
                Expr::value(record.review.reviewed_at.timestamp()),
            );
        if let Some(feedback) = record.mentor_feedback {
            update = update.col_expr(AssignmentColumn::MentorFeedback, Expr::value(feedback));
        }

        let result = update
            .filter(AssignmentColumn::Id.eq(assignment_id))
            .filter(AssignmentColumn::Revision.eq(expected_revision))
            .exec(&txn)
            .await
            .map_err(|e| InternHubError::database_operation(format!("更新作业状态失败: {e}")))?;

        if result.rows_affected == 0 {
            rollback(txn).await?;
            return Ok(false);
        }

        let review = record.review;
        let result = Submissions::update_many()
            .col_expr(Column::Status, Expr::value(SubmissionStatus::REVIEWED))
            .col_expr(Column::ReviewRating, Expr::value(review.rating))
            .col_expr(Column::ReviewComments, Expr::value(review.comments))
            .col_expr(Column::ReviewedAt, Expr::value(review.reviewed_at.timestamp()))
            .col_expr(Column::ReviewedBy, Expr::value(review.reviewed_by))
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::InternUsername.eq(record.intern_username.as_str()))
            .exec(&txn)
            .await
            .map_err(|e| InternHubError::database_operation(format!("写入评审失败: {e}")))?;

        if result.rows_affected == 0 {
            rollback(txn).await?;
            return Err(InternHubError::not_found(format!(
                "submission not found for intern '{}'",
                record.intern_username
            )));
        }

        txn.commit()
            .await
            .map_err(|e| InternHubError::database_operation(format!("提交事务失败: {e}")))?;
        Ok(true)
    }
}

/// allowed_submission_types 以逗号拼接存储，如 "link,pdf"
fn type_allowed(submission_type: &str) -> Condition {
    Condition::any()
        .add(AssignmentColumn::AllowedSubmissionTypes.eq(submission_type))
        .add(AssignmentColumn::AllowedSubmissionTypes.like(format!("{submission_type},%")))
        .add(AssignmentColumn::AllowedSubmissionTypes.like(format!("%,{submission_type}")))
        .add(AssignmentColumn::AllowedSubmissionTypes.like(format!("%,{submission_type},%")))
}

async fn rollback(txn: DatabaseTransaction) -> Result<()> {
    txn.rollback()
        .await
        .map_err(|e| InternHubError::database_operation(format!("回滚事务失败: {e}")))
}

//! 提交实体（评审字段内联）

use sea_orm::entity::prelude::*;

use crate::errors::InternHubError;
use crate::models::submissions::entities::{MentorReview, Submission};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "submissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub assignment_id: i64,
    pub intern_username: String,
    pub submission_type: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub submission_content: Option<String>,
    pub file_url: Option<String>,
    pub file_name: Option<String>,
    pub submitted_at: i64,
    pub is_late_submission: bool,
    pub status: String,
    pub review_rating: Option<i32>,
    #[sea_orm(column_type = "Text", nullable)]
    pub review_comments: Option<String>,
    pub reviewed_at: Option<i64>,
    pub reviewed_by: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::assignments::Entity",
        from = "Column::AssignmentId",
        to = "super::assignments::Column::Id",
        on_delete = "Cascade"
    )]
    Assignment,
}

impl Related<super::assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_submission(self) -> crate::errors::Result<Submission> {
        let submission_type = self
            .submission_type
            .parse()
            .map_err(InternHubError::database_operation)?;
        let status = self
            .status
            .parse()
            .map_err(InternHubError::database_operation)?;
        // 评分、评审人、时间齐全才视为有评审记录
        let mentor_review = match (self.review_rating, self.reviewed_by, self.reviewed_at) {
            (Some(rating), Some(reviewed_by), Some(reviewed_at)) => Some(MentorReview {
                rating,
                comments: self.review_comments.unwrap_or_default(),
                reviewed_at: super::from_timestamp(reviewed_at),
                reviewed_by,
            }),
            _ => None,
        };

        Ok(Submission {
            id: self.id,
            assignment_id: self.assignment_id,
            intern_username: self.intern_username,
            submission_type,
            submission_content: self.submission_content,
            file_url: self.file_url,
            file_name: self.file_name,
            submitted_at: super::from_timestamp(self.submitted_at),
            is_late_submission: self.is_late_submission,
            status,
            mentor_review,
        })
    }
}

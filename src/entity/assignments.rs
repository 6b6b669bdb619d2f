//! 作业实体

use sea_orm::entity::prelude::*;

use crate::errors::InternHubError;
use crate::models::assignments::entities::{AssignedTo, Assignment};
use crate::models::submissions::entities::{Submission, parse_submission_types};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "assignments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub organization_id: String,
    pub organization_name: String,
    pub team_name: String,
    pub assignment_from: String,
    pub assignment_name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub instructions: Option<String>,
    pub assigned_to_all: bool,
    pub deadline: Option<i64>,
    pub status: String,
    pub accepts_submissions: bool,
    pub max_file_size: i64,
    // 逗号分隔，如 "link,pdf"
    pub allowed_submission_types: String,
    pub allow_late_submission: bool,
    #[sea_orm(column_type = "Text", nullable)]
    pub mentor_feedback: Option<String>,
    pub revision: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::submissions::Entity")]
    Submissions,
    #[sea_orm(has_many = "super::assignment_assignees::Entity")]
    Assignees,
}

impl Related<super::submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submissions.def()
    }
}

impl Related<super::assignment_assignees::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignees.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_assignment(
        self,
        assignees: Vec<String>,
        submissions: Vec<Submission>,
    ) -> crate::errors::Result<Assignment> {
        let status = self
            .status
            .parse()
            .map_err(InternHubError::database_operation)?;
        let allowed_submission_types = parse_submission_types(&self.allowed_submission_types)
            .map_err(InternHubError::database_operation)?;
        let assigned_to = if self.assigned_to_all {
            AssignedTo::All
        } else {
            AssignedTo::Interns(assignees)
        };

        Ok(Assignment {
            id: self.id,
            organization_id: self.organization_id,
            organization_name: self.organization_name,
            team_name: self.team_name,
            assignment_from: self.assignment_from,
            assignment_name: self.assignment_name,
            description: self.description,
            instructions: self.instructions,
            assigned_to,
            deadline: self.deadline.map(super::from_timestamp),
            status,
            accepts_submissions: self.accepts_submissions,
            max_file_size: self.max_file_size,
            allowed_submission_types,
            allow_late_submission: self.allow_late_submission,
            mentor_feedback: self.mentor_feedback,
            revision: self.revision,
            submissions,
            created_at: super::from_timestamp(self.created_at),
            updated_at: super::from_timestamp(self.updated_at),
        })
    }
}

//! 通知实体

use sea_orm::entity::prelude::*;

use crate::errors::InternHubError;
use crate::models::notifications::entities::Notification;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub recipient: String,
    pub kind: String,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub assignment_id: Option<i64>,
    pub is_read: bool,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_notification(self) -> crate::errors::Result<Notification> {
        Ok(Notification {
            id: self.id,
            recipient: self.recipient,
            kind: self.kind.parse().map_err(InternHubError::database_operation)?,
            title: self.title,
            content: self.content,
            assignment_id: self.assignment_id,
            is_read: self.is_read,
            created_at: super::from_timestamp(self.created_at),
        })
    }
}

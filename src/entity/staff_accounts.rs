//! 员工分区账号实体

use sea_orm::entity::prelude::*;

use crate::errors::InternHubError;
use crate::models::accounts::entities::StaffAccount;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "staff_accounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub username: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub role: String,
    pub organization_id: String,
    pub organization_name: String,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_staff_account(self) -> crate::errors::Result<StaffAccount> {
        let role = self.role.parse().map_err(InternHubError::database_operation)?;
        Ok(StaffAccount {
            id: self.id,
            username: self.username,
            email: self.email,
            display_name: self.display_name,
            role,
            organization_id: self.organization_id,
            organization_name: self.organization_name,
            created_at: super::from_timestamp(self.created_at),
        })
    }
}

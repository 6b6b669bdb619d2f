//! 账号目录存储操作

use super::SeaOrmStorage;
use crate::entity::intern_accounts::{
    ActiveModel as InternActiveModel, Column as InternColumn, Entity as InternAccounts,
};
use crate::entity::staff_accounts::{
    ActiveModel as StaffActiveModel, Column as StaffColumn, Entity as StaffAccounts,
};
use crate::errors::{InternHubError, Result};
use crate::models::accounts::entities::{InternAccount, StaffAccount};
use crate::storage::{NewInternAccount, NewStaffAccount};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};

impl SeaOrmStorage {
    pub async fn get_staff_account_impl(&self, username: &str) -> Result<Option<StaffAccount>> {
        let result = StaffAccounts::find()
            .filter(StaffColumn::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| InternHubError::database_operation(format!("查询员工账号失败: {e}")))?;

        result.map(|m| m.into_staff_account()).transpose()
    }

    pub async fn get_intern_account_impl(&self, username: &str) -> Result<Option<InternAccount>> {
        let result = InternAccounts::find()
            .filter(InternColumn::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| {
                InternHubError::database_operation(format!("查询实习生账号失败: {e}"))
            })?;

        Ok(result.map(|m| m.into_intern_account()))
    }

    pub async fn create_staff_account_if_absent_impl(
        &self,
        account: NewStaffAccount,
    ) -> Result<bool> {
        if self.get_staff_account_impl(&account.username).await?.is_some() {
            return Ok(false);
        }

        let model = StaffActiveModel {
            username: Set(account.username),
            email: Set(account.email),
            display_name: Set(account.display_name),
            role: Set(account.role.to_string()),
            organization_id: Set(account.organization_id),
            organization_name: Set(account.organization_name),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };
        model
            .insert(&self.db)
            .await
            .map_err(|e| InternHubError::database_operation(format!("创建员工账号失败: {e}")))?;
        Ok(true)
    }

    pub async fn create_intern_account_if_absent_impl(
        &self,
        account: NewInternAccount,
    ) -> Result<bool> {
        if self.get_intern_account_impl(&account.username).await?.is_some() {
            return Ok(false);
        }

        let model = InternActiveModel {
            username: Set(account.username),
            email: Set(account.email),
            display_name: Set(account.display_name),
            organization_id: Set(account.organization_id),
            organization_name: Set(account.organization_name),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };
        model.insert(&self.db).await.map_err(|e| {
            InternHubError::database_operation(format!("创建实习生账号失败: {e}"))
        })?;
        Ok(true)
    }
}

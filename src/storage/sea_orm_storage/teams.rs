//! 团队目录存储操作

use super::SeaOrmStorage;
use crate::entity::team_members::{
    ActiveModel as MemberActiveModel, Column as MemberColumn, Entity as TeamMembers,
};
use crate::entity::teams::{ActiveModel, Column, Entity as Teams};
use crate::errors::{InternHubError, Result};
use crate::models::teams::entities::{Team, TeamRole};
use crate::storage::NewTeam;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

impl SeaOrmStorage {
    pub async fn get_team_impl(&self, team_name: &str, organization_id: &str) -> Result<Option<Team>> {
        let team = Teams::find()
            .filter(Column::TeamName.eq(team_name))
            .filter(Column::OrganizationId.eq(organization_id))
            .one(&self.db)
            .await
            .map_err(|e| InternHubError::database_operation(format!("查询团队失败: {e}")))?;

        let Some(team) = team else {
            return Ok(None);
        };

        let members = TeamMembers::find()
            .filter(MemberColumn::TeamId.eq(team.id))
            .order_by_asc(MemberColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| InternHubError::database_operation(format!("查询团队成员失败: {e}")))?;

        Ok(Some(team.into_team(members)))
    }

    pub async fn list_intern_team_names_impl(
        &self,
        username: &str,
        organization_id: &str,
    ) -> Result<Vec<String>> {
        let team_ids: Vec<i64> = TeamMembers::find()
            .filter(MemberColumn::Username.eq(username))
            .filter(MemberColumn::Role.eq(TeamRole::INTERN))
            .all(&self.db)
            .await
            .map_err(|e| InternHubError::database_operation(format!("查询团队成员失败: {e}")))?
            .into_iter()
            .map(|m| m.team_id)
            .collect();

        if team_ids.is_empty() {
            return Ok(Vec::new());
        }

        let names = Teams::find()
            .filter(Column::Id.is_in(team_ids))
            .filter(Column::OrganizationId.eq(organization_id))
            .order_by_asc(Column::TeamName)
            .all(&self.db)
            .await
            .map_err(|e| InternHubError::database_operation(format!("查询团队失败: {e}")))?
            .into_iter()
            .map(|t| t.team_name)
            .collect();
        Ok(names)
    }

    pub async fn create_team_if_absent_impl(&self, team: NewTeam) -> Result<bool> {
        if self
            .get_team_impl(&team.team_name, &team.organization_id)
            .await?
            .is_some()
        {
            return Ok(false);
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| InternHubError::database_operation(format!("开启事务失败: {e}")))?;

        let created = ActiveModel {
            team_name: Set(team.team_name),
            organization_id: Set(team.organization_id),
            organization_name: Set(team.organization_name),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| InternHubError::database_operation(format!("创建团队失败: {e}")))?;

        for (username, role) in team.members {
            MemberActiveModel {
                team_id: Set(created.id),
                username: Set(username),
                role: Set(role.to_string()),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(|e| InternHubError::database_operation(format!("添加团队成员失败: {e}")))?;
        }

        txn.commit()
            .await
            .map_err(|e| InternHubError::database_operation(format!("提交事务失败: {e}")))?;
        Ok(true)
    }
}

//! 团队实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "teams")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub team_name: String,
    pub organization_id: String,
    pub organization_name: String,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::team_members::Entity")]
    Members,
}

impl Related<super::team_members::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Members.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// 按成员角色拆分名单
    pub fn into_team(
        self,
        members: Vec<super::team_members::Model>,
    ) -> crate::models::teams::entities::Team {
        use crate::models::teams::entities::{Team, TeamRole};

        let mut team = Team {
            id: self.id,
            team_name: self.team_name,
            organization_id: self.organization_id,
            organization_name: self.organization_name,
            mentors: Vec::new(),
            interns: Vec::new(),
            panelists: Vec::new(),
            created_at: super::from_timestamp(self.created_at),
        };
        for member in members {
            match member.role.parse::<TeamRole>() {
                Ok(TeamRole::Mentor) => team.mentors.push(member.username),
                Ok(TeamRole::Intern) => team.interns.push(member.username),
                Ok(TeamRole::Panelist) => team.panelists.push(member.username),
                Err(e) => tracing::warn!("Skipping team member {}: {}", member.username, e),
            }
        }
        team
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 团队成员角色
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "team.ts")]
pub enum TeamRole {
    Mentor,
    Intern,
    Panelist,
}

impl TeamRole {
    pub const MENTOR: &'static str = "mentor";
    pub const INTERN: &'static str = "intern";
    pub const PANELIST: &'static str = "panelist";
}

impl std::fmt::Display for TeamRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TeamRole::Mentor => write!(f, "{}", TeamRole::MENTOR),
            TeamRole::Intern => write!(f, "{}", TeamRole::INTERN),
            TeamRole::Panelist => write!(f, "{}", TeamRole::PANELIST),
        }
    }
}

impl std::str::FromStr for TeamRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            TeamRole::MENTOR => Ok(TeamRole::Mentor),
            TeamRole::INTERN => Ok(TeamRole::Intern),
            TeamRole::PANELIST => Ok(TeamRole::Panelist),
            _ => Err(format!("Invalid team role: '{s}'")),
        }
    }
}

/// 组织内的团队（团队名只在组织内唯一）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "team.ts")]
pub struct Team {
    pub id: i64,
    pub team_name: String,
    pub organization_id: String,
    pub organization_name: String,
    pub mentors: Vec<String>,
    pub interns: Vec<String>,
    pub panelists: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Team {
    pub fn has_mentor(&self, username: &str) -> bool {
        self.mentors.iter().any(|m| m == username)
    }

    pub fn has_intern(&self, username: &str) -> bool {
        self.interns.iter().any(|i| i == username)
    }
}

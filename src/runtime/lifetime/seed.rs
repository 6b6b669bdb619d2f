//! 启动时的目录数据导入
//!
//! 从 JSON 文件导入组织的员工、实习生与团队，已存在的记录跳过。

use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::errors::{InternHubError, Result};
use crate::models::accounts::entities::Role;
use crate::models::teams::entities::TeamRole;
use crate::storage::{NewInternAccount, NewStaffAccount, NewTeam, Storage};

#[derive(Debug, Deserialize)]
pub struct SeedFile {
    #[serde(default)]
    pub organizations: Vec<SeedOrganization>,
}

#[derive(Debug, Deserialize)]
pub struct SeedOrganization {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub staff: Vec<SeedStaff>,
    #[serde(default)]
    pub interns: Vec<SeedIntern>,
    #[serde(default)]
    pub teams: Vec<SeedTeam>,
}

#[derive(Debug, Deserialize)]
pub struct SeedStaff {
    pub username: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    #[serde(default = "default_staff_role")]
    pub role: Role,
}

fn default_staff_role() -> Role {
    Role::Employee
}

#[derive(Debug, Deserialize)]
pub struct SeedIntern {
    pub username: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SeedTeam {
    pub name: String,
    #[serde(default)]
    pub mentors: Vec<String>,
    #[serde(default)]
    pub interns: Vec<String>,
    #[serde(default)]
    pub panelists: Vec<String>,
}

/// 导入计数
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub staff: usize,
    pub interns: usize,
    pub teams: usize,
    pub skipped: usize,
}

impl SeedFile {
    pub fn parse(raw: &str) -> Result<Self> {
        let seed: SeedFile = serde_json::from_str(raw)?;
        for org in &seed.organizations {
            if org.id.trim().is_empty() {
                return Err(InternHubError::validation("organization id must not be empty"));
            }
            if org.staff.iter().any(|s| s.role == Role::Intern) {
                return Err(InternHubError::validation(format!(
                    "organization '{}' lists an intern under staff",
                    org.id
                )));
            }
        }
        Ok(seed)
    }
}

pub async fn import_seed_file(storage: &dyn Storage, path: &Path) -> Result<SeedReport> {
    let raw = tokio::fs::read_to_string(path).await?;
    let seed = SeedFile::parse(&raw)?;
    import_seed(storage, seed).await
}

pub async fn import_seed(storage: &dyn Storage, seed: SeedFile) -> Result<SeedReport> {
    let mut report = SeedReport::default();

    for org in seed.organizations {
        for staff in org.staff {
            let created = storage
                .create_staff_account_if_absent(NewStaffAccount {
                    username: staff.username,
                    email: staff.email,
                    display_name: staff.display_name,
                    role: staff.role,
                    organization_id: org.id.clone(),
                    organization_name: org.name.clone(),
                })
                .await?;
            tally(&mut report.staff, &mut report.skipped, created);
        }

        for intern in org.interns {
            let created = storage
                .create_intern_account_if_absent(NewInternAccount {
                    username: intern.username,
                    email: intern.email,
                    display_name: intern.display_name,
                    organization_id: org.id.clone(),
                    organization_name: org.name.clone(),
                })
                .await?;
            tally(&mut report.interns, &mut report.skipped, created);
        }

        for team in org.teams {
            let members = team
                .mentors
                .into_iter()
                .map(|m| (m, TeamRole::Mentor))
                .chain(team.interns.into_iter().map(|i| (i, TeamRole::Intern)))
                .chain(team.panelists.into_iter().map(|p| (p, TeamRole::Panelist)))
                .collect();
            let created = storage
                .create_team_if_absent(NewTeam {
                    team_name: team.name,
                    organization_id: org.id.clone(),
                    organization_name: org.name.clone(),
                    members,
                })
                .await?;
            tally(&mut report.teams, &mut report.skipped, created);
        }
    }

    Ok(report)
}

fn tally(created_count: &mut usize, skipped: &mut usize, created: bool) {
    if created {
        *created_count += 1;
    } else {
        *skipped += 1;
    }
}

/// 配置了种子文件时导入，失败只记录日志
pub async fn run_configured_seed(storage: &dyn Storage, seed_file: &str) {
    if seed_file.is_empty() {
        return;
    }
    match import_seed_file(storage, Path::new(seed_file)).await {
        Ok(report) => info!(
            "Seed import from {} finished: {} staff, {} interns, {} teams created, {} skipped",
            seed_file, report.staff, report.interns, report.teams, report.skipped
        ),
        Err(e) => warn!("Seed import from {} failed: {}", seed_file, e),
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 账号角色
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "account.ts")]
pub enum Role {
    Admin,    // 组织管理员
    Employee, // 员工（导师）
    Intern,   // 实习生
}

impl Role {
    pub const ADMIN: &'static str = "admin";
    pub const EMPLOYEE: &'static str = "employee";
    pub const INTERN: &'static str = "intern";

    pub fn staff_roles() -> &'static [&'static Role] {
        &[&Self::Admin, &Self::Employee]
    }

    pub fn all_roles() -> &'static [&'static Role] {
        &[&Self::Admin, &Self::Employee, &Self::Intern]
    }

    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Admin | Role::Employee)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "{}", Role::ADMIN),
            Role::Employee => write!(f, "{}", Role::EMPLOYEE),
            Role::Intern => write!(f, "{}", Role::INTERN),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Role::ADMIN => Ok(Role::Admin),
            Role::EMPLOYEE => Ok(Role::Employee),
            Role::INTERN => Ok(Role::Intern),
            _ => Err(format!(
                "Invalid role: '{s}'. Supported roles: admin, employee, intern"
            )),
        }
    }
}

/// 员工分区账号（admin / employee）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "account.ts")]
pub struct StaffAccount {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub role: Role,
    pub organization_id: String,
    pub organization_name: String,
    pub created_at: DateTime<Utc>,
}

/// 实习生分区账号
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "account.ts")]
pub struct InternAccount {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub organization_id: String,
    pub organization_name: String,
    pub created_at: DateTime<Utc>,
}

/// 两个账号分区的统一视图
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "partition", rename_all = "snake_case")]
pub enum Account {
    Staff(StaffAccount),
    Intern(InternAccount),
}

/// 工作流只依赖的账号能力
pub trait AccountInfo {
    fn username(&self) -> &str;
    fn role(&self) -> Role;
    fn organization_id(&self) -> &str;
    fn organization_name(&self) -> &str;

    fn is_admin(&self) -> bool {
        self.role() == Role::Admin
    }

    fn is_staff(&self) -> bool {
        self.role().is_staff()
    }

    /// 组织 ID 与名称同时匹配才算同一组织
    fn same_organization(&self, organization_id: &str, organization_name: &str) -> bool {
        self.organization_id() == organization_id && self.organization_name() == organization_name
    }
}

impl AccountInfo for StaffAccount {
    fn username(&self) -> &str {
        &self.username
    }
    fn role(&self) -> Role {
        self.role
    }
    fn organization_id(&self) -> &str {
        &self.organization_id
    }
    fn organization_name(&self) -> &str {
        &self.organization_name
    }
}

impl AccountInfo for InternAccount {
    fn username(&self) -> &str {
        &self.username
    }
    fn role(&self) -> Role {
        Role::Intern
    }
    fn organization_id(&self) -> &str {
        &self.organization_id
    }
    fn organization_name(&self) -> &str {
        &self.organization_name
    }
}

impl AccountInfo for Account {
    fn username(&self) -> &str {
        match self {
            Account::Staff(a) => a.username(),
            Account::Intern(a) => a.username(),
        }
    }
    fn role(&self) -> Role {
        match self {
            Account::Staff(a) => a.role(),
            Account::Intern(a) => a.role(),
        }
    }
    fn organization_id(&self) -> &str {
        match self {
            Account::Staff(a) => a.organization_id(),
            Account::Intern(a) => a.organization_id(),
        }
    }
    fn organization_name(&self) -> &str {
        match self {
            Account::Staff(a) => a.organization_name(),
            Account::Intern(a) => a.organization_name(),
        }
    }
}

impl Account {
    pub fn as_staff(&self) -> Option<&StaffAccount> {
        match self {
            Account::Staff(a) => Some(a),
            Account::Intern(_) => None,
        }
    }

    pub fn as_intern(&self) -> Option<&InternAccount> {
        match self {
            Account::Intern(a) => Some(a),
            Account::Staff(_) => None,
        }
    }
}

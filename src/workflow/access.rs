//! 访问规则
//!
//! 所有判断都以组织 ID、组织名与团队名共同限定，不单独依赖团队名。

use crate::errors::{InternHubError, Result};
use crate::models::accounts::entities::{Account, AccountInfo, StaffAccount};
use crate::models::assignments::entities::{AssignedTo, Assignment};
use crate::models::teams::entities::Team;

/// 员工且与作业同组织
pub fn require_staff_in_org<'a>(actor: &'a Account, assignment: &Assignment) -> Result<&'a StaffAccount> {
    match actor.as_staff() {
        Some(staff)
            if staff.same_organization(
                &assignment.organization_id,
                &assignment.organization_name,
            ) =>
        {
            Ok(staff)
        }
        _ => Err(InternHubError::unauthorized(format!(
            "'{}' is not authorized for assignment {}",
            actor.username(),
            assignment.id
        ))),
    }
}

/// 创建者或管理员
pub fn require_owner_or_admin(staff: &StaffAccount, assignment: &Assignment) -> Result<()> {
    if staff.is_admin() || staff.username == assignment.assignment_from {
        Ok(())
    } else {
        Err(InternHubError::unauthorized(format!(
            "only the creator or an admin may manage assignment {}",
            assignment.id
        )))
    }
}

/// 管理作业（流转、编辑）的完整规则
pub fn authorize_manage(actor: &Account, assignment: &Assignment) -> Result<()> {
    let staff = require_staff_in_org(actor, assignment)?;
    require_owner_or_admin(staff, assignment)
}

/// 在团队下创建作业：管理员，或该团队的导师
pub fn authorize_create<'a>(actor: &'a Account, team: &Team) -> Result<&'a StaffAccount> {
    let Some(staff) = actor.as_staff() else {
        return Err(InternHubError::unauthorized(
            "only staff accounts may create assignments",
        ));
    };
    if !staff.same_organization(&team.organization_id, &team.organization_name) {
        return Err(InternHubError::unauthorized(format!(
            "team '{}' belongs to another organization",
            team.team_name
        )));
    }
    if staff.is_admin() || team.has_mentor(&staff.username) {
        Ok(staff)
    } else {
        Err(InternHubError::unauthorized(format!(
            "'{}' is not a mentor of team '{}'",
            staff.username, team.team_name
        )))
    }
}

/// 作业是否分发给了该实习生
///
/// `team` 为作业所属团队；显式名单不需要它。
pub fn is_addressed_to(assignment: &Assignment, intern_username: &str, team: Option<&Team>) -> bool {
    match &assignment.assigned_to {
        AssignedTo::Interns(list) => list.iter().any(|u| u == intern_username),
        AssignedTo::All => team.is_some_and(|t| {
            t.team_name == assignment.team_name
                && t.organization_id == assignment.organization_id
                && t.has_intern(intern_username)
        }),
    }
}

/// 读取单个作业的可见性
pub fn can_view(actor: &Account, assignment: &Assignment, team: Option<&Team>) -> bool {
    match actor {
        Account::Staff(_) => authorize_manage(actor, assignment).is_ok(),
        Account::Intern(intern) => {
            intern.same_organization(&assignment.organization_id, &assignment.organization_name)
                && assignment.status().is_intern_visible()
                && is_addressed_to(assignment, &intern.username, team)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::accounts::entities::Role;
    use crate::models::assignments::entities::AssignmentStatus;
    use crate::workflow::testing::{assignment, intern, staff, team};

    #[test]
    fn creator_and_admin_can_manage() {
        let a = assignment(AssignmentStatus::Pending);
        assert!(authorize_manage(&staff("mentor", Role::Employee), &a).is_ok());
        assert!(authorize_manage(&staff("boss", Role::Admin), &a).is_ok());

        let err = authorize_manage(&staff("other", Role::Employee), &a).unwrap_err();
        assert_eq!(err.code(), "E012");
        assert!(authorize_manage(&intern("alice"), &a).is_err());
    }

    #[test]
    fn admin_of_other_organization_is_rejected() {
        let a = assignment(AssignmentStatus::Pending);
        let mut admin = staff("boss", Role::Admin);
        if let Account::Staff(ref mut s) = admin {
            s.organization_id = "org-2".into();
        }
        assert!(authorize_manage(&admin, &a).is_err());

        // 同 ID 不同名称也不算同一组织
        let mut admin = staff("boss", Role::Admin);
        if let Account::Staff(ref mut s) = admin {
            s.organization_name = "Elsewhere".into();
        }
        assert!(authorize_manage(&admin, &a).is_err());
    }

    #[test]
    fn create_requires_team_mentor_or_admin() {
        let t = team();
        assert!(authorize_create(&staff("mentor", Role::Employee), &t).is_ok());
        assert!(authorize_create(&staff("boss", Role::Admin), &t).is_ok());
        assert!(authorize_create(&staff("stranger", Role::Employee), &t).is_err());
        assert!(authorize_create(&intern("alice"), &t).is_err());
    }

    #[test]
    fn intern_visibility() {
        let t = team();
        let mut a = assignment(AssignmentStatus::Posted);
        assert!(can_view(&intern("alice"), &a, Some(&t)));
        assert!(!can_view(&intern("zed"), &a, Some(&t)));

        a.assigned_to = AssignedTo::Interns(vec!["bob".into()]);
        assert!(!can_view(&intern("alice"), &a, Some(&t)));
        assert!(can_view(&intern("bob"), &a, None));

        let pending = assignment(AssignmentStatus::Pending);
        assert!(!can_view(&intern("alice"), &pending, Some(&t)));
    }
}

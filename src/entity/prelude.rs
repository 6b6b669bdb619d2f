//! 预导入模块，方便使用

pub use super::assignment_assignees::{
    ActiveModel as AssignmentAssigneeActiveModel, Entity as AssignmentAssignees,
    Model as AssignmentAssigneeModel,
};
pub use super::assignments::{
    ActiveModel as AssignmentActiveModel, Entity as Assignments, Model as AssignmentModel,
};
pub use super::intern_accounts::{
    ActiveModel as InternAccountActiveModel, Entity as InternAccounts,
    Model as InternAccountModel,
};
pub use super::notifications::{
    ActiveModel as NotificationActiveModel, Entity as Notifications, Model as NotificationModel,
};
pub use super::staff_accounts::{
    ActiveModel as StaffAccountActiveModel, Entity as StaffAccounts, Model as StaffAccountModel,
};
pub use super::submissions::{
    ActiveModel as SubmissionActiveModel, Entity as Submissions, Model as SubmissionModel,
};
pub use super::team_members::{
    ActiveModel as TeamMemberActiveModel, Entity as TeamMembers, Model as TeamMemberModel,
};
pub use super::teams::{ActiveModel as TeamActiveModel, Entity as Teams, Model as TeamModel};

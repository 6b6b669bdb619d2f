use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 员工账号表（admin / employee）
        manager
            .create_table(
                Table::create()
                    .table(StaffAccounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StaffAccounts::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(StaffAccounts::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(StaffAccounts::Email).string().null())
                    .col(ColumnDef::new(StaffAccounts::DisplayName).string().null())
                    .col(ColumnDef::new(StaffAccounts::Role).string().not_null())
                    .col(
                        ColumnDef::new(StaffAccounts::OrganizationId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StaffAccounts::OrganizationName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StaffAccounts::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 实习生账号表
        manager
            .create_table(
                Table::create()
                    .table(InternAccounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InternAccounts::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(InternAccounts::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(InternAccounts::Email).string().null())
                    .col(ColumnDef::new(InternAccounts::DisplayName).string().null())
                    .col(
                        ColumnDef::new(InternAccounts::OrganizationId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InternAccounts::OrganizationName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InternAccounts::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 团队表
        manager
            .create_table(
                Table::create()
                    .table(Teams::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Teams::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Teams::TeamName).string().not_null())
                    .col(ColumnDef::new(Teams::OrganizationId).string().not_null())
                    .col(ColumnDef::new(Teams::OrganizationName).string().not_null())
                    .col(ColumnDef::new(Teams::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 团队成员表
        manager
            .create_table(
                Table::create()
                    .table(TeamMembers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TeamMembers::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TeamMembers::TeamId).big_integer().not_null())
                    .col(ColumnDef::new(TeamMembers::Username).string().not_null())
                    .col(ColumnDef::new(TeamMembers::Role).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(TeamMembers::Table, TeamMembers::TeamId)
                            .to(Teams::Table, Teams::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 作业表
        manager
            .create_table(
                Table::create()
                    .table(Assignments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Assignments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Assignments::OrganizationId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Assignments::OrganizationName)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Assignments::TeamName).string().not_null())
                    .col(
                        ColumnDef::new(Assignments::AssignmentFrom)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Assignments::AssignmentName)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Assignments::Description).text().null())
                    .col(ColumnDef::new(Assignments::Instructions).text().null())
                    .col(
                        ColumnDef::new(Assignments::AssignedToAll)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Assignments::Deadline).big_integer().null())
                    .col(ColumnDef::new(Assignments::Status).string().not_null())
                    .col(
                        ColumnDef::new(Assignments::AcceptsSubmissions)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Assignments::MaxFileSize)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Assignments::AllowedSubmissionTypes)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Assignments::AllowLateSubmission)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Assignments::MentorFeedback).text().null())
                    .col(
                        ColumnDef::new(Assignments::Revision)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Assignments::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Assignments::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 作业指定对象表（assignedTo 为显式名单时使用）
        manager
            .create_table(
                Table::create()
                    .table(AssignmentAssignees::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AssignmentAssignees::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AssignmentAssignees::AssignmentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AssignmentAssignees::InternUsername)
                            .string()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AssignmentAssignees::Table, AssignmentAssignees::AssignmentId)
                            .to(Assignments::Table, Assignments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 提交表
        manager
            .create_table(
                Table::create()
                    .table(Submissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Submissions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Submissions::AssignmentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Submissions::InternUsername)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Submissions::SubmissionType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Submissions::SubmissionContent).text().null())
                    .col(ColumnDef::new(Submissions::FileUrl).string().null())
                    .col(ColumnDef::new(Submissions::FileName).string().null())
                    .col(
                        ColumnDef::new(Submissions::SubmittedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Submissions::IsLateSubmission)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Submissions::Status).string().not_null())
                    .col(ColumnDef::new(Submissions::ReviewRating).integer().null())
                    .col(ColumnDef::new(Submissions::ReviewComments).text().null())
                    .col(ColumnDef::new(Submissions::ReviewedAt).big_integer().null())
                    .col(ColumnDef::new(Submissions::ReviewedBy).string().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Submissions::Table, Submissions::AssignmentId)
                            .to(Assignments::Table, Assignments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 通知表
        manager
            .create_table(
                Table::create()
                    .table(Notifications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notifications::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Notifications::Recipient).string().not_null())
                    .col(ColumnDef::new(Notifications::Kind).string().not_null())
                    .col(ColumnDef::new(Notifications::Title).string().not_null())
                    .col(ColumnDef::new(Notifications::Content).text().not_null())
                    .col(
                        ColumnDef::new(Notifications::AssignmentId)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Notifications::IsRead)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Notifications::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_teams_name_org")
                    .table(Teams::Table)
                    .col(Teams::TeamName)
                    .col(Teams::OrganizationId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_team_members_unique")
                    .table(TeamMembers::Table)
                    .col(TeamMembers::TeamId)
                    .col(TeamMembers::Username)
                    .col(TeamMembers::Role)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_assignments_scope")
                    .table(Assignments::Table)
                    .col(Assignments::OrganizationId)
                    .col(Assignments::TeamName)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_assignments_from")
                    .table(Assignments::Table)
                    .col(Assignments::AssignmentFrom)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_assignment_assignees_unique")
                    .table(AssignmentAssignees::Table)
                    .col(AssignmentAssignees::AssignmentId)
                    .col(AssignmentAssignees::InternUsername)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 每位实习生在同一作业下最多一条提交
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_submissions_assignment_intern")
                    .table(Submissions::Table)
                    .col(Submissions::AssignmentId)
                    .col(Submissions::InternUsername)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_notifications_recipient")
                    .table(Notifications::Table)
                    .col(Notifications::Recipient)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按照创建的相反顺序删除
        manager
            .drop_table(Table::drop().table(Notifications::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Submissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AssignmentAssignees::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Assignments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TeamMembers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Teams::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(InternAccounts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StaffAccounts::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum StaffAccounts {
    #[sea_orm(iden = "staff_accounts")]
    Table,
    Id,
    Username,
    Email,
    DisplayName,
    Role,
    OrganizationId,
    OrganizationName,
    CreatedAt,
}

#[derive(DeriveIden)]
enum InternAccounts {
    #[sea_orm(iden = "intern_accounts")]
    Table,
    Id,
    Username,
    Email,
    DisplayName,
    OrganizationId,
    OrganizationName,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Teams {
    #[sea_orm(iden = "teams")]
    Table,
    Id,
    TeamName,
    OrganizationId,
    OrganizationName,
    CreatedAt,
}

#[derive(DeriveIden)]
enum TeamMembers {
    #[sea_orm(iden = "team_members")]
    Table,
    Id,
    TeamId,
    Username,
    Role,
}

#[derive(DeriveIden)]
enum Assignments {
    #[sea_orm(iden = "assignments")]
    Table,
    Id,
    OrganizationId,
    OrganizationName,
    TeamName,
    AssignmentFrom,
    AssignmentName,
    Description,
    Instructions,
    AssignedToAll,
    Deadline,
    Status,
    AcceptsSubmissions,
    MaxFileSize,
    AllowedSubmissionTypes,
    AllowLateSubmission,
    MentorFeedback,
    Revision,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum AssignmentAssignees {
    #[sea_orm(iden = "assignment_assignees")]
    Table,
    Id,
    AssignmentId,
    InternUsername,
}

#[derive(DeriveIden)]
enum Submissions {
    #[sea_orm(iden = "submissions")]
    Table,
    Id,
    AssignmentId,
    InternUsername,
    SubmissionType,
    SubmissionContent,
    FileUrl,
    FileName,
    SubmittedAt,
    IsLateSubmission,
    Status,
    ReviewRating,
    ReviewComments,
    ReviewedAt,
    ReviewedBy,
}

#[derive(DeriveIden)]
enum Notifications {
    #[sea_orm(iden = "notifications")]
    Table,
    Id,
    Recipient,
    Kind,
    Title,
    Content,
    AssignmentId,
    IsRead,
    CreatedAt,
}

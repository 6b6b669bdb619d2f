//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod accounts;
mod assignments;
mod notifications;
mod submissions;
mod teams;

#[cfg(test)]
mod tests;

use crate::config::AppConfig;
use crate::errors::{InternHubError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        let storage = Self::with_connection(db).await?;
        info!("SeaORM 存储初始化完成，数据库: {}", db_url);
        Ok(storage)
    }

    /// 在已有连接上运行迁移并构建存储
    pub async fn with_connection(db: DatabaseConnection) -> Result<Self> {
        Migrator::up(&db, None)
            .await
            .map_err(|e| InternHubError::database_operation(format!("数据库迁移失败: {e}")))?;
        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| InternHubError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| InternHubError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| InternHubError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(InternHubError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
use crate::models::{
    accounts::entities::{InternAccount, StaffAccount},
    assignments::{requests::AssignmentListQuery, responses::AssignmentListResponse},
    assignments::entities::Assignment,
    notifications::{
        entities::{NewNotification, Notification},
        responses::NotificationListResponse,
    },
    teams::entities::Team,
};
use crate::storage::{
    AssignmentChanges, AssignmentScope, NewAssignment, NewInternAccount, NewStaffAccount,
    NewSubmission, NewTeam, ReviewRecord, StatusChange, Storage, SubmissionInsert,
};
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 账号模块
    async fn get_staff_account(&self, username: &str) -> Result<Option<StaffAccount>> {
        self.get_staff_account_impl(username).await
    }

    async fn get_intern_account(&self, username: &str) -> Result<Option<InternAccount>> {
        self.get_intern_account_impl(username).await
    }

    async fn create_staff_account_if_absent(&self, account: NewStaffAccount) -> Result<bool> {
        self.create_staff_account_if_absent_impl(account).await
    }

    async fn create_intern_account_if_absent(&self, account: NewInternAccount) -> Result<bool> {
        self.create_intern_account_if_absent_impl(account).await
    }

    // 团队模块
    async fn get_team(&self, team_name: &str, organization_id: &str) -> Result<Option<Team>> {
        self.get_team_impl(team_name, organization_id).await
    }

    async fn list_intern_team_names(
        &self,
        username: &str,
        organization_id: &str,
    ) -> Result<Vec<String>> {
        self.list_intern_team_names_impl(username, organization_id)
            .await
    }

    async fn create_team_if_absent(&self, team: NewTeam) -> Result<bool> {
        self.create_team_if_absent_impl(team).await
    }

    // 作业模块
    async fn create_assignment(&self, assignment: NewAssignment) -> Result<Assignment> {
        self.create_assignment_impl(assignment).await
    }

    async fn get_assignment(&self, id: i64) -> Result<Option<Assignment>> {
        self.get_assignment_impl(id).await
    }

    async fn list_assignments_with_pagination(
        &self,
        scope: AssignmentScope,
        query: AssignmentListQuery,
    ) -> Result<AssignmentListResponse> {
        self.list_assignments_with_pagination_impl(scope, query)
            .await
    }

    async fn update_assignment_details(
        &self,
        id: i64,
        expected_revision: i64,
        changes: AssignmentChanges,
    ) -> Result<bool> {
        self.update_assignment_details_impl(id, expected_revision, changes)
            .await
    }

    async fn apply_status_change(
        &self,
        id: i64,
        expected_revision: i64,
        change: StatusChange,
    ) -> Result<bool> {
        self.apply_status_change_impl(id, expected_revision, change)
            .await
    }

    // 提交模块
    async fn insert_submission(&self, submission: NewSubmission) -> Result<SubmissionInsert> {
        self.insert_submission_impl(submission).await
    }

    async fn record_review(
        &self,
        assignment_id: i64,
        expected_revision: i64,
        record: ReviewRecord,
    ) -> Result<bool> {
        self.record_review_impl(assignment_id, expected_revision, record)
            .await
    }

    // 通知模块
    async fn create_notification(&self, notification: NewNotification) -> Result<Notification> {
        self.create_notification_impl(notification).await
    }

    async fn list_notifications_with_pagination(
        &self,
        recipient: &str,
        page: i64,
        size: i64,
    ) -> Result<NotificationListResponse> {
        self.list_notifications_with_pagination_impl(recipient, page, size)
            .await
    }
}

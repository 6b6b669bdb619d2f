//! 通知存储操作

use super::SeaOrmStorage;
use crate::entity::notifications::{ActiveModel, Column, Entity as Notifications};
use crate::errors::{InternHubError, Result};
use crate::models::{
    PaginationInfo,
    common::pagination::clamp_page,
    notifications::{
        entities::{NewNotification, Notification},
        responses::NotificationListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 创建通知
    pub async fn create_notification_impl(&self, new: NewNotification) -> Result<Notification> {
        let model = ActiveModel {
            recipient: Set(new.recipient),
            kind: Set(new.kind.as_str().to_string()),
            title: Set(new.title),
            content: Set(new.content),
            assignment_id: Set(new.assignment_id),
            is_read: Set(false),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| InternHubError::database_operation(format!("创建通知失败: {e}")))?;

        result.into_notification()
    }

    /// 列出接收人的通知（分页）
    pub async fn list_notifications_with_pagination_impl(
        &self,
        recipient: &str,
        page: i64,
        size: i64,
    ) -> Result<NotificationListResponse> {
        let (page, size) = clamp_page(Some(page), Some(size));

        let paginator = Notifications::find()
            .filter(Column::Recipient.eq(recipient))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size as u64);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| InternHubError::database_operation(format!("查询通知总数失败: {e}")))?;

        let items = paginator
            .fetch_page((page - 1) as u64)
            .await
            .map_err(|e| InternHubError::database_operation(format!("查询通知列表失败: {e}")))?
            .into_iter()
            .map(|m| m.into_notification())
            .collect::<Result<Vec<_>>>()?;

        Ok(NotificationListResponse {
            items,
            pagination: PaginationInfo::new(page, size, total as i64),
        })
    }
}

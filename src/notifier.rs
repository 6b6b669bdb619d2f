//! 通知投递
//!
//! 投递是即发即弃的：失败只记录日志，不影响触发它的工作流操作。

use std::sync::Arc;

use tracing::{debug, warn};

use crate::models::notifications::entities::NewNotification;
use crate::storage::Storage;

pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: NewNotification);
}

/// 在后台任务中写入通知表
pub struct StorageNotificationSink {
    storage: Arc<dyn Storage>,
}

impl StorageNotificationSink {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }
}

impl NotificationSink for StorageNotificationSink {
    fn notify(&self, notification: NewNotification) {
        let storage = self.storage.clone();
        tokio::spawn(async move {
            let recipient = notification.recipient.clone();
            match storage.create_notification(notification).await {
                Ok(saved) => debug!("Notification {} delivered to {}", saved.id, recipient),
                Err(e) => warn!("Failed to deliver notification to {}: {}", recipient, e),
            }
        });
    }
}

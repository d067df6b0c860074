use std::sync::Arc;

use uuid::Uuid;

use crate::database::repository::Repository;
use crate::error::Result;
use crate::models::notification::{Notification, NotificationCategory};
use crate::utils::time::Clock;

#[derive(Clone)]
pub struct NotificationService {
    notifications: Arc<dyn Repository<Notification>>,
    clock: Arc<dyn Clock>,
}

impl NotificationService {
    pub fn new(notifications: Arc<dyn Repository<Notification>>, clock: Arc<dyn Clock>) -> Self {
        Self {
            notifications,
            clock,
        }
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        category: NotificationCategory,
        message: impl Into<String>,
    ) -> Result<Notification> {
        let notification = Notification {
            id: Uuid::new_v4(),
            user_id,
            message: message.into(),
            category,
            is_read: false,
            created_at: self.clock.now(),
        };
        self.notifications.insert(notification).await
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Notification>> {
        self.notifications
            .find_all(Box::new(move |n: &Notification| n.user_id == user_id))
            .await
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Notification>> {
        self.notifications.get(id).await
    }

    /// Marks one notification read. Unknown ids and already-read
    /// notifications are left alone.
    pub async fn mark_read(&self, id: Uuid) -> Result<()> {
        self.notifications
            .update(id, Box::new(|n: &mut Notification| n.is_read = true))
            .await?;
        Ok(())
    }

    pub async fn mark_all_read(&self, user_id: Uuid) -> Result<usize> {
        let updated = self
            .notifications
            .update_where(
                Box::new(move |n: &Notification| n.user_id == user_id),
                Box::new(|n: &mut Notification| n.is_read = true),
            )
            .await?;
        tracing::debug!(%user_id, updated, "notifications marked read");
        Ok(updated)
    }

    pub async fn unread_count(&self, user_id: Uuid) -> Result<usize> {
        let unread = self
            .notifications
            .find_all(Box::new(move |n: &Notification| {
                n.user_id == user_id && !n.is_read
            }))
            .await?;
        Ok(unread.len())
    }
}

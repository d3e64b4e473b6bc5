//! # Notification Service
//!
//! Read side of the inbox. Notifications are only ever written by the
//! dispatcher.

use std::sync::Arc;

use uuid::Uuid;

use domains::{AppError, Identity, NotificationRepo, Result};

use crate::views::NotificationView;

#[derive(Clone)]
pub struct NotificationService {
    notifications: Arc<dyn NotificationRepo>,
}

impl NotificationService {
    pub fn new(notifications: Arc<dyn NotificationRepo>) -> Self {
        Self { notifications }
    }

    /// The caller's notifications, newest first.
    pub async fn list(&self, caller: &Identity) -> Result<Vec<NotificationView>> {
        let notifications = self.notifications.list_notifications_for(caller.id).await?;
        Ok(notifications.into_iter().map(NotificationView::from).collect())
    }

    /// Someone else's notification is reported as missing.
    pub async fn mark_read(&self, caller: &Identity, id: Uuid) -> Result<()> {
        if self.notifications.mark_notification_read(id, caller.id).await? {
            Ok(())
        } else {
            Err(AppError::not_found("Notification", id))
        }
    }

    pub async fn mark_all_read(&self, caller: &Identity) -> Result<u64> {
        let updated = self.notifications.mark_all_notifications_read(caller.id).await?;
        tracing::debug!(user_id = %caller.id, updated, "notifications marked read");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::{MockNotificationRepo, Role};

    fn caller() -> Identity {
        Identity {
            id: Uuid::now_v7(),
            username: "carol".into(),
            email: "carol@example.com".into(),
            role: Role::User,
        }
    }

    #[tokio::test]
    async fn foreign_notification_is_not_found() {
        let mut repo = MockNotificationRepo::new();
        repo.expect_mark_notification_read().returning(|_, _| Ok(false));

        let err = NotificationService::new(Arc::new(repo))
            .mark_read(&caller(), Uuid::now_v7())
            .await
            .unwrap_err();

        assert_eq!(err.public_message(), "Notification not found");
    }

    #[tokio::test]
    async fn mark_all_reports_count() {
        let me = caller();
        let id = me.id;
        let mut repo = MockNotificationRepo::new();
        repo.expect_mark_all_notifications_read()
            .withf(move |recipient| *recipient == id)
            .returning(|_| Ok(3));

        let updated = NotificationService::new(Arc::new(repo))
            .mark_all_read(&me)
            .await
            .unwrap();

        assert_eq!(updated, 3);
    }
}

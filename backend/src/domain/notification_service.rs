//! Notification listing and read-marking for the signed-in user.

use shared::NotificationView;

use crate::auth::AuthUser;
use crate::db::DbConnection;
use crate::domain::models::Notification;
use crate::error::AppError;
use crate::storage::notifications;

#[derive(Clone)]
pub struct NotificationService {
    db: DbConnection,
}

impl NotificationService {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    pub async fn list(
        &self,
        caller: &AuthUser,
        unread_only: bool,
    ) -> Result<Vec<NotificationView>, AppError> {
        let listed = notifications::list_for_user(self.db.pool(), &caller.id, unread_only).await?;
        Ok(listed.iter().map(Notification::view).collect())
    }

    pub async fn mark_read(&self, caller: &AuthUser, id: &str) -> Result<(), AppError> {
        if !notifications::mark_read(self.db.pool(), id, &caller.id).await? {
            return Err(AppError::NotFound("Notification"));
        }
        Ok(())
    }
}

use sqlx::PgPool;

use crate::api::pagination::{PageParams, Paginated};
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::Notification;

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Notification not found: {0}")]
    NotFound(i64),
    #[error("Notification belongs to another user")]
    NotRecipient,
}

pub struct NotificationService {
    pool: PgPool,
}

impl NotificationService {
    pub async fn new() -> Result<Self, DatabaseError> {
        let pool = DatabaseManager::pool().await?;
        Ok(Self { pool })
    }

    /// The recipient's notifications, newest first
    pub async fn list_for_user(
        &self,
        user_id: i64,
        params: PageParams,
    ) -> Result<Paginated<Notification>, NotificationError> {
        let (total,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM notifications WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;

        let rows = sqlx::query_as::<_, Notification>(
            r#"
            SELECT * FROM notifications
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(params.limit)
        .bind(params.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(Paginated::new(rows, total, params))
    }

    /// Mark a notification read. One-way: marking an already-read
    /// notification is a no-op success and never unsets the flag.
    pub async fn mark_read(
        &self,
        id: i64,
        requester_id: i64,
    ) -> Result<Notification, NotificationError> {
        let notification =
            sqlx::query_as::<_, Notification>("SELECT * FROM notifications WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or(NotificationError::NotFound(id))?;

        if notification.user_id != requester_id {
            return Err(NotificationError::NotRecipient);
        }

        if notification.is_read {
            return Ok(notification);
        }

        let updated = sqlx::query_as::<_, Notification>(
            "UPDATE notifications SET is_read = TRUE WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }
}

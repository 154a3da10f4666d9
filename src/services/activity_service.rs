use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{Activity, Itinerary};
use crate::middleware::AuthUser;
use crate::services::collaborator_service::resolve_capability;

#[derive(Debug, thiserror::Error)]
pub enum ActivityError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Activity not found: {0}")]
    NotFound(i64),
    #[error("Itinerary not found: {0}")]
    ItineraryNotFound(i64),
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    #[error("Invalid name: {0}")]
    InvalidName(String),
    #[error("Invalid times: {0}")]
    InvalidTimes(String),
}

/// Fields accepted when creating or replacing an activity
#[derive(Debug, Clone)]
pub struct ActivityInput {
    pub name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub location_name: String,
    pub address: Option<String>,
}

impl ActivityInput {
    /// Shape checks plus the containment invariant: the activity window
    /// must fall inside the parent itinerary's date range.
    fn validate(&self, itinerary: &Itinerary) -> Result<(), ActivityError> {
        if self.name.trim().is_empty() {
            return Err(ActivityError::InvalidName("Name is required".to_string()));
        }
        if self.location_name.trim().is_empty() {
            return Err(ActivityError::InvalidName(
                "Location name is required".to_string(),
            ));
        }
        if self.start_time > self.end_time {
            return Err(ActivityError::InvalidTimes(
                "Start time must not be after end time".to_string(),
            ));
        }
        if self.start_time < itinerary.start_date || self.end_time > itinerary.end_date {
            return Err(ActivityError::InvalidTimes(format!(
                "Activity must fall within the itinerary dates ({} to {})",
                itinerary.start_date.format("%Y-%m-%d"),
                itinerary.end_date.format("%Y-%m-%d")
            )));
        }
        Ok(())
    }
}

pub struct ActivityService {
    pool: PgPool,
}

impl ActivityService {
    pub async fn new() -> Result<Self, DatabaseError> {
        let pool = DatabaseManager::pool().await?;
        Ok(Self { pool })
    }

    pub async fn list_for_itinerary(&self, itinerary_id: i64) -> Result<Vec<Activity>, ActivityError> {
        self.find_itinerary(itinerary_id).await?;

        let activities = sqlx::query_as::<_, Activity>(
            "SELECT * FROM activities WHERE itinerary_id = $1 ORDER BY start_time ASC, id ASC",
        )
        .bind(itinerary_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(activities)
    }

    /// Add an activity to an itinerary (owner or editor)
    pub async fn create(
        &self,
        itinerary_id: i64,
        requester: &AuthUser,
        input: ActivityInput,
    ) -> Result<Activity, ActivityError> {
        let itinerary = self.find_itinerary(itinerary_id).await?;
        self.require_editor(&itinerary, requester, "add activities to")
            .await?;
        input.validate(&itinerary)?;

        let activity = sqlx::query_as::<_, Activity>(
            r#"
            INSERT INTO activities (itinerary_id, name, start_time, end_time, location_name, address, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(itinerary.id)
        .bind(input.name.trim())
        .bind(input.start_time)
        .bind(input.end_time)
        .bind(input.location_name.trim())
        .bind(&input.address)
        .bind(requester.user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(activity)
    }

    /// Replace an activity's fields (owner or editor)
    pub async fn update(
        &self,
        activity_id: i64,
        requester: &AuthUser,
        input: ActivityInput,
    ) -> Result<Activity, ActivityError> {
        let activity = self.get(activity_id).await?;
        let itinerary = self.find_itinerary(activity.itinerary_id).await?;
        self.require_editor(&itinerary, requester, "edit activities on")
            .await?;
        input.validate(&itinerary)?;

        let updated = sqlx::query_as::<_, Activity>(
            r#"
            UPDATE activities
            SET name = $2, start_time = $3, end_time = $4, location_name = $5, address = $6,
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(activity_id)
        .bind(input.name.trim())
        .bind(input.start_time)
        .bind(input.end_time)
        .bind(input.location_name.trim())
        .bind(&input.address)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    pub async fn delete(&self, activity_id: i64, requester: &AuthUser) -> Result<(), ActivityError> {
        let activity = self.get(activity_id).await?;
        let itinerary = self.find_itinerary(activity.itinerary_id).await?;
        self.require_editor(&itinerary, requester, "delete activities from")
            .await?;

        sqlx::query("DELETE FROM activities WHERE id = $1")
            .bind(activity_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn get(&self, id: i64) -> Result<Activity, ActivityError> {
        sqlx::query_as::<_, Activity>("SELECT * FROM activities WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(ActivityError::NotFound(id))
    }

    async fn find_itinerary(&self, id: i64) -> Result<Itinerary, ActivityError> {
        sqlx::query_as::<_, Itinerary>("SELECT * FROM itineraries WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(ActivityError::ItineraryNotFound(id))
    }

    async fn require_editor(
        &self,
        itinerary: &Itinerary,
        requester: &AuthUser,
        action: &str,
    ) -> Result<(), ActivityError> {
        let capability = resolve_capability(&self.pool, itinerary, requester.user_id).await?;
        if !capability.can_edit() {
            return Err(ActivityError::PermissionDenied(format!(
                "Only the owner or an editor can {} this itinerary",
                action
            )));
        }
        Ok(())
    }
}

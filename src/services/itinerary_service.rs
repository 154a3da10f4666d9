use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::access::Capability;
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{Activity, CollaboratorWithUser, Itinerary};
use crate::middleware::AuthUser;
use crate::services::collaborator_service::resolve_capability;

#[derive(Debug, thiserror::Error)]
pub enum ItineraryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Itinerary not found: {0}")]
    NotFound(i64),
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    #[error("Invalid title: {0}")]
    InvalidTitle(String),
    #[error("Invalid dates: {0}")]
    InvalidDates(String),
    #[error("Itinerary still has activities")]
    HasActivities,
}

/// Fields accepted when creating or replacing an itinerary
#[derive(Debug, Clone)]
pub struct ItineraryInput {
    pub title: String,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl ItineraryInput {
    fn validate(&self) -> Result<(), ItineraryError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ItineraryError::InvalidTitle("Title is required".to_string()));
        }
        if title.len() > 200 {
            return Err(ItineraryError::InvalidTitle(
                "Title must be less than 200 characters".to_string(),
            ));
        }
        if self.start_date > self.end_date {
            return Err(ItineraryError::InvalidDates(
                "Start date must not be after end date".to_string(),
            ));
        }
        Ok(())
    }
}

/// Detail view: the itinerary plus everything the page renders -
/// the requester's capability, collaborators, and activities.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryDetail {
    #[serde(flatten)]
    pub itinerary: Itinerary,
    pub capability: Capability,
    pub collaborators: Vec<CollaboratorWithUser>,
    pub activities: Vec<Activity>,
}

pub struct ItineraryService {
    pool: PgPool,
}

impl ItineraryService {
    pub async fn new() -> Result<Self, DatabaseError> {
        let pool = DatabaseManager::pool().await?;
        Ok(Self { pool })
    }

    pub async fn create(
        &self,
        owner: &AuthUser,
        input: ItineraryInput,
    ) -> Result<Itinerary, ItineraryError> {
        input.validate()?;

        let itinerary = sqlx::query_as::<_, Itinerary>(
            r#"
            INSERT INTO itineraries (title, description, start_date, end_date, owner_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(input.title.trim())
        .bind(&input.description)
        .bind(input.start_date)
        .bind(input.end_date)
        .bind(owner.user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(itinerary)
    }

    /// Everything the requester can see: itineraries they own plus ones
    /// shared with them
    pub async fn list_visible(&self, user_id: i64) -> Result<Vec<Itinerary>, ItineraryError> {
        let itineraries = sqlx::query_as::<_, Itinerary>(
            r#"
            SELECT DISTINCT i.*
            FROM itineraries i
            LEFT JOIN collaborators c ON c.itinerary_id = i.id
            WHERE i.owner_id = $1 OR c.user_id = $1
            ORDER BY i.start_date ASC, i.id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(itineraries)
    }

    /// Detail view for rendering: reads are not hard-denied, so any
    /// authenticated user gets the itinerary with their resolved capability
    pub async fn detail(
        &self,
        id: i64,
        requester_id: i64,
    ) -> Result<ItineraryDetail, ItineraryError> {
        let itinerary = self.get(id).await?;
        let capability = resolve_capability(&self.pool, &itinerary, requester_id).await?;

        let collaborators = sqlx::query_as::<_, CollaboratorWithUser>(
            r#"
            SELECT c.id, c.itinerary_id, c.user_id, c.role, c.created_at,
                   u.name AS user_name, u.email AS user_email
            FROM collaborators c
            JOIN users u ON u.id = c.user_id
            WHERE c.itinerary_id = $1
            ORDER BY c.created_at ASC
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let activities = sqlx::query_as::<_, Activity>(
            "SELECT * FROM activities WHERE itinerary_id = $1 ORDER BY start_time ASC, id ASC",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ItineraryDetail {
            itinerary,
            capability,
            collaborators,
            activities,
        })
    }

    pub async fn get(&self, id: i64) -> Result<Itinerary, ItineraryError> {
        sqlx::query_as::<_, Itinerary>("SELECT * FROM itineraries WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(ItineraryError::NotFound(id))
    }

    /// Replace title/description/dates. Owner only; ownership itself is
    /// immutable.
    pub async fn update(
        &self,
        id: i64,
        requester: &AuthUser,
        input: ItineraryInput,
    ) -> Result<Itinerary, ItineraryError> {
        let itinerary = self.get(id).await?;
        self.require_owner(&itinerary, requester, "Only the owner can edit an itinerary")
            .await?;
        input.validate()?;

        let updated = sqlx::query_as::<_, Itinerary>(
            r#"
            UPDATE itineraries
            SET title = $2, description = $3, start_date = $4, end_date = $5, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(input.title.trim())
        .bind(&input.description)
        .bind(input.start_date)
        .bind(input.end_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    /// Delete an itinerary. Blocked while activities still reference it;
    /// collaborator rows and notifications go with it.
    pub async fn delete(&self, id: i64, requester: &AuthUser) -> Result<(), ItineraryError> {
        let itinerary = self.get(id).await?;
        self.require_owner(&itinerary, requester, "Only the owner can delete an itinerary")
            .await?;

        let (activity_count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM activities WHERE itinerary_id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        if activity_count > 0 {
            return Err(ItineraryError::HasActivities);
        }

        sqlx::query("DELETE FROM itineraries WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn require_owner(
        &self,
        itinerary: &Itinerary,
        requester: &AuthUser,
        denial: &str,
    ) -> Result<(), ItineraryError> {
        let capability = resolve_capability(&self.pool, itinerary, requester.user_id).await?;
        if !capability.is_owner() {
            return Err(ItineraryError::PermissionDenied(denial.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn input(title: &str, start: (i32, u32, u32), end: (i32, u32, u32)) -> ItineraryInput {
        ItineraryInput {
            title: title.to_string(),
            description: None,
            start_date: Utc
                .with_ymd_and_hms(start.0, start.1, start.2, 0, 0, 0)
                .unwrap(),
            end_date: Utc.with_ymd_and_hms(end.0, end.1, end.2, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn validates_title_and_date_order() {
        assert!(input("Lisbon", (2025, 1, 1), (2025, 1, 10)).validate().is_ok());
        assert!(matches!(
            input("", (2025, 1, 1), (2025, 1, 10)).validate(),
            Err(ItineraryError::InvalidTitle(_))
        ));
        assert!(matches!(
            input("   ", (2025, 1, 1), (2025, 1, 10)).validate(),
            Err(ItineraryError::InvalidTitle(_))
        ));
        assert!(matches!(
            input("Lisbon", (2025, 1, 10), (2025, 1, 1)).validate(),
            Err(ItineraryError::InvalidDates(_))
        ));
        // Single-day trips are allowed
        assert!(input("Lisbon", (2025, 1, 1), (2025, 1, 1)).validate().is_ok());
    }
}

use serde::Serialize;
use sqlx::PgPool;

use crate::access::{self, Capability, CollaboratorRoles};
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{Collaborator, CollaboratorWithUser, Itinerary, Notification, Role, User};
use crate::middleware::AuthUser;

#[derive(Debug, thiserror::Error)]
pub enum CollaboratorError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Itinerary not found: {0}")]
    ItineraryNotFound(i64),
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    #[error("Invalid email: {0}")]
    InvalidEmail(String),
    #[error("User not found: {0}")]
    UserNotFound(String),
    #[error("Cannot invite the itinerary owner")]
    OwnerInvite,
    #[error("Collaborator not found")]
    CollaboratorNotFound,
}

/// Load an itinerary's collaborator rows and resolve the requester's
/// capability. Rows are fetched in write order so a duplicate (which the
/// unique constraint forbids) would resolve to its most recent role.
pub async fn resolve_capability(
    pool: &PgPool,
    itinerary: &Itinerary,
    user_id: i64,
) -> Result<Capability, sqlx::Error> {
    let rows = sqlx::query_as::<_, Collaborator>(
        "SELECT * FROM collaborators WHERE itinerary_id = $1 ORDER BY updated_at ASC, id ASC",
    )
    .bind(itinerary.id)
    .fetch_all(pool)
    .await?;

    let roles = CollaboratorRoles::from_rows(&rows);
    Ok(access::resolve(itinerary.owner_id, &roles, user_id))
}

/// Outcome of a successful invite.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteOutcome {
    pub message: String,
    pub collaborator: Collaborator,
}

pub struct CollaboratorService {
    pool: PgPool,
}

impl CollaboratorService {
    pub async fn new() -> Result<Self, DatabaseError> {
        let pool = DatabaseManager::pool().await?;
        Ok(Self { pool })
    }

    /// List an itinerary's collaborators with user info
    pub async fn list(&self, itinerary_id: i64) -> Result<Vec<CollaboratorWithUser>, CollaboratorError> {
        self.find_itinerary(itinerary_id).await?;

        let rows = sqlx::query_as::<_, CollaboratorWithUser>(
            r#"
            SELECT c.id, c.itinerary_id, c.user_id, c.role, c.created_at,
                   u.name AS user_name, u.email AS user_email
            FROM collaborators c
            JOIN users u ON u.id = c.user_id
            WHERE c.itinerary_id = $1
            ORDER BY c.created_at ASC
            "#,
        )
        .bind(itinerary_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Grant or change a user's role on an itinerary and notify them.
    ///
    /// Only the owner may invite. Re-inviting an existing collaborator
    /// overwrites their role in place; the collaborator upsert and the
    /// notification insert commit together or not at all.
    pub async fn invite(
        &self,
        itinerary_id: i64,
        inviter: &AuthUser,
        email: &str,
        role: Role,
    ) -> Result<InviteOutcome, CollaboratorError> {
        let itinerary = self.find_itinerary(itinerary_id).await?;

        let capability = resolve_capability(&self.pool, &itinerary, inviter.user_id).await?;
        if !capability.is_owner() {
            return Err(CollaboratorError::PermissionDenied(
                "Only the itinerary owner can invite collaborators".to_string(),
            ));
        }

        super::validate_email(email).map_err(CollaboratorError::InvalidEmail)?;

        let invitee = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| CollaboratorError::UserNotFound(email.to_string()))?;

        if invitee.id == itinerary.owner_id {
            return Err(CollaboratorError::OwnerInvite);
        }

        let mut tx = self.pool.begin().await?;

        let collaborator = sqlx::query_as::<_, Collaborator>(
            r#"
            INSERT INTO collaborators (itinerary_id, user_id, role)
            VALUES ($1, $2, $3)
            ON CONFLICT (itinerary_id, user_id)
            DO UPDATE SET role = EXCLUDED.role, updated_at = now()
            RETURNING *
            "#,
        )
        .bind(itinerary.id)
        .bind(invitee.id)
        .bind(role)
        .fetch_one(&mut *tx)
        .await?;

        let message = format!(
            "{} invited you to collaborate on \"{}\" as {}",
            inviter.name, itinerary.title, role
        );
        sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications (user_id, itinerary_id, message)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(invitee.id)
        .bind(itinerary.id)
        .bind(&message)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            "user {} granted {} role {} on itinerary {}",
            inviter.user_id,
            invitee.id,
            role,
            itinerary.id
        );

        Ok(InviteOutcome {
            message: format!(
                "{} was granted {} access to \"{}\"",
                invitee.name, role, itinerary.title
            ),
            collaborator,
        })
    }

    /// Revoke a collaborator's access (owner only)
    pub async fn remove(
        &self,
        itinerary_id: i64,
        requester: &AuthUser,
        user_id: i64,
    ) -> Result<(), CollaboratorError> {
        let itinerary = self.find_itinerary(itinerary_id).await?;

        let capability = resolve_capability(&self.pool, &itinerary, requester.user_id).await?;
        if !capability.is_owner() {
            return Err(CollaboratorError::PermissionDenied(
                "Only the itinerary owner can remove collaborators".to_string(),
            ));
        }

        let deleted = sqlx::query("DELETE FROM collaborators WHERE itinerary_id = $1 AND user_id = $2")
            .bind(itinerary_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(CollaboratorError::CollaboratorNotFound);
        }

        Ok(())
    }

    async fn find_itinerary(&self, id: i64) -> Result<Itinerary, CollaboratorError> {
        sqlx::query_as::<_, Itinerary>("SELECT * FROM itineraries WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(CollaboratorError::ItineraryNotFound(id))
    }
}

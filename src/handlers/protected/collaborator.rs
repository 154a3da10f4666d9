use axum::{extract::Path, Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use super::utils::parse_id;
use crate::database::models::{CollaboratorWithUser, Role};
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::middleware::AuthUser;
use crate::services::collaborator_service::InviteOutcome;
use crate::services::CollaboratorService;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteRequest {
    pub itinerary_id: i64,
    pub email: String,
    pub role: Role,
}

/// GET /api/itineraries/:id/collaborators - Collaborators with user info
pub async fn list(Path(itinerary_id): Path<String>) -> ApiResult<Vec<CollaboratorWithUser>> {
    let itinerary_id = parse_id(&itinerary_id, "itinerary")?;
    let service = CollaboratorService::new().await?;
    let collaborators = service.list(itinerary_id).await?;

    Ok(ApiResponse::success(collaborators))
}

/// POST /api/collaborators - Invite a user by email (owner only).
/// Re-inviting an existing collaborator updates their role.
pub async fn invite(
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<InviteRequest>,
) -> ApiResult<InviteOutcome> {
    let service = CollaboratorService::new().await?;
    let outcome = service
        .invite(payload.itinerary_id, &auth, &payload.email, payload.role)
        .await?;

    Ok(ApiResponse::created(outcome))
}

/// DELETE /api/itineraries/:id/collaborators/:user_id - Revoke access (owner only)
pub async fn remove(
    Extension(auth): Extension<AuthUser>,
    Path((itinerary_id, user_id)): Path<(String, String)>,
) -> ApiResult<Value> {
    let itinerary_id = parse_id(&itinerary_id, "itinerary")?;
    let user_id = parse_id(&user_id, "user")?;
    let service = CollaboratorService::new().await?;
    service.remove(itinerary_id, &auth, user_id).await?;

    Ok(ApiResponse::success(json!({
        "message": format!("Collaborator {} removed from itinerary {}", user_id, itinerary_id)
    })))
}

use axum::{extract::Path, Extension, Json};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use super::utils::parse_id;
use crate::database::models::Activity;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::middleware::AuthUser;
use crate::services::activity_service::ActivityInput;
use crate::services::ActivityService;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRequest {
    pub name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub location_name: String,
    pub address: Option<String>,
}

impl From<ActivityRequest> for ActivityInput {
    fn from(req: ActivityRequest) -> Self {
        Self {
            name: req.name,
            start_time: req.start_time,
            end_time: req.end_time,
            location_name: req.location_name,
            address: req.address,
        }
    }
}

/// GET /api/itineraries/:id/activities - Activities in schedule order
pub async fn list(Path(itinerary_id): Path<String>) -> ApiResult<Vec<Activity>> {
    let itinerary_id = parse_id(&itinerary_id, "itinerary")?;
    let service = ActivityService::new().await?;
    let activities = service.list_for_itinerary(itinerary_id).await?;

    Ok(ApiResponse::success(activities))
}

/// POST /api/itineraries/:id/activities - Add an activity (owner or editor)
pub async fn create(
    Extension(auth): Extension<AuthUser>,
    Path(itinerary_id): Path<String>,
    Json(payload): Json<ActivityRequest>,
) -> ApiResult<Activity> {
    let itinerary_id = parse_id(&itinerary_id, "itinerary")?;
    let service = ActivityService::new().await?;
    let activity = service.create(itinerary_id, &auth, payload.into()).await?;

    Ok(ApiResponse::created(activity))
}

/// PUT /api/activities/:id - Replace an activity (owner or editor)
pub async fn update(
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(payload): Json<ActivityRequest>,
) -> ApiResult<Activity> {
    let id = parse_id(&id, "activity")?;
    let service = ActivityService::new().await?;
    let activity = service.update(id, &auth, payload.into()).await?;

    Ok(ApiResponse::success(activity))
}

/// DELETE /api/activities/:id - Delete an activity (owner or editor)
pub async fn remove(
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let id = parse_id(&id, "activity")?;
    let service = ActivityService::new().await?;
    service.delete(id, &auth).await?;

    Ok(ApiResponse::success(json!({
        "message": format!("Activity {} deleted", id)
    })))
}

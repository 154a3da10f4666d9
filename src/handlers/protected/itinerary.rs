use axum::{
    extract::{Path, Query},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use super::utils::parse_id;
use crate::api::pagination::{PageQuery, Paginated};
use crate::database::models::Itinerary;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::middleware::AuthUser;
use crate::services::itinerary_service::{ItineraryDetail, ItineraryInput};
use crate::services::ItineraryService;
use crate::timeline::{self, SortKey, SortOrder, TemporalFilter};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryQuery {
    /// Temporal class: upcoming, ongoing, or past
    pub filter: Option<TemporalFilter>,
    /// Sort key: startDate or title
    pub sort: Option<SortKey>,
    /// Sort direction: asc or desc
    pub order: Option<SortOrder>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryRequest {
    pub title: String,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl From<ItineraryRequest> for ItineraryInput {
    fn from(req: ItineraryRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            start_date: req.start_date,
            end_date: req.end_date,
        }
    }
}

/// GET /api/itineraries - Owned and shared itineraries, filtered and sorted
pub async fn list(
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<ItineraryQuery>,
) -> ApiResult<Paginated<Itinerary>> {
    let service = ItineraryService::new().await?;
    let mut itineraries = service.list_visible(auth.user_id).await?;

    if let Some(filter) = query.filter {
        itineraries = timeline::filter_itineraries(itineraries, filter, Utc::now());
    }
    timeline::sort_itineraries(
        &mut itineraries,
        query.sort.unwrap_or(SortKey::StartDate),
        query.order.unwrap_or(SortOrder::Asc),
    );

    let params = PageQuery {
        page: query.page,
        limit: query.limit,
    }
    .resolve();

    Ok(ApiResponse::success(Paginated::slice(itineraries, params)))
}

/// POST /api/itineraries - Create an itinerary owned by the caller
pub async fn create(
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<ItineraryRequest>,
) -> ApiResult<Itinerary> {
    let service = ItineraryService::new().await?;
    let itinerary = service.create(&auth, payload.into()).await?;

    Ok(ApiResponse::created(itinerary))
}

/// GET /api/itineraries/:id - Detail with capability, collaborators, activities
pub async fn detail(
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<ItineraryDetail> {
    let id = parse_id(&id, "itinerary")?;
    let service = ItineraryService::new().await?;
    let detail = service.detail(id, auth.user_id).await?;

    Ok(ApiResponse::success(detail))
}

/// PUT /api/itineraries/:id - Replace title/description/dates (owner only)
pub async fn update(
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(payload): Json<ItineraryRequest>,
) -> ApiResult<Itinerary> {
    let id = parse_id(&id, "itinerary")?;
    let service = ItineraryService::new().await?;
    let itinerary = service.update(id, &auth, payload.into()).await?;

    Ok(ApiResponse::success(itinerary))
}

/// DELETE /api/itineraries/:id - Delete (owner only, blocked while activities exist)
pub async fn remove(
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let id = parse_id(&id, "itinerary")?;
    let service = ItineraryService::new().await?;
    service.delete(id, &auth).await?;

    Ok(ApiResponse::success(json!({
        "message": format!("Itinerary {} deleted", id)
    })))
}

use axum::{
    extract::{Path, Query},
    Extension,
};

use super::utils::parse_id;
use crate::api::pagination::{PageQuery, Paginated};
use crate::database::models::Notification;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::middleware::AuthUser;
use crate::services::NotificationService;

/// GET /api/notifications - The caller's notifications, newest first
pub async fn list(
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Paginated<Notification>> {
    let service = NotificationService::new().await?;
    let page = service.list_for_user(auth.user_id, query.resolve()).await?;

    Ok(ApiResponse::success(page))
}

/// PUT /api/notifications/:id/read - Mark one notification read (one-way)
pub async fn mark_read(
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Notification> {
    let id = parse_id(&id, "notification")?;
    let service = NotificationService::new().await?;
    let notification = service.mark_read(id, auth.user_id).await?;

    Ok(ApiResponse::success(notification))
}

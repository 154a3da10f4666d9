use axum::Json;
use serde::Deserialize;

use super::utils::{issue_session, SessionData};
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::UserService;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// POST /auth/register - Create an account and issue a session token
pub async fn register(Json(payload): Json<RegisterRequest>) -> ApiResult<SessionData> {
    let service = UserService::new().await?;
    let user = service
        .register(&payload.name, &payload.email, &payload.password)
        .await?;

    tracing::info!("registered user {} ({})", user.id, user.email);

    Ok(ApiResponse::created(issue_session(user)?))
}

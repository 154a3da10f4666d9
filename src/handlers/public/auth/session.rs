use axum::Json;
use serde::Deserialize;

use super::utils::{issue_session, SessionData};
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::UserService;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /auth/login - Authenticate and receive a JWT for the protected API
pub async fn login(Json(payload): Json<LoginRequest>) -> ApiResult<SessionData> {
    let service = UserService::new().await?;
    let user = service
        .authenticate(&payload.email, &payload.password)
        .await?;

    tracing::info!("user {} logged in", user.id);

    Ok(ApiResponse::success(issue_session(user)?))
}

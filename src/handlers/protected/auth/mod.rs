use axum::Extension;

use crate::database::models::User;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::middleware::AuthUser;
use crate::services::UserService;

/// GET /api/auth/whoami - Current authenticated user details
pub async fn whoami(Extension(auth): Extension<AuthUser>) -> ApiResult<User> {
    let service = UserService::new().await?;
    let user = service.find_by_id(auth.user_id).await?;

    Ok(ApiResponse::success(user))
}

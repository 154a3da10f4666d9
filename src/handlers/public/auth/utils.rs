use serde::Serialize;

use crate::auth::{generate_jwt, Claims};
use crate::config;
use crate::database::models::User;
use crate::error::ApiError;

/// Token payload returned by register and login
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionData {
    pub token: String,
    pub user: User,
    pub expires_in: u64,
}

pub fn issue_session(user: User) -> Result<SessionData, ApiError> {
    let claims = Claims::new(user.id, user.name.clone(), user.email.clone());
    let token = generate_jwt(claims)?;
    let expires_in = config::config().security.jwt_expiry_hours * 3600;

    Ok(SessionData {
        token,
        user,
        expires_in,
    })
}

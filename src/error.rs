//! HTTP error surface: one enum with a stable code per variant and a JSON
//! error envelope. Service-level errors convert in here; internal causes
//! are logged and never leaked to clients.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use std::collections::HashMap;

#[derive(Debug)]
pub enum ApiError {
    /// 400 - malformed input: bad email, bad id, missing required field
    Validation {
        message: String,
        field_errors: Option<HashMap<String, String>>,
    },
    /// 401 - missing or invalid bearer token
    Unauthorized(String),
    /// 403 - caller lacks the required capability
    Forbidden(String),
    /// 404 - referenced entity absent
    NotFound(String),
    /// 409 - blocked by dependent records or a uniqueness clash
    Conflict(String),
    /// 500 - data-store or auth-provider failure, reported opaquely
    Internal(String),
    /// 503 - database unreachable or service not configured
    Unavailable(String),
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Validation { .. } => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ApiError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_SERVER_ERROR"),
            ApiError::Unavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE"),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.parts().0
    }

    /// Stable code for client-side handling
    pub fn code(&self) -> &'static str {
        self.parts().1
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::Validation { message, .. } => message,
            ApiError::Unauthorized(m)
            | ApiError::Forbidden(m)
            | ApiError::NotFound(m)
            | ApiError::Conflict(m)
            | ApiError::Internal(m)
            | ApiError::Unavailable(m) => m,
        }
    }

    /// The error envelope: `{"error": true, "message", "code"}` plus
    /// per-field detail when validation produced any.
    pub fn body(&self) -> Value {
        let mut body = json!({
            "error": true,
            "message": self.message(),
            "code": self.code(),
        });
        if let ApiError::Validation {
            field_errors: Some(fields),
            ..
        } = self
        {
            body["field_errors"] = json!(fields);
        }
        body
    }
}

// Constructors, so conversions below and call sites stay terse
impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
            field_errors: None,
        }
    }

    /// Validation failure pinned to a single input field
    pub fn field_validation(
        message: impl Into<String>,
        field: &str,
        detail: impl Into<String>,
    ) -> Self {
        let mut field_errors = HashMap::new();
        field_errors.insert(field.to_string(), detail.into());
        ApiError::Validation {
            message: message.into(),
            field_errors: Some(field_errors),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        ApiError::Unavailable(message.into())
    }
}

/// Shared mapping for raw sqlx errors carried inside service errors.
/// Logs the real cause and returns a generic message to the client.
fn from_sqlx(context: &str, err: sqlx::Error) -> ApiError {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => {
            tracing::error!("{} connection error: {}", context, err);
            ApiError::unavailable("Database temporarily unavailable")
        }
        other => {
            tracing::error!("{} query error: {}", context, other);
            ApiError::internal("An error occurred while processing your request")
        }
    }
}

impl From<crate::database::manager::DatabaseError> for ApiError {
    fn from(err: crate::database::manager::DatabaseError) -> Self {
        use crate::database::manager::DatabaseError;
        match err {
            DatabaseError::ConfigMissing(name) => {
                tracing::error!("missing configuration: {}", name);
                ApiError::unavailable("Database not configured")
            }
            DatabaseError::InvalidDatabaseUrl => {
                tracing::error!("invalid DATABASE_URL");
                ApiError::unavailable("Database not configured")
            }
            DatabaseError::MigrationError(msg) => {
                tracing::error!("Migration error: {}", msg);
                ApiError::unavailable("Service is being updated, please try again later")
            }
            DatabaseError::Sqlx(sqlx_err) => from_sqlx("database", sqlx_err),
        }
    }
}

impl From<crate::services::user_service::UserError> for ApiError {
    fn from(err: crate::services::user_service::UserError) -> Self {
        use crate::services::user_service::UserError;
        match err {
            UserError::Database(e) => from_sqlx("user service", e),
            UserError::InvalidEmail(msg) => {
                ApiError::field_validation("Invalid email address", "email", msg)
            }
            UserError::InvalidName(msg) => ApiError::field_validation("Invalid name", "name", msg),
            UserError::WeakPassword(msg) => {
                ApiError::field_validation("Invalid password", "password", msg)
            }
            UserError::EmailTaken(email) => {
                ApiError::conflict(format!("An account already exists for {}", email))
            }
            UserError::InvalidCredentials => ApiError::unauthorized("Invalid email or password"),
            UserError::NotFound => ApiError::not_found("User not found"),
        }
    }
}

impl From<crate::services::itinerary_service::ItineraryError> for ApiError {
    fn from(err: crate::services::itinerary_service::ItineraryError) -> Self {
        use crate::services::itinerary_service::ItineraryError;
        match err {
            ItineraryError::Database(e) => from_sqlx("itinerary service", e),
            ItineraryError::NotFound(id) => {
                ApiError::not_found(format!("Itinerary {} not found", id))
            }
            ItineraryError::PermissionDenied(msg) => ApiError::forbidden(msg),
            ItineraryError::InvalidTitle(msg) | ItineraryError::InvalidDates(msg) => {
                ApiError::validation(msg)
            }
            ItineraryError::HasActivities => {
                ApiError::conflict("Cannot delete itinerary: delete related activities first")
            }
        }
    }
}

impl From<crate::services::activity_service::ActivityError> for ApiError {
    fn from(err: crate::services::activity_service::ActivityError) -> Self {
        use crate::services::activity_service::ActivityError;
        match err {
            ActivityError::Database(e) => from_sqlx("activity service", e),
            ActivityError::NotFound(id) => ApiError::not_found(format!("Activity {} not found", id)),
            ActivityError::ItineraryNotFound(id) => {
                ApiError::not_found(format!("Itinerary {} not found", id))
            }
            ActivityError::PermissionDenied(msg) => ApiError::forbidden(msg),
            ActivityError::InvalidName(msg) | ActivityError::InvalidTimes(msg) => {
                ApiError::validation(msg)
            }
        }
    }
}

impl From<crate::services::collaborator_service::CollaboratorError> for ApiError {
    fn from(err: crate::services::collaborator_service::CollaboratorError) -> Self {
        use crate::services::collaborator_service::CollaboratorError;
        match err {
            CollaboratorError::Database(e) => from_sqlx("collaborator service", e),
            CollaboratorError::ItineraryNotFound(id) => {
                ApiError::not_found(format!("Itinerary {} not found", id))
            }
            CollaboratorError::PermissionDenied(msg) => ApiError::forbidden(msg),
            CollaboratorError::InvalidEmail(msg) => {
                ApiError::field_validation("Invalid email address", "email", msg)
            }
            CollaboratorError::UserNotFound(email) => {
                ApiError::not_found(format!("User {} does not exist", email))
            }
            CollaboratorError::OwnerInvite => {
                ApiError::validation("The itinerary owner already has full access")
            }
            CollaboratorError::CollaboratorNotFound => {
                ApiError::not_found("Collaborator not found on this itinerary")
            }
        }
    }
}

impl From<crate::services::notification_service::NotificationError> for ApiError {
    fn from(err: crate::services::notification_service::NotificationError) -> Self {
        use crate::services::notification_service::NotificationError;
        match err {
            NotificationError::Database(e) => from_sqlx("notification service", e),
            NotificationError::NotFound(id) => {
                ApiError::not_found(format!("Notification {} not found", id))
            }
            NotificationError::NotRecipient => {
                ApiError::forbidden("Notification belongs to another user")
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status(), Json(self.body())).into_response()
    }
}

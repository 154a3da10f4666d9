pub mod activity_service;
pub mod collaborator_service;
pub mod itinerary_service;
pub mod notification_service;
pub mod user_service;

pub use activity_service::ActivityService;
pub use collaborator_service::CollaboratorService;
pub use itinerary_service::ItineraryService;
pub use notification_service::NotificationService;
pub use user_service::UserService;

/// Validate email shape: one '@', non-empty local part, dotted domain,
/// no whitespace. Full RFC parsing is out of scope; this matches what the
/// registration form accepts.
pub(crate) fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }
    if email.len() > 254 {
        return Err("Email is too long".to_string());
    }
    if email.chars().any(|c| c.is_whitespace()) {
        return Err("Email cannot contain whitespace".to_string());
    }

    let mut parts = email.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => return Err("Email must contain exactly one '@'".to_string()),
    };

    if local.is_empty() {
        return Err("Email is missing the part before '@'".to_string());
    }
    if domain.is_empty() || !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err("Email domain is not valid".to_string());
    }

    Ok(())
}

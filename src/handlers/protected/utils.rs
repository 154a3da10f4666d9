use crate::error::ApiError;

/// Parse a numeric path id, reporting a validation error (not a bare 404)
/// for non-numeric input
pub(crate) fn parse_id(raw: &str, what: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>()
        .map_err(|_| ApiError::validation(format!("Invalid {} id: {}", what, raw)))
}

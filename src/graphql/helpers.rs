use async_graphql::ID;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// Ids are uuid v4 strings; reject anything else before it reaches storage.
pub fn parse_id(id: &ID) -> AppResult<String> {
    Uuid::parse_str(id.as_str())
        .map(|uuid| uuid.to_string())
        .map_err(|_| AppError::ValidationError("Invalid UUID format".to_string()))
}

pub fn require_non_blank<'a>(field: &str, value: &'a str) -> AppResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::ValidationError(format!("{} must not be empty", field)));
    }
    Ok(trimmed)
}

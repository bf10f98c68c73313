//! Document store abstraction shared by the MongoDB and in-memory backends.

use crate::models::Document;
use async_trait::async_trait;
use service_core::error::AppError;
use thiserror::Error;

pub const POSTS: &str = "posts";
pub const JOBS: &str = "jobs";
pub const USERS: &str = "users";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Document with ID {id} not found in {collection}")]
    NotFound { collection: String, id: String },

    #[error("Document store unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to fetch document: {0}")]
    Internal(#[source] anyhow::Error),
}

impl StoreError {
    pub fn not_found(collection: &str, id: &str) -> Self {
        StoreError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }

    /// Short label for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::NotFound { .. } => "not_found",
            StoreError::Unavailable(_) => "unavailable",
            StoreError::InvalidInput(_) => "invalid_input",
            StoreError::Internal(_) => "internal",
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => AppError::NotFound(anyhow::anyhow!(err.to_string())),
            StoreError::Unavailable(reason) => {
                tracing::error!(reason = %reason, "Document store unavailable");
                AppError::ServiceUnavailable
            }
            StoreError::InvalidInput(reason) => AppError::BadRequest(anyhow::anyhow!(reason)),
            StoreError::Internal(source) => AppError::InternalError(source),
        }
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Point lookup of `id` in `collection`.
    async fn get_document(&self, collection: &str, id: &str) -> Result<Document, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;

    fn backend_name(&self) -> &'static str;
}

/// Keys must be non-blank and must not contain a path separator.
pub fn validate_key(collection: &str, id: &str) -> Result<(), StoreError> {
    if collection.trim().is_empty() {
        return Err(StoreError::InvalidInput(
            "Collection name is required".to_string(),
        ));
    }
    if id.trim().is_empty() {
        return Err(StoreError::InvalidInput("Document ID is required".to_string()));
    }
    if id.contains('/') {
        return Err(StoreError::InvalidInput(format!(
            "Document ID {} must not contain '/'",
            id
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn not_found_maps_to_404_with_message() {
        let err: AppError = StoreError::not_found(POSTS, "p1").into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            err.to_string(),
            "Not found: Document with ID p1 not found in posts"
        );
    }

    #[test]
    fn unavailable_maps_to_503() {
        let err: AppError = StoreError::Unavailable("server selection timeout".into()).into();
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn invalid_input_maps_to_400() {
        let err: AppError = StoreError::InvalidInput("bad key".into()).into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn internal_maps_to_500() {
        let err: AppError = StoreError::Internal(anyhow::anyhow!("cursor died")).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn blank_and_nested_keys_are_rejected() {
        assert!(matches!(
            validate_key(POSTS, "  "),
            Err(StoreError::InvalidInput(_))
        ));
        assert!(matches!(
            validate_key(POSTS, "a/b"),
            Err(StoreError::InvalidInput(_))
        ));
        assert!(matches!(validate_key("", "p1"), Err(StoreError::InvalidInput(_))));
        assert!(validate_key(POSTS, "p1").is_ok());
    }
}

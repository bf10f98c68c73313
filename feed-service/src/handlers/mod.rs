pub mod health;
pub mod jobs;
pub mod posts;

pub use health::{health_check, metrics_endpoint, readiness_check};
pub use jobs::{get_job, missing_job_id};
pub use posts::{get_post, missing_post_id};

use crate::models::Document;
use crate::services::{metrics::record_fetch, DocumentStore, StoreError};
use service_core::error::AppError;
use std::time::Instant;

/// Path id as given, or a 400 carrying `message` when it is blank.
fn require_id<'a>(id: &'a str, message: &'static str) -> Result<&'a str, AppError> {
    if id.trim().is_empty() {
        return Err(AppError::BadRequest(anyhow::anyhow!(message)));
    }
    Ok(id)
}

/// Primary document fetch with timing, outcome metrics and error logging.
async fn fetch_document(
    store: &dyn DocumentStore,
    collection: &str,
    id: &str,
) -> Result<Document, StoreError> {
    let start = Instant::now();
    let result = store.get_document(collection, id).await;

    let outcome = match &result {
        Ok(_) => "found",
        Err(e) => e.kind(),
    };
    record_fetch(collection, outcome, start.elapsed());

    if let Err(e) = &result {
        tracing::error!(
            collection = %collection,
            id = %id,
            error_kind = e.kind(),
            "Error fetching document: {}",
            e
        );
    }
    result
}

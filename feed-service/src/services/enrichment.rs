//! Author enrichment: resolve a post's `author` reference to a display name.

use super::metrics::record_enrichment;
use super::store::{DocumentStore, USERS};
use crate::models::Document;

pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Outcome of resolving a post's author. Every variant yields a display name;
/// enrichment never fails the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorEnrichment {
    Resolved(String),
    /// The post has no usable `author` reference.
    NoReference,
    /// The referenced user exists but has no name.
    Anonymous,
    /// The `users` lookup failed.
    LookupFailed,
}

impl AuthorEnrichment {
    pub async fn resolve(store: &dyn DocumentStore, post: &Document) -> Self {
        let author_id = match post.get_str("author") {
            Some(id) if !id.trim().is_empty() => id,
            _ => return Self::record(AuthorEnrichment::NoReference),
        };

        tracing::info!(post_id = %post.id(), author_id = %author_id, "Fetching author");
        let outcome = match store.get_document(USERS, author_id).await {
            Ok(user) => match display_name(&user) {
                Some(name) => AuthorEnrichment::Resolved(name),
                None => AuthorEnrichment::Anonymous,
            },
            Err(e) => {
                tracing::error!(
                    post_id = %post.id(),
                    author_id = %author_id,
                    error_kind = e.kind(),
                    "Error fetching author data: {}",
                    e
                );
                AuthorEnrichment::LookupFailed
            }
        };
        Self::record(outcome)
    }

    pub fn into_display_name(self) -> String {
        match self {
            AuthorEnrichment::Resolved(name) => name,
            _ => UNKNOWN_AUTHOR.to_string(),
        }
    }

    fn outcome_label(&self) -> &'static str {
        match self {
            AuthorEnrichment::Resolved(_) => "resolved",
            AuthorEnrichment::NoReference => "no_reference",
            AuthorEnrichment::Anonymous => "anonymous",
            AuthorEnrichment::LookupFailed => "lookup_failed",
        }
    }

    fn record(outcome: Self) -> Self {
        record_enrichment(outcome.outcome_label());
        outcome
    }
}

/// "first last", trimmed; `None` when both names are blank.
fn display_name(user: &Document) -> Option<String> {
    let first = user.get_str("first_name").unwrap_or_default();
    let last = user.get_str("last_name").unwrap_or_default();
    let name = format!("{} {}", first, last).trim().to_string();
    (!name.is_empty()).then_some(name)
}

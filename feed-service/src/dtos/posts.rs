use super::fields::{integer, optional, timestamp_millis};
use crate::models::Document;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: String,
    pub content: Option<String>,
    pub author: Option<String>,
    pub author_title: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: Option<i64>,
    pub likes: Option<Vec<Value>>,
    pub comments: Option<Vec<Value>>,
    pub views: Option<i64>,
}

impl PostResponse {
    /// Reshape a post, replacing its `author` reference with a display name.
    pub fn from_document(post: &Document, author: String) -> Self {
        let fields = post.fields();
        Self {
            id: post.id().to_string(),
            content: optional(fields, "content"),
            author: Some(author),
            author_title: optional(fields, "author_title"),
            created_at: timestamp_millis(fields, "createdAt"),
            likes: optional(fields, "likes"),
            comments: optional(fields, "comments"),
            views: Some(integer(fields, "views").unwrap_or(0)),
        }
    }
}

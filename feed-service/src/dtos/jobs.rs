use super::fields::{optional, timestamp_millis};
use crate::models::Document;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobResponse {
    pub id: String,
    pub title: Option<String>,
    pub company: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub salary: Option<String>,
    pub requirements: Option<Vec<Value>>,
    #[serde(rename = "createdAt")]
    pub created_at: Option<i64>,
}

impl From<Document> for JobResponse {
    fn from(job: Document) -> Self {
        let fields = job.fields();
        Self {
            id: job.id().to_string(),
            title: optional(fields, "title"),
            company: optional(fields, "company"),
            description: optional(fields, "description"),
            location: optional(fields, "location"),
            salary: optional(fields, "salary"),
            requirements: optional(fields, "requirements"),
            created_at: timestamp_millis(fields, "createdAt"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wrong_types_are_treated_as_missing() {
        let doc = Document::from_store(
            "j1",
            json!({ "title": "Engineer", "salary": 120000, "requirements": "rust" })
                .as_object()
                .cloned()
                .unwrap(),
        );

        let job = JobResponse::from(doc);

        assert_eq!(job.id, "j1");
        assert_eq!(job.title.as_deref(), Some("Engineer"));
        assert_eq!(job.salary, None);
        assert_eq!(job.requirements, None);
    }
}

use serde::Serialize;
use serde_json::{Map, Value};

/// A loosely structured record read from the document store.
///
/// `fields` always carries an `id` entry equal to the store key. The key is
/// written after the stored data, so a stored field literally named `id` is
/// overwritten.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "Value")]
pub struct Document {
    id: String,
    fields: Map<String, Value>,
}

impl Document {
    pub fn from_store(id: impl Into<String>, mut fields: Map<String, Value>) -> Self {
        let id = id.into();
        fields.insert("id".to_string(), Value::String(id.clone()));
        Self { id, fields }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// String value of `field`, or `None` when absent or not a string.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

impl From<Document> for Value {
    fn from(doc: Document) -> Self {
        Value::Object(doc.fields)
    }
}

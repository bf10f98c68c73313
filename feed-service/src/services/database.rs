use super::store::{validate_key, DocumentStore, StoreError};
use crate::config::StoreConfig;
use crate::models::Document;
use async_trait::async_trait;
use mongodb::{
    bson::{doc, oid::ObjectId, Bson, Document as BsonDocument},
    error::ErrorKind,
    options::ClientOptions,
    Client as MongoClient, Collection, Database,
};
use serde_json::Value;

#[derive(Clone)]
pub struct MongoStore {
    client: MongoClient,
    db: Database,
}

impl MongoStore {
    /// Build the client from configuration. The driver connects lazily, so a
    /// reachable server is not required here; see [`DocumentStore::health_check`].
    pub async fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        let database = config.database_name();
        tracing::info!(
            project_id = %config.project_id,
            database = %database,
            "Connecting to MongoDB"
        );

        let mut options = ClientOptions::parse(config.connection_uri())
            .await
            .map_err(|e| {
                tracing::error!("Failed to parse MongoDB connection string: {}", e);
                StoreError::InvalidInput(format!("Invalid MongoDB connection string: {}", e))
            })?;
        options.app_name = Some(config.project_id.clone());

        let client = MongoClient::with_options(options).map_err(|e| {
            tracing::error!("Failed to create MongoDB client: {}", e);
            classify_error(e)
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "MongoDB client initialized");

        Ok(Self { client, db })
    }

    fn collection(&self, name: &str) -> Collection<BsonDocument> {
        self.db.collection(name)
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn get_document(&self, collection: &str, id: &str) -> Result<Document, StoreError> {
        validate_key(collection, id)?;

        let found = self
            .collection(collection)
            .find_one(key_filter(id), None)
            .await
            .map_err(|e| {
                tracing::error!(
                    collection = %collection,
                    id = %id,
                    "Error fetching document: {}",
                    e
                );
                classify_error(e)
            })?;

        match found {
            Some(stored) => document_from_bson(id, stored),
            None => {
                tracing::warn!(collection = %collection, id = %id, "Document not found");
                Err(StoreError::not_found(collection, id))
            }
        }
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                classify_error(e)
            })?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "mongodb"
    }
}

/// Match a string `_id`, and the equivalent ObjectId when the key is one.
fn key_filter(id: &str) -> BsonDocument {
    match ObjectId::parse_str(id) {
        Ok(oid) => doc! { "_id": { "$in": [id, oid] } },
        Err(_) => doc! { "_id": id },
    }
}

/// Convert a stored BSON document into relaxed Extended JSON fields.
fn document_from_bson(id: &str, mut stored: BsonDocument) -> Result<Document, StoreError> {
    stored.remove("_id");
    match Bson::Document(stored).into_relaxed_extjson() {
        Value::Object(fields) => Ok(Document::from_store(id, fields)),
        other => Err(StoreError::Internal(anyhow::anyhow!(
            "Stored document {} is not an object: {}",
            id,
            other
        ))),
    }
}

/// Connectivity failures become `Unavailable`; everything else is `Internal`.
fn classify_error(err: mongodb::error::Error) -> StoreError {
    match err.kind.as_ref() {
        ErrorKind::ServerSelection { .. }
        | ErrorKind::Io(_)
        | ErrorKind::ConnectionPoolCleared { .. }
        | ErrorKind::DnsResolve { .. }
        | ErrorKind::Authentication { .. } => StoreError::Unavailable(err.to_string()),
        _ => StoreError::Internal(anyhow::Error::new(err)),
    }
}

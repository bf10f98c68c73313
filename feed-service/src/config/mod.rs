use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use service_core::config::{self as core_config, get_env, get_optional_env, is_production};
use service_core::error::AppError;
use std::path::Path;
use validator::{Validate, ValidationError};

const DEFAULT_MONGODB_URI: &str = "mongodb://localhost:27017";

#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub store: StoreConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    MongoDb,
    Memory,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    #[validate(custom(function = "not_blank"))]
    pub project_id: String,
    #[validate(custom(function = "not_blank"))]
    pub database_id: Option<String>,
    #[validate(custom(function = "not_blank"))]
    pub uri: String,
    /// File holding the connection string. Its content takes precedence over `uri`.
    #[validate(custom(function = "existing_file"))]
    pub credentials_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: Secret<String>,
}

impl FeedConfig {
    pub fn load() -> Result<Self, AppError> {
        // Load common config (handles .env and APP__ prefix)
        let common_config = core_config::Config::load()?;
        let is_prod = is_production();

        let mut store = StoreConfig {
            backend: get_env("STORE_BACKEND", Some("mongodb"), is_prod)?
                .parse()
                .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?,
            project_id: get_env("STORE_PROJECT_ID", None, is_prod)?,
            database_id: get_optional_env("STORE_DATABASE_ID"),
            uri: get_env("MONGODB_URI", Some(DEFAULT_MONGODB_URI), is_prod)?,
            credentials_path: get_optional_env("STORE_CREDENTIALS_PATH"),
        };
        store.validate()?;
        store.resolve_credentials()?;

        let jwt_secret = get_env("JWT_SECRET", None, is_prod)?;
        if jwt_secret.trim().is_empty() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "JWT_SECRET must not be empty"
            )));
        }

        Ok(FeedConfig {
            common: common_config,
            store,
            auth: AuthConfig {
                jwt_secret: Secret::new(jwt_secret),
            },
        })
    }
}

impl StoreConfig {
    /// Database to read from; the project id doubles as the default database.
    pub fn database_name(&self) -> &str {
        self.database_id.as_deref().unwrap_or(&self.project_id)
    }

    pub fn connection_uri(&self) -> &str {
        &self.uri
    }

    /// Replace `uri` with the connection string stored at `credentials_path`.
    pub fn resolve_credentials(&mut self) -> Result<(), AppError> {
        let Some(path) = &self.credentials_path else {
            return Ok(());
        };

        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!(
                "Failed to read credentials file {}: {}",
                path,
                e
            ))
        })?;
        let uri = contents.trim();
        if uri.is_empty() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "Credentials file {} is empty",
                path
            )));
        }

        tracing::info!(credentials_path = %path, "Using connection string from credentials file");
        self.uri = uri.to_string();
        Ok(())
    }
}

impl AuthConfig {
    pub fn jwt_secret(&self) -> &str {
        self.jwt_secret.expose_secret()
    }
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mongodb" | "mongo" => Ok(StoreBackend::MongoDb),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(format!("Invalid store backend: {}", s)),
        }
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn existing_file(path: &str) -> Result<(), ValidationError> {
    if !Path::new(path).is_file() {
        return Err(ValidationError::new("missing_file"));
    }
    Ok(())
}

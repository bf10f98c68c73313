#![allow(dead_code)]

use feed_service::config::{AuthConfig, FeedConfig, StoreBackend, StoreConfig};
use feed_service::middleware::UserClaims;
use feed_service::services::MemoryStore;
use feed_service::startup::Application;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use secrecy::Secret;
use service_core::config::Config as CoreConfig;
use std::sync::Arc;

pub const TEST_JWT_SECRET: &str = "feed-service-test-secret";
pub const TEST_USER_ID: &str = "test_user_123";

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub store: MemoryStore,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let store = MemoryStore::new();
        let config = FeedConfig {
            common: CoreConfig { port: 0 }, // Random port for testing
            store: StoreConfig {
                backend: StoreBackend::Memory,
                project_id: "feed-test".to_string(),
                database_id: None,
                uri: "mongodb://localhost:27017".to_string(),
                credentials_path: None,
            },
            auth: AuthConfig {
                jwt_secret: Secret::new(TEST_JWT_SECRET.to_string()),
            },
        };

        let app = Application::build_with_store(config, Arc::new(store.clone()))
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            store,
            client,
        }
    }

    /// GET `path` with a valid bearer token for a regular user.
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.get_with_token(path, &token_for_role("user")).await
    }

    pub async fn get_with_token(&self, path: &str, token: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.address, path))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get_anonymous(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request")
    }
}

pub fn token_for_role(role: &str) -> String {
    sign_token(role, TEST_JWT_SECRET)
}

pub fn sign_token(role: &str, secret: &str) -> String {
    let claims = UserClaims {
        sub: TEST_USER_ID.to_string(),
        role: role.to_string(),
        exp: chrono::Utc::now().timestamp() + 3600,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("Failed to sign test token")
}

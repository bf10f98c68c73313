//! Application startup and lifecycle management.

use crate::config::{FeedConfig, StoreBackend};
use crate::handlers;
use crate::middleware::TokenVerifier;
use crate::services::{DocumentStore, MemoryStore, MongoStore};
use axum::{extract::Request, middleware, routing::get, Router};
use service_core::error::AppError;
use service_core::middleware::{
    metrics_middleware, request_id_middleware, security_headers_middleware,
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::Span;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: FeedConfig,
    pub store: Arc<dyn DocumentStore>,
    pub verifier: TokenVerifier,
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application, constructing the store selected by configuration.
    pub async fn build(config: FeedConfig) -> Result<Self, AppError> {
        let store: Arc<dyn DocumentStore> = match config.store.backend {
            StoreBackend::MongoDb => Arc::new(MongoStore::connect(&config.store).await.map_err(
                |e| {
                    tracing::error!("Failed to initialize MongoDB store: {}", e);
                    AppError::ConfigError(anyhow::anyhow!(e))
                },
            )?),
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory document store; data is not persisted");
                Arc::new(MemoryStore::new())
            }
        };

        Self::build_with_store(config, store).await
    }

    /// Build the application around an already constructed store.
    pub async fn build_with_store(
        config: FeedConfig,
        store: Arc<dyn DocumentStore>,
    ) -> Result<Self, AppError> {
        // Reachability is reported, not required: requests answer 503 until it recovers.
        if let Err(e) = store.health_check().await {
            tracing::warn!(
                store = store.backend_name(),
                "Document store is not reachable yet: {}",
                e
            );
        }

        let state = AppState {
            verifier: TokenVerifier::new(config.auth.jwt_secret()),
            config: config.clone(),
            store,
        };

        // Bind HTTP listener (port 0 = random port for testing)
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(
            store = state.store.backend_name(),
            "Feed service listening on port {}",
            port
        );

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.run_until(std::future::pending()).await
    }

    /// Serve until `shutdown` resolves, then drain in-flight requests.
    pub async fn run_until<F>(self, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let router = router(self.state);
        axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                e
            })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .route("/posts/", get(handlers::missing_post_id))
        .route("/posts/:post_id", get(handlers::get_post))
        .route("/jobs/", get(handlers::missing_job_id))
        .route("/jobs/:job_id", get(handlers::get_job))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(security_headers_middleware))
        // Reuse the request span so the caller id recorded by `VerifiedUser` lands on it.
        .layer(TraceLayer::new_for_http().make_span_with(|_: &Request| Span::current()))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AuthConfig, StoreConfig};
    use crate::middleware::UserClaims;
    use axum::body::Body;
    use axum::http::Request as HttpRequest;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use secrecy::Secret;
    use service_core::config::Config as CoreConfig;
    use std::fmt;
    use std::sync::Mutex;
    use tower::ServiceExt;
    use tracing::field::{Field, Visit};
    use tracing::{span, Subscriber};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    const SECRET: &str = "startup-test-secret";

    #[derive(Clone, Default)]
    struct RecordedUserIds(Arc<Mutex<Vec<String>>>);

    struct UserIdVisitor<'a>(&'a Mutex<Vec<String>>);

    impl Visit for UserIdVisitor<'_> {
        fn record_str(&mut self, field: &Field, value: &str) {
            if field.name() == "user_id" {
                self.0.lock().unwrap().push(value.to_string());
            }
        }

        fn record_debug(&mut self, _field: &Field, _value: &dyn fmt::Debug) {}
    }

    impl<S: Subscriber> Layer<S> for RecordedUserIds {
        fn on_record(&self, _id: &span::Id, values: &span::Record<'_>, _ctx: Context<'_, S>) {
            values.record(&mut UserIdVisitor(&self.0));
        }
    }

    fn state(store: MemoryStore) -> AppState {
        let config = FeedConfig {
            common: CoreConfig { port: 0 },
            store: StoreConfig {
                backend: StoreBackend::Memory,
                project_id: "feed-test".to_string(),
                database_id: None,
                uri: "mongodb://localhost:27017".to_string(),
                credentials_path: None,
            },
            auth: AuthConfig {
                jwt_secret: Secret::new(SECRET.to_string()),
            },
        };
        AppState {
            verifier: TokenVerifier::new(SECRET),
            config,
            store: Arc::new(store),
        }
    }

    fn token(sub: &str) -> String {
        let claims = UserClaims {
            sub: sub.to_string(),
            role: "user".to_string(),
            exp: chrono::Utc::now().timestamp() + 3600,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn verified_caller_is_recorded_on_the_request_span() {
        let recorded = RecordedUserIds::default();
        let _guard =
            tracing::subscriber::set_default(tracing_subscriber::registry().with(recorded.clone()));

        let store = MemoryStore::new();
        store
            .insert("jobs", "j1", serde_json::json!({ "title": "Engineer" }))
            .await;

        let response = router(state(store))
            .oneshot(
                HttpRequest::builder()
                    .uri("/jobs/j1")
                    .header("authorization", format!("Bearer {}", token("u42")))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), axum::http::StatusCode::OK);
        assert_eq!(*recorded.0.lock().unwrap(), vec!["u42".to_string()]);
    }
}

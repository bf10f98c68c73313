use crate::startup::AppState;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use service_core::error::AppError;

const VERIFIED_ROLES: [&str; 2] = ["user", "admin"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    /// Subject (user ID)
    pub sub: String,
    pub role: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// HS256 bearer-token verification against the shared signing secret.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    pub fn verify(&self, token: &str) -> Result<UserClaims, AppError> {
        let claims = decode::<UserClaims>(token, &self.decoding_key, &self.validation)?.claims;

        if !VERIFIED_ROLES.contains(&claims.role.as_str()) {
            return Err(AppError::Unauthorized(anyhow::anyhow!(
                "User role '{}' is not allowed to access this resource",
                claims.role
            )));
        }

        Ok(claims)
    }
}

/// A caller whose bearer token verified and whose role is `user` or `admin`.
#[derive(Debug, Clone)]
pub struct VerifiedUser(pub UserClaims);

impl VerifiedUser {
    pub fn id(&self) -> &str {
        &self.0.sub
    }
}

#[async_trait]
impl FromRequestParts<AppState> for VerifiedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| {
                AppError::Unauthorized(anyhow::anyhow!("Missing or invalid Authorization header"))
            })?;

        let claims = state.verifier.verify(token.trim()).map_err(|e| {
            tracing::warn!("Rejected bearer token: {}", e);
            e
        })?;

        tracing::Span::current().record("user_id", claims.sub.as_str());

        Ok(VerifiedUser(claims))
    }
}

use super::{fetch_document, require_id};
use crate::dtos::PostResponse;
use crate::middleware::VerifiedUser;
use crate::services::{AuthorEnrichment, POSTS};
use crate::startup::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use service_core::error::AppError;

const POST_ID_REQUIRED: &str = "Post ID is required";

pub async fn get_post(
    State(state): State<AppState>,
    user: VerifiedUser,
    Path(post_id): Path<String>,
) -> Result<Json<PostResponse>, AppError> {
    let post_id = require_id(&post_id, POST_ID_REQUIRED)?;

    tracing::info!(post_id = %post_id, user_id = %user.id(), "Fetching post");
    let post = fetch_document(state.store.as_ref(), POSTS, post_id).await?;

    // Author lookup failures degrade to "Unknown"; they never fail the request.
    let author = AuthorEnrichment::resolve(state.store.as_ref(), &post).await;

    Ok(Json(PostResponse::from_document(
        &post,
        author.into_display_name(),
    )))
}

/// `GET /posts/` with an empty id segment.
pub async fn missing_post_id(_user: VerifiedUser) -> AppError {
    AppError::BadRequest(anyhow::anyhow!(POST_ID_REQUIRED))
}

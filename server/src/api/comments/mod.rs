pub mod create;
pub mod list;

use crate::models::{AuthorSnapshot, Comment};
use crate::AppState;
use axum::routing::get;
use axum::Router;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: Uuid,
    pub recipe: Uuid,
    pub author: AuthorSnapshot,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            recipe: comment.recipe_id,
            author: AuthorSnapshot::parse(&comment.author),
            text: comment.text,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}

/// Returns the router for /api/comments endpoints (mounted at /api/comments)
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/recipe/{recipe_id}",
        get(list::list_comments).post(create::create_comment),
    )
}

#[derive(OpenApi)]
#[openapi(
    paths(list::list_comments, create::create_comment),
    components(schemas(CommentResponse, create::CreateCommentRequest))
)]
pub struct ApiDoc;

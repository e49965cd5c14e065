use super::CommentResponse;
use crate::api::{ApiError, ErrorResponse};
use crate::auth::AuthUser;
use crate::models::{AuthorSnapshot, Comment, NewComment};
use crate::schema::{comments, recipes};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateCommentRequest {
    pub text: String,
}

#[utoipa::path(
    post,
    path = "/api/comments/recipe/{recipe_id}",
    tag = "comments",
    params(
        ("recipe_id" = Uuid, Path, description = "Recipe ID")
    ),
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Comment created", body = CommentResponse),
        (status = 400, description = "Empty or overlong text", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(recipe_id): Path<Uuid>,
    Json(req): Json<CreateCommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let text_len = req.text.chars().count();
    if !(1..=500).contains(&text_len) {
        return Err(ApiError::Validation(
            "comment text must be between 1 and 500 characters".to_string(),
        ));
    }

    let mut conn = state.pool.get()?;
    recipes::table
        .find(recipe_id)
        .select(recipes::id)
        .first::<Uuid>(&mut conn)
        .optional()?
        .ok_or(ApiError::NotFound("Recipe not found"))?;

    let author = serde_json::to_value(AuthorSnapshot::from(&user))?;
    let new_comment = NewComment {
        recipe_id,
        author,
        text: &req.text,
    };
    let comment: Comment = diesel::insert_into(comments::table)
        .values(&new_comment)
        .returning(Comment::as_returning())
        .get_result(&mut conn)?;

    Ok((StatusCode::CREATED, Json(CommentResponse::from(comment))))
}

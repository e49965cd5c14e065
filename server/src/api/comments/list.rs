use super::CommentResponse;
use crate::api::ApiError;
use crate::models::Comment;
use crate::schema::comments;
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use diesel::prelude::*;
use uuid::Uuid;

/// Newest first. A recipe with no comments (or no recipe at all) is an
/// empty list, not a 404.
#[utoipa::path(
    get,
    path = "/api/comments/recipe/{recipe_id}",
    tag = "comments",
    params(
        ("recipe_id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Comments for the recipe", body = Vec<CommentResponse>)
    )
)]
pub async fn list_comments(
    State(state): State<AppState>,
    Path(recipe_id): Path<Uuid>,
) -> Result<Json<Vec<CommentResponse>>, ApiError> {
    let mut conn = state.pool.get()?;
    let rows: Vec<Comment> = comments::table
        .filter(comments::recipe_id.eq(recipe_id))
        .order(comments::created_at.desc())
        .select(Comment::as_select())
        .load(&mut conn)?;
    Ok(Json(rows.into_iter().map(CommentResponse::from).collect()))
}

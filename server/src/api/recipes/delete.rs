use crate::api::{ApiError, ErrorResponse, MessageResponse};
use crate::auth::AuthUser;
use crate::models::AuthorSnapshot;
use crate::schema::{comments, favorites, recipes};
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use diesel::prelude::*;
use uuid::Uuid;

/// Deletes a recipe and everything hanging off it. Children go first, each
/// in its own statement; if the process dies partway the recipe survives
/// with fewer children, which a retry cleans up.
#[utoipa::path(
    delete,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Recipe deleted", body = MessageResponse),
        (status = 403, description = "Not the recipe owner", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_recipe(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    let mut conn = state.pool.get()?;

    let author: serde_json::Value = recipes::table
        .find(id)
        .select(recipes::author)
        .first(&mut conn)
        .optional()?
        .ok_or(ApiError::NotFound("Recipe not found"))?;
    if AuthorSnapshot::parse(&author).id != user.id {
        return Err(ApiError::Forbidden("Not authorized to delete this recipe"));
    }

    diesel::delete(comments::table.filter(comments::recipe_id.eq(id))).execute(&mut conn)?;
    diesel::delete(favorites::table.filter(favorites::recipe_id.eq(id))).execute(&mut conn)?;
    diesel::delete(recipes::table.find(id)).execute(&mut conn)?;

    tracing::info!("User {} deleted recipe {}", user.id, id);
    Ok(Json(MessageResponse {
        message: "Recipe deleted successfully".to_string(),
    }))
}

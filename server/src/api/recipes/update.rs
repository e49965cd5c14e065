use super::form::{self, resolve_photo_url, RecipeForm};
use super::RecipeResponse;
use crate::api::{ApiError, ErrorResponse};
use crate::auth::AuthUser;
use crate::models::{to_db_list, AuthorSnapshot, Recipe, RecipeChanges};
use crate::schema::recipes;
use crate::AppState;
use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use diesel::prelude::*;
use uuid::Uuid;

/// Full replacement of the editable fields. The payload is validated against
/// the same rules as creation, so a partial body is rejected rather than
/// merged.
#[utoipa::path(
    put,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    request_body(content_type = "multipart/form-data", content = form::RecipeUpload),
    responses(
        (status = 200, description = "Updated recipe", body = RecipeResponse),
        (status = 400, description = "Validation or upload error", body = ErrorResponse),
        (status = 403, description = "Not the recipe owner", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_recipe(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<RecipeResponse>, ApiError> {
    let mut conn = state.pool.get()?;

    let author: serde_json::Value = recipes::table
        .find(id)
        .select(recipes::author)
        .first(&mut conn)
        .optional()?
        .ok_or(ApiError::NotFound("Recipe not found"))?;
    if AuthorSnapshot::parse(&author).id != user.id {
        return Err(ApiError::Forbidden("Not authorized to update this recipe"));
    }

    let form = RecipeForm::collect(multipart).await?;
    let data = form.validate()?;

    // None keeps the existing photo; a fresh upload replaces it.
    let photo_url = resolve_photo_url(&state, data.photo).await?;

    let ingredients = to_db_list(&data.ingredients);
    let instructions = to_db_list(&data.instructions);
    let categories: Vec<Option<String>> = data
        .categories
        .iter()
        .map(|c| Some(c.as_str().to_string()))
        .collect();

    let changes = RecipeChanges {
        title: &data.title,
        description: &data.description,
        ingredients: &ingredients,
        instructions: &instructions,
        categories: &categories,
        photo_url: photo_url.as_deref(),
    };

    let updated: Recipe = diesel::update(recipes::table.find(id))
        .set(&changes)
        .returning(Recipe::as_returning())
        .get_result(&mut conn)?;

    Ok(Json(RecipeResponse::from(updated)))
}

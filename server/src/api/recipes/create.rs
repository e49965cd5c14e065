use super::form::{self, resolve_photo_url, RecipeForm};
use super::RecipeResponse;
use crate::api::{ApiError, ErrorResponse};
use crate::auth::AuthUser;
use crate::models::{to_db_list, AuthorSnapshot, NewRecipe, Recipe};
use crate::schema::recipes;
use crate::AppState;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;

#[utoipa::path(
    post,
    path = "/api/recipes",
    tag = "recipes",
    request_body(content_type = "multipart/form-data", content = form::RecipeUpload),
    responses(
        (status = 201, description = "Recipe created", body = RecipeResponse),
        (status = 400, description = "Validation or upload error", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_recipe(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let form = RecipeForm::collect(multipart).await?;
    let data = form.validate()?;

    let photo_url = resolve_photo_url(&state, data.photo)
        .await?
        .unwrap_or_default();

    let author = serde_json::to_value(AuthorSnapshot::from(&user))?;
    let ingredients = to_db_list(&data.ingredients);
    let instructions = to_db_list(&data.instructions);
    let categories: Vec<Option<String>> = data
        .categories
        .iter()
        .map(|c| Some(c.as_str().to_string()))
        .collect();

    let new_recipe = NewRecipe {
        author,
        title: &data.title,
        description: &data.description,
        ingredients: &ingredients,
        instructions: &instructions,
        photo_url: &photo_url,
        categories: &categories,
    };

    let mut conn = state.pool.get()?;
    let recipe: Recipe = diesel::insert_into(recipes::table)
        .values(&new_recipe)
        .returning(Recipe::as_returning())
        .get_result(&mut conn)?;

    tracing::info!("User {} created recipe {}", user.id, recipe.id);
    Ok((StatusCode::CREATED, Json(RecipeResponse::from(recipe))))
}

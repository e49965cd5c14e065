use super::RecipeResponse;
use crate::api::{ApiError, ErrorResponse};
use crate::auth::MaybeAuthUser;
use crate::models::{Ratings, Recipe};
use crate::schema::{comments, favorites, recipes};
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use diesel::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Detail view: the recipe plus what the current viewer has done with it.
/// For anonymous viewers the viewer fields are simply false and 0.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDetailResponse {
    #[serde(flatten)]
    pub recipe: RecipeResponse,
    pub comments_count: i64,
    pub user_has_favorited: bool,
    pub user_rating: i32,
}

#[utoipa::path(
    get,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "The recipe", body = RecipeDetailResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    )
)]
pub async fn get_recipe(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RecipeDetailResponse>, ApiError> {
    let mut conn = state.pool.get()?;

    let recipe: Recipe = recipes::table
        .find(id)
        .select(Recipe::as_select())
        .first(&mut conn)
        .optional()?
        .ok_or(ApiError::NotFound("Recipe not found"))?;

    let comments_count: i64 = comments::table
        .filter(comments::recipe_id.eq(id))
        .count()
        .get_result(&mut conn)?;

    let (user_has_favorited, user_rating) = match viewer {
        Some(user) => {
            let favorited = favorites::table
                .filter(favorites::user_id.eq(user.id))
                .filter(favorites::recipe_id.eq(id))
                .select(favorites::id)
                .first::<Uuid>(&mut conn)
                .optional()?
                .is_some();
            let rating = Ratings::parse(&recipe.ratings).for_user(user.id);
            (favorited, rating)
        }
        None => (false, 0),
    };

    Ok(Json(RecipeDetailResponse {
        recipe: recipe.into(),
        comments_count,
        user_has_favorited,
        user_rating,
    }))
}

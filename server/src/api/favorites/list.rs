use crate::api::{ApiError, ErrorResponse};
use crate::auth::AuthUser;
use crate::models::{flatten_list, AuthorSnapshot, Favorite, Recipe};
use crate::schema::{favorites, recipes};
use crate::AppState;
use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// A favorited recipe card plus when it was favorited.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRecipe {
    pub id: Uuid,
    pub author: AuthorSnapshot,
    pub title: String,
    pub description: String,
    pub photo_url: String,
    pub categories: Vec<String>,
    pub avg_rating: f64,
    pub created_at: DateTime<Utc>,
    pub favorited_at: DateTime<Utc>,
}

/// Most recently favorited first. The join means a favorite pointing at a
/// recipe deleted mid-crash simply drops out of the list.
#[utoipa::path(
    get,
    path = "/api/favorites/me",
    tag = "favorites",
    responses(
        (status = 200, description = "The caller's favorites, newest first", body = Vec<FavoriteRecipe>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn my_favorites(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<FavoriteRecipe>>, ApiError> {
    let mut conn = state.pool.get()?;
    let rows: Vec<(Favorite, Recipe)> = favorites::table
        .inner_join(recipes::table.on(recipes::id.eq(favorites::recipe_id)))
        .filter(favorites::user_id.eq(user.id))
        .order(favorites::created_at.desc())
        .select((Favorite::as_select(), Recipe::as_select()))
        .load(&mut conn)?;

    let list = rows
        .into_iter()
        .map(|(favorite, recipe)| FavoriteRecipe {
            id: recipe.id,
            author: recipe.author_snapshot(),
            title: recipe.title,
            description: recipe.description,
            photo_url: recipe.photo_url,
            categories: flatten_list(recipe.categories),
            avg_rating: recipe.avg_rating,
            created_at: recipe.created_at,
            favorited_at: favorite.created_at,
        })
        .collect();
    Ok(Json(list))
}

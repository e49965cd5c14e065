use crate::api::{ApiError, ErrorResponse};
use crate::auth::AuthUser;
use crate::models::{Favorite, NewFavorite};
use crate::schema::{favorites, recipes};
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ToggleFavoriteResponse {
    pub favorited: bool,
    pub message: String,
}

#[utoipa::path(
    post,
    path = "/api/recipes/{id}/favorite",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "New favorite state", body = ToggleFavoriteResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn toggle_favorite(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ToggleFavoriteResponse>, ApiError> {
    let mut conn = state.pool.get()?;

    recipes::table
        .find(id)
        .select(recipes::id)
        .first::<Uuid>(&mut conn)
        .optional()?
        .ok_or(ApiError::NotFound("Recipe not found"))?;

    let existing: Option<Favorite> = favorites::table
        .filter(favorites::user_id.eq(user.id))
        .filter(favorites::recipe_id.eq(id))
        .select(Favorite::as_select())
        .first(&mut conn)
        .optional()?;

    if let Some(favorite) = existing {
        diesel::delete(favorites::table.find(favorite.id)).execute(&mut conn)?;
        return Ok(Json(ToggleFavoriteResponse {
            favorited: false,
            message: "Recipe removed from favorites".to_string(),
        }));
    }

    let new_favorite = NewFavorite {
        user_id: user.id,
        recipe_id: id,
    };
    match diesel::insert_into(favorites::table)
        .values(&new_favorite)
        .execute(&mut conn)
    {
        Ok(_) => Ok(Json(ToggleFavoriteResponse {
            favorited: true,
            message: "Recipe added to favorites".to_string(),
        })),
        // Two toggles racing past the existence check: the unique pair
        // constraint stops the second insert, and losing that race still
        // means the favorite exists.
        Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
            Ok(Json(ToggleFavoriteResponse {
                favorited: true,
                message: "Recipe already favorited".to_string(),
            }))
        }
        Err(e) => Err(e.into()),
    }
}

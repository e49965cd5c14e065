use crate::api::{ApiError, ErrorResponse};
use crate::auth::AuthUser;
use crate::models::{Ratings, MAX_RATING, MIN_RATING};
use crate::schema::recipes;
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RateRequest {
    pub value: i32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RateResponse {
    pub message: String,
    pub avg_rating: f64,
    pub user_rating: i32,
}

/// Upserts the caller's rating and recomputes the stored average. The
/// read-modify-write is unguarded: two simultaneous raters race and the
/// last write wins, which the next rating heals.
#[utoipa::path(
    post,
    path = "/api/recipes/{id}/ratings",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    request_body = RateRequest,
    responses(
        (status = 200, description = "Rating stored", body = RateResponse),
        (status = 400, description = "Value out of range", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn rate_recipe(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<RateRequest>,
) -> Result<Json<RateResponse>, ApiError> {
    if !(MIN_RATING..=MAX_RATING).contains(&req.value) {
        return Err(ApiError::Validation(format!(
            "rating value must be between {MIN_RATING} and {MAX_RATING}"
        )));
    }

    let mut conn = state.pool.get()?;
    let stored: serde_json::Value = recipes::table
        .find(id)
        .select(recipes::ratings)
        .first(&mut conn)
        .optional()?
        .ok_or(ApiError::NotFound("Recipe not found"))?;

    let mut ratings = Ratings::parse(&stored);
    ratings.add_or_update(user.id, req.value);
    let avg_rating = ratings.average();

    diesel::update(recipes::table.find(id))
        .set((
            recipes::ratings.eq(serde_json::to_value(&ratings)?),
            recipes::avg_rating.eq(avg_rating),
        ))
        .execute(&mut conn)?;

    Ok(Json(RateResponse {
        message: "Rating added successfully".to_string(),
        avg_rating,
        user_rating: req.value,
    }))
}

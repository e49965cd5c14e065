use crate::api::ApiError;
use crate::models::{flatten_list, AuthorSnapshot, Recipe};
use crate::schema::recipes;
use crate::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Listing shape: everything a recipe card needs, without the rating
/// entries or the step lists.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeCard {
    pub id: Uuid,
    pub author: AuthorSnapshot,
    pub title: String,
    pub description: String,
    pub photo_url: String,
    pub categories: Vec<String>,
    pub avg_rating: f64,
    pub created_at: DateTime<Utc>,
}

impl From<Recipe> for RecipeCard {
    fn from(recipe: Recipe) -> Self {
        Self {
            id: recipe.id,
            author: recipe.author_snapshot(),
            title: recipe.title,
            description: recipe.description,
            photo_url: recipe.photo_url,
            categories: flatten_list(recipe.categories),
            avg_rating: recipe.avg_rating,
            created_at: recipe.created_at,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListRecipesParams {
    /// Case-insensitive substring match against title and description.
    pub q: Option<String>,
    /// Comma-separated category names. A recipe matches if it has any of
    /// them. Unknown names simply match nothing.
    pub category: Option<String>,
    /// "rating" sorts by average rating; anything else is newest-first.
    pub sort: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/recipes",
    tag = "recipes",
    params(ListRecipesParams),
    responses(
        (status = 200, description = "Matching recipes", body = Vec<RecipeCard>)
    )
)]
pub async fn list_recipes(
    State(state): State<AppState>,
    Query(params): Query<ListRecipesParams>,
) -> Result<Json<Vec<RecipeCard>>, ApiError> {
    let mut conn = state.pool.get()?;
    let mut query = recipes::table.into_boxed();

    if let Some(category) = &params.category {
        let wanted: Vec<Option<String>> = category
            .split(',')
            .filter(|c| !c.is_empty())
            .map(|c| Some(c.to_string()))
            .collect();
        if !wanted.is_empty() {
            query = query.filter(recipes::categories.overlaps_with(wanted));
        }
    }

    if let Some(q) = params.q.as_deref().filter(|q| !q.is_empty()) {
        let pattern = format!("%{}%", like_escape(q));
        query = query.filter(
            recipes::title
                .ilike(pattern.clone())
                .or(recipes::description.ilike(pattern)),
        );
    }

    query = if params.sort.as_deref() == Some("rating") {
        query.order(recipes::avg_rating.desc())
    } else {
        query.order(recipes::created_at.desc())
    };

    let rows: Vec<Recipe> = query.select(Recipe::as_select()).load(&mut conn)?;
    Ok(Json(rows.into_iter().map(RecipeCard::from).collect()))
}

/// ILIKE treats % and _ as wildcards; a search for "100%" should not match
/// everything.
fn like_escape(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_like_wildcards() {
        assert_eq!(like_escape("50% off"), "50\\% off");
        assert_eq!(like_escape("a_b"), "a\\_b");
        assert_eq!(like_escape(r"back\slash"), r"back\\slash");
        assert_eq!(like_escape("plain"), "plain");
    }
}

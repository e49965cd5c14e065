pub mod create;
pub mod delete;
pub mod favorite;
pub mod form;
pub mod get;
pub mod list;
pub mod rate;
pub mod update;

use crate::models::{flatten_list, AuthorSnapshot, Rating, Ratings, Recipe};
use crate::AppState;
use axum::routing::{get, post};
use axum::Router;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

/// Full wire form of a recipe, shared by create, update and the detail view.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeResponse {
    pub id: Uuid,
    pub author: AuthorSnapshot,
    pub title: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub photo_url: String,
    pub categories: Vec<String>,
    pub ratings: Vec<Rating>,
    pub avg_rating: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Recipe> for RecipeResponse {
    fn from(recipe: Recipe) -> Self {
        Self {
            id: recipe.id,
            author: recipe.author_snapshot(),
            title: recipe.title,
            description: recipe.description,
            ingredients: flatten_list(recipe.ingredients),
            instructions: flatten_list(recipe.instructions),
            photo_url: recipe.photo_url,
            categories: flatten_list(recipe.categories),
            ratings: Ratings::parse(&recipe.ratings).0,
            avg_rating: recipe.avg_rating,
            created_at: recipe.created_at,
            updated_at: recipe.updated_at,
        }
    }
}

/// Returns the router for /api/recipes endpoints (mounted at /api/recipes)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_recipes).post(create::create_recipe))
        .route(
            "/{id}",
            get(get::get_recipe)
                .put(update::update_recipe)
                .delete(delete::delete_recipe),
        )
        .route("/{id}/ratings", post(rate::rate_recipe))
        .route("/{id}/favorite", post(favorite::toggle_favorite))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list::list_recipes,
        get::get_recipe,
        create::create_recipe,
        update::update_recipe,
        delete::delete_recipe,
        rate::rate_recipe,
        favorite::toggle_favorite,
    ),
    components(schemas(
        RecipeResponse,
        form::RecipeUpload,
        list::RecipeCard,
        get::RecipeDetailResponse,
        rate::RateResponse,
        favorite::ToggleFavoriteResponse,
    ))
)]
pub struct ApiDoc;

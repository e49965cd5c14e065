use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
}

/// The public shape of a user. Everything except the password hash.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Denormalized author identity stored inside recipes and comments at write
/// time. Later profile edits do not rewrite it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AuthorSnapshot {
    pub id: Uuid,
    pub name: String,
}

impl From<&User> for AuthorSnapshot {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
        }
    }
}

impl AuthorSnapshot {
    pub fn parse(value: &serde_json::Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Category {
    Breakfast,
    Dinner,
    Dessert,
    Vegan,
    Snack,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Breakfast,
        Category::Dinner,
        Category::Dessert,
        Category::Vegan,
        Category::Snack,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Breakfast => "Breakfast",
            Category::Dinner => "Dinner",
            Category::Dessert => "Dessert",
            Category::Vegan => "Vegan",
            Category::Snack => "Snack",
        }
    }

    /// Case-sensitive, so "vegan" is rejected while "Vegan" parses.
    pub fn parse(s: &str) -> Option<Category> {
        Category::ALL.iter().copied().find(|c| c.as_str() == s)
    }
}

/// One user's rating of a recipe, as stored in the recipe's ratings column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Rating {
    pub user: Uuid,
    pub value: i32,
}

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

/// The full rating list of one recipe. Invariant: at most one entry per user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ratings(pub Vec<Rating>);

impl Ratings {
    /// A malformed or missing ratings document reads as empty rather than
    /// failing the whole request.
    pub fn parse(value: &serde_json::Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }

    /// Re-rating replaces the user's existing entry in place. A first rating
    /// is appended.
    pub fn add_or_update(&mut self, user: Uuid, value: i32) {
        match self.0.iter_mut().find(|r| r.user == user) {
            Some(existing) => existing.value = value,
            None => self.0.push(Rating { user, value }),
        }
    }

    /// Arithmetic mean rounded to one decimal place. Empty means 0.0, never
    /// a division by zero.
    pub fn average(&self) -> f64 {
        if self.0.is_empty() {
            return 0.0;
        }
        let sum: i32 = self.0.iter().map(|r| r.value).sum();
        let mean = f64::from(sum) / self.0.len() as f64;
        (mean * 10.0).round() / 10.0
    }

    /// What this user rated the recipe, or 0 if they have not rated it.
    pub fn for_user(&self, user: Uuid) -> i32 {
        self.0
            .iter()
            .find(|r| r.user == user)
            .map(|r| r.value)
            .unwrap_or(0)
    }
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Recipe {
    pub id: Uuid,
    pub author: serde_json::Value,
    pub title: String,
    pub description: String,
    pub ingredients: Vec<Option<String>>,
    pub instructions: Vec<Option<String>>,
    pub photo_url: String,
    pub categories: Vec<Option<String>>,
    pub ratings: serde_json::Value,
    pub avg_rating: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Recipe {
    pub fn author_snapshot(&self) -> AuthorSnapshot {
        AuthorSnapshot::parse(&self.author)
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipes)]
pub struct NewRecipe<'a> {
    pub author: serde_json::Value,
    pub title: &'a str,
    pub description: &'a str,
    pub ingredients: &'a [Option<String>],
    pub instructions: &'a [Option<String>],
    pub photo_url: &'a str,
    pub categories: &'a [Option<String>],
}

/// Field set for a full recipe update. `photo_url: None` keeps the stored
/// photo; ratings and author are never touched by an edit.
#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::recipes)]
pub struct RecipeChanges<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub ingredients: &'a [Option<String>],
    pub instructions: &'a [Option<String>],
    pub categories: &'a [Option<String>],
    pub photo_url: Option<&'a str>,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Comment {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub author: serde_json::Value,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::comments)]
pub struct NewComment<'a> {
    pub recipe_id: Uuid,
    pub author: serde_json::Value,
    pub text: &'a str,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::favorites)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)]
pub struct Favorite {
    pub id: Uuid,
    pub user_id: Uuid,
    pub recipe_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::favorites)]
pub struct NewFavorite {
    pub user_id: Uuid,
    pub recipe_id: Uuid,
}

/// Collapses the nullable-element array representation into the plain string
/// list the API works with.
pub fn flatten_list(list: Vec<Option<String>>) -> Vec<String> {
    list.into_iter().flatten().collect()
}

/// The inverse of [`flatten_list`], for binding to array columns.
pub fn to_db_list(list: &[String]) -> Vec<Option<String>> {
    list.iter().map(|s| Some(s.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(n: u8) -> Uuid {
        Uuid::from_u128(n as u128)
    }

    #[test]
    fn average_of_empty_ratings_is_zero() {
        assert_eq!(Ratings::default().average(), 0.0);
    }

    #[test]
    fn average_rounds_to_one_decimal() {
        let mut ratings = Ratings::default();
        ratings.add_or_update(user(1), 4);
        ratings.add_or_update(user(2), 5);
        ratings.add_or_update(user(3), 3);
        assert_eq!(ratings.average(), 4.0);

        let mut ratings = Ratings::default();
        ratings.add_or_update(user(1), 4);
        ratings.add_or_update(user(2), 4);
        ratings.add_or_update(user(3), 5);
        assert_eq!(ratings.average(), 4.3);
    }

    #[test]
    fn rerating_replaces_instead_of_appending() {
        let mut ratings = Ratings::default();
        ratings.add_or_update(user(1), 4);
        ratings.add_or_update(user(2), 5);
        ratings.add_or_update(user(3), 3);
        ratings.add_or_update(user(2), 2);

        assert_eq!(ratings.0.len(), 3);
        assert_eq!(ratings.for_user(user(2)), 2);
        assert_eq!(ratings.average(), 3.0);
    }

    #[test]
    fn repeated_ratings_keep_one_entry_per_user() {
        let mut ratings = Ratings::default();
        for value in [1, 5, 3, 3, 2] {
            ratings.add_or_update(user(7), value);
        }
        assert_eq!(ratings.0.len(), 1);
        assert_eq!(ratings.for_user(user(7)), 2);
    }

    #[test]
    fn for_user_without_rating_is_zero() {
        let mut ratings = Ratings::default();
        ratings.add_or_update(user(1), 5);
        assert_eq!(ratings.for_user(user(2)), 0);
    }

    #[test]
    fn malformed_ratings_document_reads_as_empty() {
        let ratings = Ratings::parse(&serde_json::json!({"not": "a list"}));
        assert_eq!(ratings, Ratings::default());
        let ratings = Ratings::parse(&serde_json::json!([{"user": 3}]));
        assert_eq!(ratings, Ratings::default());
    }

    #[test]
    fn ratings_round_trip_through_json() {
        let mut ratings = Ratings::default();
        ratings.add_or_update(user(1), 4);
        ratings.add_or_update(user(2), 2);
        let value = serde_json::to_value(&ratings).unwrap();
        assert_eq!(Ratings::parse(&value), ratings);
    }

    #[test]
    fn category_parsing_is_case_sensitive() {
        assert_eq!(Category::parse("Vegan"), Some(Category::Vegan));
        assert_eq!(Category::parse("vegan"), None);
        assert_eq!(Category::parse("Fish"), None);
    }

    #[test]
    fn author_snapshot_tolerates_malformed_documents() {
        let snapshot = AuthorSnapshot::parse(&serde_json::json!("nonsense"));
        assert_eq!(snapshot, AuthorSnapshot::default());
    }
}

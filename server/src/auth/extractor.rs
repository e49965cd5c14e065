use crate::api::ErrorResponse;
use crate::models::User;
use crate::schema::users;
use crate::AppState;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use diesel::prelude::*;
use std::convert::Infallible;

use super::jwt;

/// Extractor for handlers that require a logged-in user. Rejects the request
/// with a 401 before the handler body runs.
pub struct AuthUser(pub User);

/// Extractor for handlers that adapt to a viewer but work without one. A
/// missing or invalid token reads as anonymous instead of rejecting.
pub struct MaybeAuthUser(pub Option<User>);

#[derive(Debug)]
pub enum AuthError {
    MissingHeader,
    InvalidHeader,
    InvalidFormat,
    InvalidToken,
}

impl AuthError {
    fn message(&self) -> &'static str {
        match self {
            AuthError::MissingHeader => "Missing Authorization header",
            AuthError::InvalidHeader => "Invalid Authorization header",
            AuthError::InvalidFormat => "Invalid Authorization header format",
            AuthError::InvalidToken => "Invalid or expired token",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.message().to_string(),
            details: None,
        });
        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        authenticate(parts, &state).map(AuthUser)
    }
}

impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        Ok(MaybeAuthUser(authenticate(parts, &state).ok()))
    }
}

fn authenticate(parts: &Parts, state: &AppState) -> Result<User, AuthError> {
    let token = bearer_token(parts)?;
    let claims = jwt::verify_token(&state.config.jwt_secret, token)
        .map_err(|_| AuthError::InvalidToken)?;
    find_user(state, claims.sub).ok_or(AuthError::InvalidToken)
}

fn bearer_token(parts: &Parts) -> Result<&str, AuthError> {
    let value = parts
        .headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingHeader)?;
    let value = value.to_str().map_err(|_| AuthError::InvalidHeader)?;
    value
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidFormat)
}

fn find_user(state: &AppState, id: uuid::Uuid) -> Option<User> {
    let mut conn = state.pool.get().ok()?;
    users::table
        .find(id)
        .select(User::as_select())
        .first(&mut conn)
        .ok()
}

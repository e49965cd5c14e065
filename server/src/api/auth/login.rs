use crate::api::{ApiError, ErrorResponse};
use crate::auth::{issue_token, verify_password};
use crate::models::User;
use crate::schema::users;
use crate::AppState;
use axum::{extract::State, Json};
use diesel::prelude::*;
use serde::Deserialize;
use utoipa::ToSchema;

use super::AuthResponse;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// A wrong email and a wrong password are indistinguishable from the
/// outside. Both come back as the same 400.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 400, description = "Unknown email or wrong password", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    if req.email.is_empty() || req.password.is_empty() {
        return Err(ApiError::Validation(
            "email and password are required".to_string(),
        ));
    }

    let mut conn = state.pool.get()?;
    let user: Option<User> = users::table
        .filter(users::email.eq(&req.email))
        .select(User::as_select())
        .first(&mut conn)
        .optional()?;

    let Some(user) = user else {
        return Err(ApiError::BadRequest("Invalid credentials"));
    };
    if !verify_password(&req.password, &user.password_hash) {
        return Err(ApiError::BadRequest("Invalid credentials"));
    }

    let token = issue_token(&state.config.jwt_secret, user.id, &user.email).map_err(|e| {
        tracing::error!("Failed to issue token: {}", e);
        ApiError::Internal
    })?;
    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        token,
        user: user.into(),
    }))
}

pub mod login;
pub mod me;
pub mod register;

use crate::models::UserResponse;
use crate::AppState;
use axum::routing::{get, post};
use axum::Router;
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

/// Returned by both register and login: a fresh token plus the user it
/// belongs to.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    pub user: UserResponse,
}

/// Returns the router for /api/auth endpoints (mounted at /api/auth)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register::register))
        .route("/login", post(login::login))
        .route("/me", get(me::me))
}

#[derive(OpenApi)]
#[openapi(
    paths(register::register, login::login, me::me),
    components(schemas(AuthResponse, register::RegisterRequest, login::LoginRequest))
)]
pub struct ApiDoc;

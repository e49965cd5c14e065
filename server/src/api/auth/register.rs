use crate::api::{ApiError, ErrorResponse};
use crate::auth::{hash_password, issue_token};
use crate::models::{NewUser, User};
use crate::schema::users;
use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use serde::Deserialize;
use utoipa::ToSchema;

use super::AuthResponse;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created and logged in", body = AuthResponse),
        (status = 400, description = "Invalid fields or email already taken", body = ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_registration(&req)?;

    let password_hash = hash_password(&req.password).map_err(|e| {
        tracing::error!("Failed to hash password: {}", e);
        ApiError::Internal
    })?;
    // Emails are normalized once at registration. Login matches literally.
    let email = req.email.trim().to_lowercase();
    let new_user = NewUser {
        name: req.name.trim(),
        email: &email,
        password_hash: &password_hash,
    };

    let mut conn = state.pool.get()?;
    let user: User = match diesel::insert_into(users::table)
        .values(&new_user)
        .returning(User::as_returning())
        .get_result(&mut conn)
    {
        Ok(user) => user,
        Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
            return Err(ApiError::BadRequest("User already exists"));
        }
        Err(e) => return Err(e.into()),
    };

    let token = issue_token(&state.config.jwt_secret, user.id, &user.email).map_err(|e| {
        tracing::error!("Failed to issue token: {}", e);
        ApiError::Internal
    })?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User registered successfully".to_string(),
            token,
            user: user.into(),
        }),
    ))
}

fn validate_registration(req: &RegisterRequest) -> Result<(), ApiError> {
    let name_len = req.name.trim().chars().count();
    if !(2..=50).contains(&name_len) {
        return Err(ApiError::Validation(
            "name must be between 2 and 50 characters".to_string(),
        ));
    }
    if !is_valid_email(&req.email) {
        return Err(ApiError::Validation(
            "a valid email address is required".to_string(),
        ));
    }
    if req.password.chars().count() < 6 {
        return Err(ApiError::Validation(
            "password must be at least 6 characters".to_string(),
        ));
    }
    Ok(())
}

fn is_valid_email(email: &str) -> bool {
    if email.len() > 254 || email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn accepts_a_reasonable_registration() {
        assert!(validate_registration(&request("Ada", "ada@example.com", "hunter22")).is_ok());
    }

    #[test]
    fn rejects_short_or_overlong_names() {
        assert!(validate_registration(&request("A", "ada@example.com", "hunter22")).is_err());
        let long_name = "x".repeat(51);
        assert!(validate_registration(&request(&long_name, "ada@example.com", "hunter22")).is_err());
    }

    #[test]
    fn name_length_counts_characters_after_trimming() {
        assert!(validate_registration(&request("  Ada  ", "ada@example.com", "hunter22")).is_ok());
        assert!(validate_registration(&request("  A  ", "ada@example.com", "hunter22")).is_err());
    }

    #[test]
    fn rejects_short_passwords() {
        assert!(validate_registration(&request("Ada", "ada@example.com", "12345")).is_err());
        assert!(validate_registration(&request("Ada", "ada@example.com", "123456")).is_ok());
    }

    #[test]
    fn email_validation() {
        assert!(is_valid_email("ada@example.com"));
        assert!(is_valid_email("a.b+tag@sub.example.org"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ada@nodot"));
        assert!(!is_valid_email("ada@.example.com"));
        assert!(!is_valid_email("ada bee@example.com"));
    }
}

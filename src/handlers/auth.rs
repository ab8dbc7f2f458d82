// src/handlers/auth.rs

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use validator::Validate;

use crate::{
    config::Config,
    db::{Db, is_unique_violation},
    error::AppError,
    models::user::{
        AuthResponse, LoginRequest, NewUser, ProfileResponse, ROLE_USER, RegisterRequest,
    },
    utils::{
        html::clean_html,
        jwt::{Claims, sign_jwt},
        password::{hash_password, verify_password},
    },
};

/// Emails are matched case-insensitively.
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Registers a new user.
///
/// Public registration always creates a regular user; admins are seeded at
/// startup. Returns 201 Created with a token so the client is logged in.
pub async fn register(
    State(db): State<Db>,
    State(config): State<Config>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let email = normalize_email(&payload.email);
    let hashed_password = hash_password(&payload.password)?;

    let user = db
        .create_user(NewUser {
            name: clean_html(&payload.name),
            email: email.clone(),
            password_hash: hashed_password,
            role: ROLE_USER.to_string(),
        })
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict(format!("User '{}' already exists", email))
            } else {
                tracing::error!("Failed to register user: {:?}", e);
                AppError::from(e)
            }
        })?;

    tracing::info!("User registered: {}", user.id);

    let token = sign_jwt(&user.id, &user.role, &config.jwt_secret, config.jwt_expiration)?;

    Ok((StatusCode::CREATED, Json(AuthResponse::new(user, token))))
}

/// Authenticates a user and returns a JWT token.
pub async fn login(
    State(db): State<Db>,
    State(config): State<Config>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let user = db
        .find_user_by_email(&normalize_email(&payload.email))
        .await
        .map_err(|e| {
            tracing::error!("Login DB error: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    // Same message for unknown email and wrong password.
    let invalid = || AppError::AuthError("Invalid email or password".to_string());

    let user = user.ok_or_else(invalid)?;

    if !verify_password(&payload.password, &user.password)? {
        return Err(invalid());
    }

    let token = sign_jwt(&user.id, &user.role, &config.jwt_secret, config.jwt_expiration)?;

    Ok(Json(AuthResponse::new(user, token)))
}

/// Returns the profile of the token holder.
pub async fn profile(
    State(db): State<Db>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user = db
        .find_user_by_id(&claims.sub)
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    Ok(Json(ProfileResponse::from(user)))
}

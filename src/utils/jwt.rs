// src/utils/jwt.rs

use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{config::Config, db::Db, error::AppError, models::user::ROLE_ADMIN};

/// JWT Claims structure.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Claims {
    /// Subject - Stores the User ID.
    pub sub: String,
    /// User's role (e.g., 'user', 'admin').
    pub role: String,
    /// Expiration time as Unix timestamp.
    pub exp: usize,
}

impl Claims {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }

    /// True if the caller is `user_id` or an admin.
    pub fn can_access(&self, user_id: &str) -> bool {
        self.sub == user_id || self.is_admin()
    }
}

/// The caller of a route that works with or without a token.
/// Inserted by `optional_auth_middleware`.
#[derive(Debug, Clone, Default)]
pub struct Viewer(pub Option<Claims>);

impl Viewer {
    pub fn is_admin(&self) -> bool {
        self.0.as_ref().is_some_and(Claims::is_admin)
    }

    /// Returns the admin's claims, or 401/403 for anonymous/non-admin callers.
    pub fn require_admin(&self) -> Result<&Claims, AppError> {
        let claims = self
            .0
            .as_ref()
            .ok_or_else(|| AppError::AuthError("Not authorized, no token".to_string()))?;

        if !claims.is_admin() {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }

        Ok(claims)
    }
}

/// Signs a new JWT for the user.
pub fn sign_jwt(
    user_id: &str,
    role: &str,
    secret: &str,
    expiration_seconds: u64,
) -> Result<String, AppError> {
    let expiration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .as_secs() as usize
        + expiration_seconds as usize;

    let claims = Claims {
        sub: user_id.to_owned(),
        role: role.to_owned(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(e.to_string()))
}

/// Verifies and decodes a JWT string.
///
/// Returns the `Claims` if valid, otherwise returns an `AppError`.
pub fn verify_jwt(token: &str, secret: &str) -> Result<Claims, AppError> {
    let token_data = decode(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::AuthError("Invalid token".to_string()))?;

    Ok(token_data.claims)
}

fn bearer_token(req: &Request<Body>) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

/// Axum Middleware: Authentication.
///
/// Intercepts requests, validates the 'Authorization: Bearer <token>' header
/// and checks that the token's user still exists.
/// If valid, injects `Claims` (with the stored role) into the request
/// extensions for handlers to use. Otherwise returns 401 Unauthorized.
pub async fn auth_middleware(
    State(config): State<Config>,
    State(db): State<Db>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = bearer_token(&req).ok_or(StatusCode::UNAUTHORIZED)?;

    let mut claims = match verify_jwt(token, &config.jwt_secret) {
        Ok(claims) => claims,
        Err(_) => {
            tracing::warn!("Rejected request with invalid token to {}", req.uri().path());
            return Err(StatusCode::UNAUTHORIZED);
        }
    };

    let user = db.find_user_by_id(&claims.sub).await.map_err(|e| {
        tracing::error!("Failed to load token user: {:?}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let Some(user) = user else {
        tracing::warn!("Rejected token for unknown user {}", claims.sub);
        return Err(StatusCode::UNAUTHORIZED);
    };

    claims.role = user.role;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Axum Middleware: Optional Authentication.
///
/// Never rejects. Injects a `Viewer` holding the claims of a valid token, or
/// an anonymous viewer otherwise.
pub async fn optional_auth_middleware(
    State(config): State<Config>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let claims = bearer_token(&req).and_then(|token| verify_jwt(token, &config.jwt_secret).ok());
    req.extensions_mut().insert(Viewer(claims));
    next.run(req).await
}

/// Axum Middleware: Admin Authorization.
///
/// Must be used AFTER `auth_middleware`. Checks if the injected `Claims` has 'admin' role.
/// If not, returns 403 Forbidden.
pub async fn admin_middleware(req: Request<Body>, next: Next) -> Result<Response, StatusCode> {
    let claims = req
        .extensions()
        .get::<Claims>()
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if !claims.is_admin() {
        return Err(StatusCode::FORBIDDEN);
    }

    Ok(next.run(req).await)
}

// src/models/user.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

pub const ROLE_USER: &str = "user";
pub const ROLE_ADMIN: &str = "admin";

/// Represents a row of the users table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    /// UUID v4 string.
    pub id: String,

    /// Display name shown on leaderboards.
    pub name: String,

    /// Unique, stored lowercased.
    pub email: String,

    /// Argon2 password hash.
    /// Skipped during serialization to prevent leaking sensitive data.
    #[serde(skip)]
    pub password: String,

    /// User role: 'user' or 'admin'.
    pub role: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

/// Fields needed to insert a user; the id and timestamps are generated.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
}

/// DTO for creating a new user (Registration).
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Name length must be between 1 and 100 characters."
    ))]
    pub name: String,
    #[validate(email(message = "Email address is not valid."))]
    pub email: String,
    #[validate(length(
        min = 6,
        max = 128,
        message = "Password length must be between 6 and 128 characters."
    ))]
    pub password: String,
}

/// DTO for user login.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 254))]
    pub email: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// Returned by register and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub token: String,
}

impl AuthResponse {
    pub fn new(user: User, token: String) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            token,
        }
    }
}

/// Public view of the current user.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

/// Reference to a user embedded in result listings.
/// `email` is only filled for admin and owner views.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserRef {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl UserRef {
    pub fn public(user: Option<&User>) -> Self {
        Self {
            id: user.map(|u| u.id.clone()),
            name: user.map(|u| u.name.clone()),
            email: None,
        }
    }

    pub fn detailed(user: Option<&User>) -> Self {
        Self {
            email: user.map(|u| u.email.clone()),
            ..Self::public(user)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_rejects_bad_email() {
        let req = RegisterRequest {
            name: "Ada".to_string(),
            email: "not-an-email".to_string(),
            password: "password123".to_string(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn register_rejects_short_password() {
        let req = RegisterRequest {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "123".to_string(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn public_user_ref_hides_email() {
        let now = Utc::now();
        let user = User {
            id: "u1".to_string(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "hash".to_string(),
            role: ROLE_USER.to_string(),
            created_at: now,
            updated_at: now,
        };

        let public = serde_json::to_value(UserRef::public(Some(&user))).unwrap();
        assert_eq!(public["name"], "Ada");
        assert!(public.get("email").is_none());

        let detailed = serde_json::to_value(UserRef::detailed(Some(&user))).unwrap();
        assert_eq!(detailed["email"], "ada@example.com");

        let missing = serde_json::to_value(UserRef::public(None)).unwrap();
        assert!(missing["id"].is_null());
    }
}

// src/seed.rs

use crate::{
    config::Config,
    db::Db,
    error::AppError,
    models::user::{NewUser, ROLE_ADMIN},
    utils::password::hash_password,
};

/// Ensures the admin account from `ADMIN_EMAIL`/`ADMIN_PASSWORD` exists.
///
/// Does nothing when either variable is unset. An existing account with that
/// email is promoted to admin; its password is left alone.
pub async fn seed_admin_user(db: &Db, config: &Config) -> Result<(), AppError> {
    let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) else {
        return Ok(());
    };
    let email = email.trim().to_lowercase();

    match db.find_user_by_email(&email).await? {
        Some(user) if user.is_admin() => {
            tracing::info!("Admin user already exists: {}", email);
        }
        Some(user) => {
            tracing::warn!("Promoting existing user {} to admin", email);
            db.set_user_role(&user.id, ROLE_ADMIN).await?;
        }
        None => {
            tracing::info!("Seeding admin user: {}", email);
            db.create_user(NewUser {
                name: config.admin_name.clone(),
                email,
                password_hash: hash_password(password)?,
                role: ROLE_ADMIN.to_string(),
            })
            .await?;
            tracing::info!("Admin user created successfully.");
        }
    }

    Ok(())
}

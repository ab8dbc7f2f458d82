// src/db/user.rs

use std::collections::HashMap;

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite};
use uuid::Uuid;

use super::Db;
use crate::models::user::{NewUser, User};

const USER_COLUMNS: &str = "id, name, email, password, role, created_at, updated_at";

impl Db {
    /// Inserts a user. A duplicate email surfaces as a unique violation.
    pub async fn create_user(&self, new_user: NewUser) -> Result<User, sqlx::Error> {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4().to_string(),
            name: new_user.name,
            email: new_user.email,
            password: new_user.password_hash,
            role: new_user.role,
            created_at: now,
            updated_at: now,
        };

        let sql = format!(
            "INSERT INTO {} ({}) VALUES (?, ?, ?, ?, ?, ?, ?)",
            self.tables.users, USER_COLUMNS
        );
        sqlx::query(&sql)
            .bind(&user.id)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password)
            .bind(&user.role)
            .bind(user.created_at)
            .bind(user.updated_at)
            .execute(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM {} WHERE email = ?",
            USER_COLUMNS, self.tables.users
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn find_user_by_id(&self, id: &str) -> Result<Option<User>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = ?",
            USER_COLUMNS, self.tables.users
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Batch lookup keyed by user id. Unknown ids are simply absent.
    pub async fn find_users_by_ids(
        &self,
        ids: &[&str],
    ) -> Result<HashMap<String, User>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut query_builder = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {} FROM {} WHERE id IN (",
            USER_COLUMNS, self.tables.users
        ));
        let mut separated = query_builder.separated(",");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let users: Vec<User> = query_builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await?;

        Ok(users.into_iter().map(|u| (u.id.clone(), u)).collect())
    }

    pub async fn set_user_role(&self, id: &str, role: &str) -> Result<bool, sqlx::Error> {
        let sql = format!(
            "UPDATE {} SET role = ?, updated_at = ? WHERE id = ?",
            self.tables.users
        );
        let result = sqlx::query(&sql)
            .bind(role)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

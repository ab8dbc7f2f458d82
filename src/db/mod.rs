// src/db/mod.rs

//! Storage collaborator. Every query targets the table names the handle was
//! built with.

use std::time::Duration;

use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

use crate::config::TableNames;

mod quiz;
mod result;
mod schema;
mod user;

/// Main database handle.
#[derive(Clone)]
pub struct Db {
    pool: SqlitePool,
    tables: TableNames,
}

impl Db {
    pub fn new(pool: SqlitePool, tables: TableNames) -> Self {
        Self { pool, tables }
    }

    /// Opens a pool for `url` without touching the schema.
    pub async fn connect(url: &str, tables: TableNames) -> Result<Self, sqlx::Error> {
        let options: SqliteConnectOptions = url.parse()?;
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect_with(options.create_if_missing(true))
            .await?;

        Ok(Self::new(pool, tables))
    }
}

/// True for UNIQUE constraint failures (e.g. a duplicate email).
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|e| e.is_unique_violation())
}

// src/db/schema.rs

use super::Db;

impl Db {
    /// Creates tables and lookup indexes if they do not exist yet.
    pub async fn init_schema(&self) -> Result<(), sqlx::Error> {
        let t = &self.tables;

        let statements = [
            format!(
                r#"
                CREATE TABLE IF NOT EXISTS {users} (
                    id TEXT PRIMARY KEY,
                    name TEXT NOT NULL,
                    email TEXT NOT NULL UNIQUE,
                    password TEXT NOT NULL,
                    role TEXT NOT NULL DEFAULT 'user',
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                )
                "#,
                users = t.users
            ),
            format!(
                r#"
                CREATE TABLE IF NOT EXISTS {quizzes} (
                    id TEXT PRIMARY KEY,
                    title TEXT NOT NULL,
                    description TEXT NOT NULL,
                    time_limit INTEGER NOT NULL,
                    questions TEXT NOT NULL,
                    image_url TEXT,
                    is_published BOOLEAN NOT NULL DEFAULT 0,
                    created_by TEXT NOT NULL,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                )
                "#,
                quizzes = t.quizzes
            ),
            // No foreign keys: results outlive deleted quizzes and users.
            format!(
                r#"
                CREATE TABLE IF NOT EXISTS {results} (
                    id TEXT PRIMARY KEY,
                    user_id TEXT NOT NULL,
                    quiz_id TEXT NOT NULL,
                    score INTEGER NOT NULL,
                    total_possible_score INTEGER NOT NULL,
                    time_taken INTEGER NOT NULL,
                    answers TEXT NOT NULL,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                )
                "#,
                results = t.results
            ),
            format!(
                "CREATE INDEX IF NOT EXISTS {results}_user_id_idx ON {results} (user_id)",
                results = t.results
            ),
            format!(
                "CREATE INDEX IF NOT EXISTS {results}_quiz_id_idx ON {results} (quiz_id)",
                results = t.results
            ),
        ];

        for statement in &statements {
            sqlx::query(statement).execute(&self.pool).await?;
        }

        tracing::info!(
            "Schema ready (tables: {}, {}, {})",
            t.users,
            t.quizzes,
            t.results
        );
        Ok(())
    }
}

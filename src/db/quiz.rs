// src/db/quiz.rs

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{FromRow, QueryBuilder, Sqlite, types::Json};

use super::Db;
use crate::models::quiz::{Question, Quiz};

const QUIZ_COLUMNS: &str = "id, title, description, time_limit, questions, image_url, \
                            is_published, created_by, created_at, updated_at";

/// Row shape of the quizzes table; questions live in a JSON column.
#[derive(FromRow)]
struct QuizRow {
    id: String,
    title: String,
    description: String,
    time_limit: i64,
    questions: Json<Vec<Question>>,
    image_url: Option<String>,
    is_published: bool,
    created_by: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<QuizRow> for Quiz {
    fn from(row: QuizRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            time_limit: row.time_limit,
            questions: row.questions.0,
            image_url: row.image_url,
            is_published: row.is_published,
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl Db {
    pub async fn create_quiz(&self, quiz: &Quiz) -> Result<(), sqlx::Error> {
        let sql = format!(
            "INSERT INTO {} ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            self.tables.quizzes, QUIZ_COLUMNS
        );
        sqlx::query(&sql)
            .bind(&quiz.id)
            .bind(&quiz.title)
            .bind(&quiz.description)
            .bind(quiz.time_limit)
            .bind(Json(&quiz.questions))
            .bind(&quiz.image_url)
            .bind(quiz.is_published)
            .bind(&quiz.created_by)
            .bind(quiz.created_at)
            .bind(quiz.updated_at)
            .execute(&self.pool)
            .await?;

        tracing::info!("Quiz created: {} ({} questions)", quiz.id, quiz.questions.len());
        Ok(())
    }

    pub async fn get_quiz(&self, id: &str) -> Result<Option<Quiz>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = ?",
            QUIZ_COLUMNS, self.tables.quizzes
        );
        let row = sqlx::query_as::<_, QuizRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Quiz::from))
    }

    /// Newest first. `published_only` hides drafts.
    pub async fn list_quizzes(&self, published_only: bool) -> Result<Vec<Quiz>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM {} WHERE (? = 0 OR is_published = 1) ORDER BY created_at DESC",
            QUIZ_COLUMNS, self.tables.quizzes
        );
        let rows = sqlx::query_as::<_, QuizRow>(&sql)
            .bind(published_only)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Quiz::from).collect())
    }

    /// Batch lookup keyed by quiz id. Deleted quizzes are simply absent.
    pub async fn find_quizzes_by_ids(
        &self,
        ids: &[&str],
    ) -> Result<HashMap<String, Quiz>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut query_builder = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {} FROM {} WHERE id IN (",
            QUIZ_COLUMNS, self.tables.quizzes
        ));
        let mut separated = query_builder.separated(",");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let rows: Vec<QuizRow> = query_builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| (row.id.clone(), Quiz::from(row)))
            .collect())
    }

    /// Overwrites the stored document. Returns false if the quiz is gone.
    pub async fn update_quiz(&self, quiz: &Quiz) -> Result<bool, sqlx::Error> {
        let sql = format!(
            r#"
            UPDATE {} SET
                title = ?, description = ?, time_limit = ?, questions = ?,
                image_url = ?, is_published = ?, updated_at = ?
            WHERE id = ?
            "#,
            self.tables.quizzes
        );
        let result = sqlx::query(&sql)
            .bind(&quiz.title)
            .bind(&quiz.description)
            .bind(quiz.time_limit)
            .bind(Json(&quiz.questions))
            .bind(&quiz.image_url)
            .bind(quiz.is_published)
            .bind(quiz.updated_at)
            .bind(&quiz.id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes the quiz only; its results are kept.
    pub async fn delete_quiz(&self, id: &str) -> Result<bool, sqlx::Error> {
        let sql = format!("DELETE FROM {} WHERE id = ?", self.tables.quizzes);
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;

        Ok(result.rows_affected() > 0)
    }
}

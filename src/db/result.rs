// src/db/result.rs

use chrono::{DateTime, Utc};
use sqlx::{FromRow, types::Json};

use super::Db;
use crate::models::result::{GradedAnswer, QuizResult};

const RESULT_COLUMNS: &str = "id, user_id, quiz_id, score, total_possible_score, time_taken, \
                              answers, created_at, updated_at";

#[derive(FromRow)]
struct ResultRow {
    id: String,
    user_id: String,
    quiz_id: String,
    score: i64,
    total_possible_score: i64,
    time_taken: i64,
    answers: Json<Vec<GradedAnswer>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ResultRow> for QuizResult {
    fn from(row: ResultRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            quiz_id: row.quiz_id,
            score: row.score,
            total_possible_score: row.total_possible_score,
            time_taken: row.time_taken,
            answers: row.answers.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl Db {
    /// Results are insert-only; there is no update or delete.
    pub async fn create_result(&self, result: &QuizResult) -> Result<(), sqlx::Error> {
        let sql = format!(
            "INSERT INTO {} ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            self.tables.results, RESULT_COLUMNS
        );
        sqlx::query(&sql)
            .bind(&result.id)
            .bind(&result.user_id)
            .bind(&result.quiz_id)
            .bind(result.score)
            .bind(result.total_possible_score)
            .bind(result.time_taken)
            .bind(Json(&result.answers))
            .bind(result.created_at)
            .bind(result.updated_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn get_result(&self, id: &str) -> Result<Option<QuizResult>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = ?",
            RESULT_COLUMNS, self.tables.results
        );
        let row = sqlx::query_as::<_, ResultRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(QuizResult::from))
    }

    /// A user's attempts, newest first.
    pub async fn results_by_user(&self, user_id: &str) -> Result<Vec<QuizResult>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM {} WHERE user_id = ? ORDER BY created_at DESC, rowid DESC",
            RESULT_COLUMNS, self.tables.results
        );
        let rows = sqlx::query_as::<_, ResultRow>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(QuizResult::from).collect())
    }

    /// All attempts at a quiz in submission order. Ranking keeps this order
    /// for entries tied on both score and time.
    pub async fn results_by_quiz(&self, quiz_id: &str) -> Result<Vec<QuizResult>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM {} WHERE quiz_id = ? ORDER BY created_at ASC, rowid ASC",
            RESULT_COLUMNS, self.tables.results
        );
        let rows = sqlx::query_as::<_, ResultRow>(&sql)
            .bind(quiz_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(QuizResult::from).collect())
    }
}

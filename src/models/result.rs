// src/models/result.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

use crate::{
    grading::{Grade, Rankable},
    models::{quiz::Quiz, user::UserRef},
};

/// One answer as sent by the client. Either field may be missing, malformed,
/// or point at nothing; grading treats that as unanswered or incorrect.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedAnswer {
    #[serde(default, deserialize_with = "lenient_question_id")]
    pub question_id: String,
    #[serde(default, deserialize_with = "lenient_option")]
    pub selected_option: Option<String>,
}

impl From<&Value> for SubmittedAnswer {
    fn from(value: &Value) -> Self {
        Self {
            question_id: value
                .get("questionId")
                .and_then(id_string)
                .unwrap_or_default(),
            selected_option: value.get("selectedOption").and_then(id_string),
        }
    }
}

/// Ids may arrive as strings or numbers. Anything else is no id at all.
fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn lenient_question_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(id_string(&value).unwrap_or_default())
}

fn lenient_option<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(id_string(&value))
}

/// Accepts any JSON for `answers`. Entries that are not objects become empty
/// answers; a non-array becomes no answers.
fn lenient_answers<'de, D>(deserializer: D) -> Result<Vec<SubmittedAnswer>, D::Error>
where
    D: Deserializer<'de>,
{
    let answers = match Value::deserialize(deserializer)? {
        Value::Array(items) => items.iter().map(SubmittedAnswer::from).collect(),
        _ => Vec::new(),
    };
    Ok(answers)
}

/// Post-grading record of one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradedAnswer {
    pub question_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_option: Option<String>,
    pub is_correct: bool,
}

/// One user's graded attempt at a quiz. Never updated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub id: String,
    pub user_id: String,
    pub quiz_id: String,
    pub score: i64,
    pub total_possible_score: i64,

    /// In seconds.
    pub time_taken: i64,

    pub answers: Vec<GradedAnswer>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl QuizResult {
    pub fn new(user_id: String, quiz_id: String, grade: Grade, time_taken: i64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            quiz_id,
            score: grade.score,
            total_possible_score: grade.total_possible_score,
            time_taken,
            answers: grade.answers,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Rankable for QuizResult {
    fn score(&self) -> i64 {
        self.score
    }

    fn time_taken(&self) -> i64 {
        self.time_taken
    }
}

/// DTO for submitting a quiz attempt.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuizRequest {
    /// Forwarded to grading unfiltered.
    #[serde(default, deserialize_with = "lenient_answers")]
    pub answers: Vec<SubmittedAnswer>,

    #[validate(range(min = 0, message = "Time taken cannot be negative"))]
    pub time_taken: i64,
}

/// Minimal quiz reference embedded in a user's history.
#[derive(Debug, Default, Serialize)]
pub struct QuizRef {
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

impl From<Option<&Quiz>> for QuizRef {
    fn from(quiz: Option<&Quiz>) -> Self {
        Self {
            id: quiz.map(|q| q.id.clone()),
            title: quiz.map(|q| q.title.clone()),
            description: quiz.map(|q| q.description.clone()),
        }
    }
}

/// Entry of `GET /api/result/user/{id}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResultEntry {
    pub id: String,
    pub user: String,
    pub quiz: QuizRef,
    pub score: i64,
    pub total_possible_score: i64,
    pub time_taken: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Entry of the admin "all results for a quiz" view.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResultEntry {
    pub id: String,
    pub user: UserRef,
    pub quiz: String,
    pub score: i64,
    pub total_possible_score: i64,
    pub time_taken: i64,
    pub created_at: DateTime<Utc>,
}

/// Aggregated struct for displaying the leaderboard.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub id: String,
    pub user: UserRef,
    pub score: i64,
    pub time_taken: i64,
    pub created_at: DateTime<Utc>,
}

/// Detailed report of one attempt, including the answer key.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultReport {
    pub id: String,
    pub user: UserRef,
    /// `None` when the quiz was deleted after the attempt.
    pub quiz: Option<Quiz>,
    pub score: i64,
    pub total_possible_score: i64,
    pub time_taken: i64,
    pub answers: Vec<GradedAnswer>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

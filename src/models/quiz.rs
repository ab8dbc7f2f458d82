// src/models/quiz.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::{DEFAULT_QUESTION_POINTS, DEFAULT_TIME_LIMIT_MINUTES},
    utils::html::clean_html,
};

/// A selectable answer. Owned by its question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOption {
    pub id: String,
    pub text: String,
    pub is_correct: bool,
}

/// A multiple-choice question. Owned by its quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,

    /// Prompt text.
    pub question: String,

    /// Awarded when the selected option is correct. Always >= 1.
    pub points: i64,

    pub options: Vec<AnswerOption>,
}

/// A quiz document. Questions and options are stored inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: String,
    pub title: String,
    pub description: String,

    /// In minutes.
    pub time_limit: i64,

    pub questions: Vec<Question>,
    pub image_url: Option<String>,
    pub is_published: bool,

    /// Id of the admin who authored the quiz.
    pub created_by: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Quiz listing entry (no questions).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSummary {
    pub id: String,
    pub title: String,
    pub description: String,
    pub time_limit: i64,
    pub question_count: usize,
    pub image_url: Option<String>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Quiz> for QuizSummary {
    fn from(quiz: &Quiz) -> Self {
        Self {
            id: quiz.id.clone(),
            title: quiz.title.clone(),
            description: quiz.description.clone(),
            time_limit: quiz.time_limit,
            question_count: quiz.questions.len(),
            image_url: quiz.image_url.clone(),
            is_published: quiz.is_published,
            created_at: quiz.created_at,
        }
    }
}

/// DTO for sending an option to quiz takers (excludes the correct flag).
#[derive(Debug, Serialize)]
pub struct PublicOption {
    pub id: String,
    pub text: String,
}

/// DTO for sending a question to quiz takers.
#[derive(Debug, Serialize)]
pub struct PublicQuestion {
    pub id: String,
    pub question: String,
    pub points: i64,
    pub options: Vec<PublicOption>,
}

/// Quiz as seen by non-admin users.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicQuiz {
    pub id: String,
    pub title: String,
    pub description: String,
    pub time_limit: i64,
    pub questions: Vec<PublicQuestion>,
    pub image_url: Option<String>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Quiz> for PublicQuiz {
    fn from(quiz: Quiz) -> Self {
        let questions = quiz
            .questions
            .into_iter()
            .map(|q| PublicQuestion {
                id: q.id,
                question: q.question,
                points: q.points,
                options: q
                    .options
                    .into_iter()
                    .map(|o| PublicOption { id: o.id, text: o.text })
                    .collect(),
            })
            .collect();

        Self {
            id: quiz.id,
            title: quiz.title,
            description: quiz.description,
            time_limit: quiz.time_limit,
            questions,
            image_url: quiz.image_url,
            is_published: quiz.is_published,
            created_at: quiz.created_at,
            updated_at: quiz.updated_at,
        }
    }
}

/// Option as sent by the quiz editor. `id` is kept on update when present.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionInput {
    #[serde(default, alias = "_id")]
    pub id: Option<String>,
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

/// Question as sent by the quiz editor.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuestionInput {
    #[serde(default, alias = "_id")]
    pub id: Option<String>,
    #[validate(length(
        min = 1,
        max = 1000,
        message = "Question text must be between 1 and 1000 chars"
    ))]
    pub question: String,
    #[validate(range(min = 1, max = 1000, message = "Points must be between 1 and 1000"))]
    pub points: Option<i64>,
    #[validate(custom(function = validate_options))]
    pub options: Vec<OptionInput>,
}

/// DTO for creating a quiz.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuizRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 chars"))]
    pub title: String,
    #[validate(length(
        min = 1,
        max = 2000,
        message = "Description must be between 1 and 2000 chars"
    ))]
    pub description: String,
    #[validate(range(min = 1, max = 1440, message = "Time limit must be between 1 and 1440 minutes"))]
    pub time_limit: Option<i64>,
    #[validate(length(min = 1, message = "A quiz needs at least one question"), nested)]
    pub questions: Vec<QuestionInput>,
    #[validate(custom(function = validate_image_url))]
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_published: bool,
}

/// DTO for updating a quiz. Absent fields are left untouched.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuizRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 chars"))]
    pub title: Option<String>,
    #[validate(length(
        min = 1,
        max = 2000,
        message = "Description must be between 1 and 2000 chars"
    ))]
    pub description: Option<String>,
    #[validate(range(min = 1, max = 1440, message = "Time limit must be between 1 and 1440 minutes"))]
    pub time_limit: Option<i64>,
    #[validate(length(min = 1, message = "A quiz needs at least one question"), nested)]
    pub questions: Option<Vec<QuestionInput>>,
    #[validate(custom(function = validate_image_url))]
    pub image_url: Option<String>,
    pub is_published: Option<bool>,
}

fn validate_options(options: &[OptionInput]) -> Result<(), validator::ValidationError> {
    if options.is_empty() {
        return Err(validator::ValidationError::new("options_cannot_be_empty"));
    }
    for opt in options {
        if opt.text.trim().is_empty() || opt.text.len() > 500 {
            return Err(validator::ValidationError::new("option_text_length"));
        }
    }
    if !options.iter().any(|o| o.is_correct) {
        return Err(validator::ValidationError::new("no_correct_option"));
    }
    Ok(())
}

fn validate_image_url(url: &str) -> Result<(), validator::ValidationError> {
    if url.len() > 2048 {
        return Err(validator::ValidationError::new("url_too_long"));
    }
    if Url::parse(url).is_err() {
        return Err(validator::ValidationError::new("invalid_url"));
    }
    Ok(())
}

/// Keeps a client-supplied id, or mints a fresh one.
fn id_or_new(id: Option<String>) -> String {
    id.filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// Turns editor input into stored questions: trimmed text, default points,
/// and ids for anything new. Question and option text is stored as written;
/// escaping on display is up to the client.
pub fn build_questions(inputs: Vec<QuestionInput>) -> Vec<Question> {
    inputs
        .into_iter()
        .map(|q| Question {
            id: id_or_new(q.id),
            question: q.question.trim().to_string(),
            points: q.points.unwrap_or(DEFAULT_QUESTION_POINTS),
            options: q
                .options
                .into_iter()
                .map(|o| AnswerOption {
                    id: id_or_new(o.id),
                    text: o.text.trim().to_string(),
                    is_correct: o.is_correct,
                })
                .collect(),
        })
        .collect()
}

impl Quiz {
    pub fn new(req: CreateQuizRequest, created_by: String) -> Self {
        let now = Utc::now();
        // Editor-side ids are temporary on creation.
        let questions = req
            .questions
            .into_iter()
            .map(|q| QuestionInput {
                id: None,
                options: q
                    .options
                    .into_iter()
                    .map(|o| OptionInput { id: None, ..o })
                    .collect(),
                ..q
            })
            .collect();

        Self {
            id: Uuid::new_v4().to_string(),
            title: clean_html(&req.title),
            description: clean_html(&req.description),
            time_limit: req.time_limit.unwrap_or(DEFAULT_TIME_LIMIT_MINUTES),
            questions: build_questions(questions),
            image_url: req.image_url,
            is_published: req.is_published,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a partial update and bumps `updated_at`.
    pub fn apply(&mut self, req: UpdateQuizRequest) {
        if let Some(title) = req.title {
            self.title = clean_html(&title);
        }
        if let Some(description) = req.description {
            self.description = clean_html(&description);
        }
        if let Some(time_limit) = req.time_limit {
            self.time_limit = time_limit;
        }
        if let Some(questions) = req.questions {
            self.questions = build_questions(questions);
        }
        if req.image_url.is_some() {
            self.image_url = req.image_url;
        }
        if let Some(is_published) = req.is_published {
            self.is_published = is_published;
        }
        self.updated_at = Utc::now();
    }

    /// Sum of all question point values.
    pub fn total_points(&self) -> i64 {
        self.questions.iter().map(|q| q.points).sum()
    }
}

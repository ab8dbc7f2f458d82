// src/handlers/quiz.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use validator::Validate;

use crate::{
    db::Db,
    error::AppError,
    models::quiz::{CreateQuizRequest, PublicQuiz, Quiz, QuizSummary, UpdateQuizRequest},
    utils::jwt::Viewer,
};

/// Lists quizzes, newest first.
///
/// Admins see drafts too; everyone else only published quizzes.
pub async fn list_quizzes(
    State(db): State<Db>,
    Extension(viewer): Extension<Viewer>,
) -> Result<impl IntoResponse, AppError> {
    let quizzes = db.list_quizzes(!viewer.is_admin()).await.map_err(|e| {
        tracing::error!("Failed to list quizzes: {:?}", e);
        AppError::from(e)
    })?;

    let summaries: Vec<QuizSummary> = quizzes.iter().map(QuizSummary::from).collect();

    Ok(Json(summaries))
}

/// Fetches one quiz for taking or editing.
///
/// Drafts are admin-only. Non-admins get the quiz without the answer key.
pub async fn get_quiz(
    State(db): State<Db>,
    Extension(viewer): Extension<Viewer>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let quiz = db
        .get_quiz(&id)
        .await?
        .ok_or(AppError::NotFound("Quiz not found".to_string()))?;

    if viewer.is_admin() {
        return Ok(Json(quiz).into_response());
    }

    if !quiz.is_published {
        return Err(AppError::Forbidden("Quiz is not published".to_string()));
    }

    Ok(Json(PublicQuiz::from(quiz)).into_response())
}

/// Creates a quiz.
/// Admin only.
pub async fn create_quiz(
    State(db): State<Db>,
    Extension(viewer): Extension<Viewer>,
    Json(payload): Json<CreateQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    let claims = viewer.require_admin()?;
    payload.validate()?;

    let quiz = Quiz::new(payload, claims.sub.clone());

    db.create_quiz(&quiz).await.map_err(|e| {
        tracing::error!("Failed to create quiz: {:?}", e);
        AppError::from(e)
    })?;

    Ok((StatusCode::CREATED, Json(quiz)))
}

/// Partially updates a quiz. Replacing the questions keeps any question and
/// option ids the editor sends back, so existing results stay meaningful.
/// Admin only.
pub async fn update_quiz(
    State(db): State<Db>,
    Extension(viewer): Extension<Viewer>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    viewer.require_admin()?;
    payload.validate()?;

    let mut quiz = db
        .get_quiz(&id)
        .await?
        .ok_or(AppError::NotFound("Quiz not found".to_string()))?;

    quiz.apply(payload);

    if !db.update_quiz(&quiz).await? {
        return Err(AppError::NotFound("Quiz not found".to_string()));
    }

    tracing::info!("Quiz updated: {}", quiz.id);

    Ok(Json(quiz))
}

/// Deletes a quiz by ID. Results referencing it are kept.
/// Admin only.
pub async fn delete_quiz(
    State(db): State<Db>,
    Extension(viewer): Extension<Viewer>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    viewer.require_admin()?;

    if !db.delete_quiz(&id).await? {
        return Err(AppError::NotFound("Quiz not found".to_string()));
    }

    tracing::info!("Quiz deleted: {}", id);

    Ok(Json(json!({ "message": "Quiz removed" })))
}

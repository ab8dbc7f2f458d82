// src/handlers/result.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    config::LEADERBOARD_SIZE,
    db::Db,
    error::AppError,
    grading::{leaderboard, rank, score_submission},
    models::{
        result::{
            LeaderboardEntry, QuizRef, QuizResult, QuizResultEntry, ResultReport,
            SubmitQuizRequest, UserResultEntry,
        },
        user::UserRef,
    },
    utils::jwt::Claims,
};

/// Grades a submission and stores it as a new result.
///
/// The quiz must exist and be published. Elapsed time is recorded as sent;
/// the time limit is enforced by the client timer.
pub async fn submit_quiz(
    State(db): State<Db>,
    Extension(claims): Extension<Claims>,
    Path(quiz_id): Path<String>,
    Json(payload): Json<SubmitQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let quiz = db
        .get_quiz(&quiz_id)
        .await?
        .ok_or(AppError::NotFound("Quiz not found".to_string()))?;

    if !quiz.is_published {
        return Err(AppError::Forbidden("Quiz is not published".to_string()));
    }

    let grade = score_submission(&quiz, &payload.answers);
    let result = QuizResult::new(claims.sub.clone(), quiz.id, grade, payload.time_taken);

    db.create_result(&result).await.map_err(|e| {
        tracing::error!("Failed to save result: {:?}", e);
        AppError::from(e)
    })?;

    tracing::info!(
        "Result {} saved: user {} scored {}/{} on quiz {}",
        result.id,
        result.user_id,
        result.score,
        result.total_possible_score,
        result.quiz_id
    );

    Ok((StatusCode::CREATED, Json(result)))
}

/// A user's quiz history, newest first.
/// Users may only see their own history; admins may see anyone's.
pub async fn get_user_results(
    State(db): State<Db>,
    Extension(claims): Extension<Claims>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if !claims.can_access(&user_id) {
        return Err(AppError::Forbidden(
            "Not authorized to view these results".to_string(),
        ));
    }

    let results = db.results_by_user(&user_id).await?;

    let quiz_ids: Vec<&str> = results.iter().map(|r| r.quiz_id.as_str()).collect();
    let quizzes = db.find_quizzes_by_ids(&quiz_ids).await?;

    let history: Vec<UserResultEntry> = results
        .into_iter()
        .map(|r| UserResultEntry {
            quiz: QuizRef::from(quizzes.get(&r.quiz_id)),
            id: r.id,
            user: r.user_id,
            score: r.score,
            total_possible_score: r.total_possible_score,
            time_taken: r.time_taken,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
        .collect();

    Ok(Json(history))
}

/// Every result for a quiz, ranked, with user details.
/// Admin only.
pub async fn get_quiz_results(
    State(db): State<Db>,
    Path(quiz_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let results = db.results_by_quiz(&quiz_id).await?;
    let ranked = rank(&results);

    let user_ids: Vec<&str> = ranked.iter().map(|r| r.user_id.as_str()).collect();
    let users = db.find_users_by_ids(&user_ids).await?;

    let entries: Vec<QuizResultEntry> = ranked
        .iter()
        .map(|r| QuizResultEntry {
            id: r.id.clone(),
            user: UserRef::detailed(users.get(&r.user_id)),
            quiz: r.quiz_id.clone(),
            score: r.score,
            total_possible_score: r.total_possible_score,
            time_taken: r.time_taken,
            created_at: r.created_at,
        })
        .collect();

    Ok(Json(entries))
}

/// Public top results for a quiz: highest score first, fastest on ties.
pub async fn get_leaderboard(
    State(db): State<Db>,
    Path(quiz_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let results = db.results_by_quiz(&quiz_id).await.map_err(|e| {
        tracing::error!("Failed to fetch leaderboard: {:?}", e);
        AppError::from(e)
    })?;
    let top = leaderboard(&results, LEADERBOARD_SIZE);

    let user_ids: Vec<&str> = top.iter().map(|r| r.user_id.as_str()).collect();
    let users = db.find_users_by_ids(&user_ids).await?;

    let entries: Vec<LeaderboardEntry> = top
        .iter()
        .map(|r| LeaderboardEntry {
            id: r.id.clone(),
            user: UserRef::public(users.get(&r.user_id)),
            score: r.score,
            time_taken: r.time_taken,
            created_at: r.created_at,
        })
        .collect();

    Ok(Json(entries))
}

/// Detailed report of one attempt, including the quiz answer key.
/// Visible to the attempt's owner and to admins.
pub async fn get_result_report(
    State(db): State<Db>,
    Extension(claims): Extension<Claims>,
    Path(result_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let result = db
        .get_result(&result_id)
        .await?
        .ok_or(AppError::NotFound("Result not found".to_string()))?;

    if !claims.can_access(&result.user_id) {
        return Err(AppError::Forbidden(
            "Not authorized to view this result".to_string(),
        ));
    }

    let quiz = db.get_quiz(&result.quiz_id).await?;
    let user = db.find_user_by_id(&result.user_id).await?;

    Ok(Json(ResultReport {
        id: result.id,
        user: UserRef::detailed(user.as_ref()),
        quiz,
        score: result.score,
        total_possible_score: result.total_possible_score,
        time_taken: result.time_taken,
        answers: result.answers,
        created_at: result.created_at,
        updated_at: result.updated_at,
    }))
}

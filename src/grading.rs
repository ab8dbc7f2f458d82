// src/grading.rs

//! Grading of submitted attempts and leaderboard ordering.
//!
//! Both operations are pure: no I/O, no shared state. Handlers load the quiz
//! and results, call in here, then persist or serialize the output.

use std::cmp::Ordering;

use crate::models::{
    quiz::Quiz,
    result::{GradedAnswer, SubmittedAnswer},
};

/// Outcome of grading one submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Grade {
    pub score: i64,
    pub total_possible_score: i64,
    /// One entry per quiz question, in quiz order.
    pub answers: Vec<GradedAnswer>,
}

/// Grades `submitted` against the answer key in `quiz`.
///
/// * Every question's points count toward the total, answered or not.
/// * Only the first submitted answer for a question is considered.
/// * A missing answer, an empty selection, a wrong option, or an option id
///   that does not belong to the question all grade as incorrect.
/// * Answers for questions that are not in the quiz are ignored.
pub fn score_submission(quiz: &Quiz, submitted: &[SubmittedAnswer]) -> Grade {
    let mut score = 0;
    let mut total_possible_score = 0;
    let mut answers = Vec::with_capacity(quiz.questions.len());

    for question in &quiz.questions {
        total_possible_score += question.points;

        let selected = submitted
            .iter()
            .find(|a| a.question_id == question.id)
            .and_then(|a| a.selected_option.as_deref())
            .filter(|s| !s.is_empty());

        let Some(selected) = selected else {
            answers.push(GradedAnswer {
                question_id: question.id.clone(),
                selected_option: None,
                is_correct: false,
            });
            continue;
        };

        let is_correct = question
            .options
            .iter()
            .find(|o| o.id == selected)
            .is_some_and(|o| o.is_correct);

        if is_correct {
            score += question.points;
        }

        answers.push(GradedAnswer {
            question_id: question.id.clone(),
            selected_option: Some(selected.to_string()),
            is_correct,
        });
    }

    Grade {
        score,
        total_possible_score,
        answers,
    }
}

/// Anything that can be placed on a leaderboard.
pub trait Rankable {
    fn score(&self) -> i64;
    /// Seconds spent on the attempt.
    fn time_taken(&self) -> i64;
}

/// Higher score first; faster attempt first on equal score.
fn leaderboard_order<T: Rankable>(a: &T, b: &T) -> Ordering {
    b.score()
        .cmp(&a.score())
        .then_with(|| a.time_taken().cmp(&b.time_taken()))
}

/// Returns a ranked copy of `results`. The sort is stable, so entries equal
/// in both score and time keep their input order.
pub fn rank<T: Rankable + Clone>(results: &[T]) -> Vec<T> {
    let mut ranked = results.to_vec();
    ranked.sort_by(leaderboard_order);
    ranked
}

/// Ranked copy of `results` cut to the first `limit` entries.
pub fn leaderboard<T: Rankable + Clone>(results: &[T], limit: usize) -> Vec<T> {
    let mut ranked = rank(results);
    ranked.truncate(limit);
    ranked
}

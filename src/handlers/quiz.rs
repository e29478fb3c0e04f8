use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::json;

use crate::{
    db::models::Question,
    extractors::{AdminGuard, AuthGuard},
    models::{QuizSubmission, QuizUpdate, QuizUpload},
    names,
    rejections::{AppError, OptionExt, ResultExt},
    services::progress::SubmitOutcome,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(names::QUIZZES_URL, post(create_quiz))
        .route("/quizzes/{quiz_id}", put(update_quiz).delete(delete_quiz))
        .route("/course/{course_id}/quizzes", get(course_quizzes))
        .route("/quiz/{quiz_id}", get(quiz_detail))
        .route(names::SUBMIT_QUIZ_URL, post(submit_quiz))
}

async fn create_quiz(
    AdminGuard(_admin): AdminGuard,
    State(state): State<AppState>,
    Json(body): Json<QuizUpload>,
) -> Result<impl IntoResponse, AppError> {
    if body.questions.is_empty() {
        return Err(AppError::Input("A quiz needs at least one question"));
    }

    state
        .db
        .lesson(body.lesson_id)
        .await
        .reject("could not load lesson")?
        .or_not_found("Lesson not found")?;

    let existing = state
        .db
        .quiz_for_lesson(body.lesson_id)
        .await
        .reject("could not check for an existing quiz")?;
    if existing.is_some() {
        return Err(AppError::Input("Lesson already has a quiz"));
    }

    let quiz = state
        .db
        .create_quiz(body.lesson_id, &body.questions)
        .await
        .reject("could not create quiz")?;

    let questions = state
        .db
        .quiz_questions(quiz.id)
        .await
        .reject("could not load quiz questions")?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "quiz": quiz, "questions": questions })),
    ))
}

async fn course_quizzes(
    AdminGuard(_admin): AdminGuard,
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    state
        .db
        .course(course_id)
        .await
        .reject("could not load course")?
        .or_not_found("Course not found")?;

    let quizzes = state
        .db
        .quizzes_for_course(course_id)
        .await
        .reject("could not load quizzes")?;

    Ok(Json(quizzes))
}

async fn update_quiz(
    AdminGuard(_admin): AdminGuard,
    State(state): State<AppState>,
    Path(quiz_id): Path<i64>,
    Json(body): Json<QuizUpdate>,
) -> Result<impl IntoResponse, AppError> {
    if body.questions.is_empty() {
        return Err(AppError::Input("A quiz needs at least one question"));
    }

    let updated = state
        .db
        .update_quiz(quiz_id, &body.questions)
        .await
        .reject("could not update quiz")?;

    if !updated {
        return Err(AppError::NotFound("Quiz not found"));
    }

    Ok(Json(json!({ "message": "Quiz updated successfully" })))
}

async fn delete_quiz(
    AdminGuard(_admin): AdminGuard,
    State(state): State<AppState>,
    Path(quiz_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let deleted = state
        .db
        .delete_quiz(quiz_id)
        .await
        .reject("could not delete quiz")?;

    if !deleted {
        return Err(AppError::NotFound("Quiz not found"));
    }

    Ok(Json(json!({ "message": "Quiz deleted successfully" })))
}

/// A quiz as the student takes it: questions and options only, correct
/// answers withheld.
async fn quiz_detail(
    AuthGuard(_user): AuthGuard,
    State(state): State<AppState>,
    Path(quiz_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let ctx = state
        .db
        .quiz_context(quiz_id)
        .await
        .reject("could not load quiz")?
        .or_not_found("Quiz not found")?;

    let questions: Vec<Question> = state
        .db
        .quiz_questions(quiz_id)
        .await
        .reject("could not load quiz questions")?
        .into_iter()
        .map(|q| Question {
            id: q.id,
            question_text: q.question_text,
            options: q.options,
        })
        .collect();

    Ok(Json(json!({
        "quiz": {
            "id": ctx.quiz_id,
            "lessonId": ctx.lesson_id,
            "questions": questions,
        },
        "lessonTitle": ctx.lesson_title,
        "courseTitle": ctx.course_title,
    })))
}

async fn submit_quiz(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Json(body): Json<QuizSubmission>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = state
        .progress
        .submit_quiz(user.id, body.quiz_id, &body.selected_answers)
        .await
        .reject("could not submit quiz")?;

    match outcome {
        SubmitOutcome::QuizNotFound => Err(AppError::NotFound("Quiz not found")),
        SubmitOutcome::Scored { score, progress } => Ok(Json(json!({
            "message": "Quiz submitted successfully!",
            "score": score,
            "progress": progress,
        }))),
    }
}

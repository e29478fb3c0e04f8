use std::collections::{HashMap, HashSet};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::json;

use crate::{
    extractors::{AdminGuard, AuthGuard},
    models::{LessonUpdate, LessonUpload},
    names,
    rejections::{AppError, OptionExt, ResultExt},
    services::gating,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/course/{course_id}/lessons", get(gated_lessons))
        .route("/course/{course_id}/lessons/all", get(all_lessons))
        .route(
            "/course/{course_id}/lessons-without-quizzes",
            get(lessons_without_quizzes),
        )
        .route("/lesson/{lesson_id}", get(lesson_detail))
        .route(names::LESSONS_URL, post(create_lesson))
        .route(
            "/lessons/{lesson_id}",
            put(update_lesson).delete(delete_lesson),
        )
}

/// The gated lesson list for the authenticated student: every lesson of
/// the course in order, annotated with its quiz and unlock state.
async fn gated_lessons(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    state
        .db
        .course(course_id)
        .await
        .reject("could not load course")?
        .or_not_found("Course not found")?;

    let lessons = state
        .db
        .lessons_for_course(course_id)
        .await
        .reject("could not load lessons")?;

    let mut quizzes: HashMap<i64, _> = state
        .db
        .quiz_refs_for_course(course_id)
        .await
        .reject("could not load quizzes")?
        .into_iter()
        .map(|q| (q.lesson_id, q))
        .collect();

    let completed: HashSet<i64> = state
        .db
        .completed_lesson_ids(user.id, course_id)
        .await
        .reject("could not load progress")?
        .into_iter()
        .collect();

    let paired = lessons
        .into_iter()
        .map(|lesson| {
            let quiz = quizzes.remove(&lesson.id);
            (lesson, quiz)
        })
        .collect();

    Ok(Json(gating::annotate_unlocks(paired, &completed)))
}

async fn lesson_detail(
    AuthGuard(_user): AuthGuard,
    State(state): State<AppState>,
    Path(lesson_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let lesson = state
        .db
        .lesson(lesson_id)
        .await
        .reject("could not load lesson")?
        .or_not_found("Lesson not found")?;

    Ok(Json(lesson))
}

async fn create_lesson(
    AdminGuard(_admin): AdminGuard,
    State(state): State<AppState>,
    Json(body): Json<LessonUpload>,
) -> Result<impl IntoResponse, AppError> {
    if body.title.is_empty() || body.content.is_empty() {
        return Err(AppError::Input("Title and content are required"));
    }

    state
        .db
        .course(body.course_id)
        .await
        .reject("could not load course")?
        .or_not_found("Course not found")?;

    let lesson = state
        .db
        .create_lesson(&body)
        .await
        .reject("could not create lesson")?;

    Ok((StatusCode::CREATED, Json(lesson)))
}

async fn all_lessons(
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

    let lessons = state
        .db
        .lessons_for_course(course_id)
        .await
        .reject("could not load lessons")?;

    Ok(Json(lessons))
}

async fn update_lesson(
    AdminGuard(_admin): AdminGuard,
    State(state): State<AppState>,
    Path(lesson_id): Path<i64>,
    Json(body): Json<LessonUpdate>,
) -> Result<impl IntoResponse, AppError> {
    if body.title.is_empty() || body.content.is_empty() {
        return Err(AppError::Input("Title and content are required"));
    }

    let lesson = state
        .db
        .update_lesson(lesson_id, &body)
        .await
        .reject("could not update lesson")?
        .or_not_found("Lesson not found")?;

    Ok(Json(lesson))
}

async fn delete_lesson(
    AdminGuard(_admin): AdminGuard,
    State(state): State<AppState>,
    Path(lesson_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let deleted = state
        .db
        .delete_lesson(lesson_id)
        .await
        .reject("could not delete lesson")?;

    if !deleted {
        return Err(AppError::NotFound("Lesson not found"));
    }

    Ok(Json(json!({ "message": "Lesson deleted successfully" })))
}

async fn lessons_without_quizzes(
    AdminGuard(_admin): AdminGuard,
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let lessons = state
        .db
        .lessons_without_quizzes(course_id)
        .await
        .reject("could not load lessons")?;

    Ok(Json(lessons))
}

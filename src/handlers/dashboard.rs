// Admin dashboard statistics.

use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};

use crate::{
    extractors::AdminGuard,
    rejections::{AppError, ResultExt},
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/stats/user-roles", get(user_roles))
        .route("/admin/stats/course-difficulty", get(course_difficulty))
        .route("/admin/stats/course-progress", get(course_progress))
        .route("/admin/stats/quiz-performance", get(quiz_performance))
        .route("/admin/students/progress", get(student_progress))
}

async fn user_roles(
    AdminGuard(_admin): AdminGuard,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let counts = state
        .db
        .user_role_counts()
        .await
        .reject("could not load user stats")?;
    Ok(Json(counts))
}

async fn course_difficulty(
    AdminGuard(_admin): AdminGuard,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let counts = state
        .db
        .course_difficulty_counts()
        .await
        .reject("could not load course stats")?;
    Ok(Json(counts))
}

async fn course_progress(
    AdminGuard(_admin): AdminGuard,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let stats = state
        .db
        .course_completion_stats()
        .await
        .reject("could not load progress stats")?;
    Ok(Json(stats))
}

async fn quiz_performance(
    AdminGuard(_admin): AdminGuard,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let stats = state
        .db
        .quiz_performance_stats()
        .await
        .reject("could not load quiz stats")?;
    Ok(Json(stats))
}

async fn student_progress(
    AdminGuard(_admin): AdminGuard,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let rows = state
        .db
        .student_progress_rows()
        .await
        .reject("could not load student progress")?;
    Ok(Json(rows))
}

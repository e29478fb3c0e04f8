use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use crate::{
    extractors::{AdminGuard, AuthGuard},
    models::{CourseUpload, EnrollBody},
    names,
    rejections::{AppError, OptionExt, ResultExt},
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(names::COURSES_URL, get(list_courses).post(create_course))
        .route(
            "/courses/{course_id}",
            axum::routing::put(update_course).delete(delete_course),
        )
        .route("/course/{course_id}", get(course_detail))
        .route(names::ENROLL_URL, post(enroll))
        .route(names::ENROLLED_COURSES_URL, get(enrolled_courses))
}

fn validate_course(upload: &CourseUpload) -> Result<(), AppError> {
    if upload.title.is_empty()
        || upload.description.is_empty()
        || upload.category.is_empty()
        || upload.difficulty.is_empty()
    {
        return Err(AppError::Input("All fields are required"));
    }

    if !names::COURSE_DIFFICULTIES.contains(&upload.difficulty.as_str()) {
        return Err(AppError::Input("Unknown difficulty level"));
    }

    Ok(())
}

async fn list_courses(
    AuthGuard(_user): AuthGuard,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let courses = state.db.courses().await.reject("could not load courses")?;
    Ok(Json(courses))
}

async fn course_detail(
    AuthGuard(_user): AuthGuard,
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let course = state
        .db
        .course(course_id)
        .await
        .reject("could not load course")?
        .or_not_found("Course not found")?;

    Ok(Json(course))
}

async fn create_course(
    AdminGuard(_admin): AdminGuard,
    State(state): State<AppState>,
    Json(body): Json<CourseUpload>,
) -> Result<impl IntoResponse, AppError> {
    validate_course(&body)?;

    let course = state
        .db
        .create_course(&body)
        .await
        .reject("could not create course")?;

    Ok((StatusCode::CREATED, Json(course)))
}

async fn update_course(
    AdminGuard(_admin): AdminGuard,
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
    Json(body): Json<CourseUpload>,
) -> Result<impl IntoResponse, AppError> {
    validate_course(&body)?;

    let course = state
        .db
        .update_course(course_id, &body)
        .await
        .reject("could not update course")?
        .or_not_found("Course not found")?;

    Ok(Json(course))
}

async fn delete_course(
    AdminGuard(_admin): AdminGuard,
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let deleted = state
        .db
        .delete_course(course_id)
        .await
        .reject("could not delete course")?;

    if !deleted {
        return Err(AppError::NotFound("Course not found"));
    }

    Ok(Json(json!({ "message": "Course deleted successfully" })))
}

async fn enroll(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Json(body): Json<EnrollBody>,
) -> Result<impl IntoResponse, AppError> {
    state
        .db
        .course(body.course_id)
        .await
        .reject("could not load course")?
        .or_not_found("Course not found")?;

    let enrolled = state
        .db
        .enroll(user.id, body.course_id)
        .await
        .reject("could not enroll")?;

    if !enrolled {
        return Err(AppError::Input("Already enrolled in this course"));
    }

    Ok(Json(
        json!({ "message": "Successfully enrolled in the course" }),
    ))
}

async fn enrolled_courses(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let courses = state
        .db
        .enrolled_courses(user.id)
        .await
        .reject("could not load enrolled courses")?;

    Ok(Json(courses))
}

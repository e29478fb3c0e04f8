use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use crate::{
    extractors::AuthGuard,
    models::FeedbackUpload,
    names,
    rejections::{AppError, OptionExt, ResultExt},
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(names::COURSE_FEEDBACK_URL, post(submit_feedback))
        .route("/course/{course_id}/reviews", get(course_reviews))
}

async fn submit_feedback(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Json(body): Json<FeedbackUpload>,
) -> Result<impl IntoResponse, AppError> {
    if body.rating < names::MIN_RATING || body.rating > names::MAX_RATING {
        return Err(AppError::Input("Rating must be between 1 and 5"));
    }

    state
        .db
        .course(body.course_id)
        .await
        .reject("could not load course")?
        .or_not_found("Course not found")?;

    let already = state
        .db
        .has_course_feedback(body.course_id, user.id)
        .await
        .reject("could not check feedback")?;

    // The unique index backstops this check under concurrent submissions.
    let submitted = !already
        && state
            .db
            .submit_course_feedback(body.course_id, user.id, body.rating, body.comment.as_deref())
            .await
            .reject("could not submit feedback")?;

    if !submitted {
        return Err(AppError::Input(
            "You have already submitted feedback for this course",
        ));
    }

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Feedback submitted successfully" })),
    ))
}

/// Latest well-rated reviews shown on the course landing page.
async fn course_reviews(
    AuthGuard(_user): AuthGuard,
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    state
        .db
        .course(course_id)
        .await
        .reject("could not load course")?
        .or_not_found("Course not found")?;

    let reviews = state
        .db
        .course_reviews(course_id)
        .await
        .reject("could not load reviews")?;

    Ok(Json(reviews))
}

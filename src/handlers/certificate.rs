use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
    Json, Router,
};
use serde_json::json;

use crate::{
    extractors::{AdminGuard, AuthGuard},
    models::PolicyUpsert,
    names,
    rejections::{AppError, OptionExt, ResultExt},
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(names::CERTIFICATES_URL, get(eligible_certificates))
        .route("/certificate/{course_id}", get(download_certificate))
        .route(
            names::CERTIFICATE_POLICIES_URL,
            get(list_policies).post(upsert_policy),
        )
        .route("/certificate-policies/{policy_id}", delete(delete_policy))
}

/// Certificates the student is currently eligible for.
async fn eligible_certificates(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let certificates = state
        .db
        .eligible_certificates(user.id)
        .await
        .reject("could not load certificates")?;

    Ok(Json(certificates))
}

/// Re-validates eligibility server-side, then returns the data the
/// certificate renderer needs. Client state is never trusted here.
async fn download_certificate(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let policy = state
        .db
        .certificate_policy(course_id)
        .await
        .reject("could not load certificate policy")?
        .or_not_found("Certificate not found")?;

    let completed = state
        .db
        .completed_lesson_count(user.id, course_id)
        .await
        .reject("could not load progress")?;

    if completed < policy.min_lectures_required {
        return Err(AppError::Forbidden(
            "Complete required lectures to download the certificate.",
        ));
    }

    let course = state
        .db
        .course(course_id)
        .await
        .reject("could not load course")?
        .or_not_found("Course not found")?;

    let percentage = state
        .db
        .find_progress(user.id, course_id)
        .await
        .reject("could not load progress")?
        .map(|p| p.completion_percentage)
        .unwrap_or(0.0);

    Ok(Json(json!({
        "student": { "name": user.name, "email": user.email },
        "course": course,
        "percentage": percentage,
    })))
}

/// Admin view: courses with their thresholds, plus courses that have no
/// policy yet.
async fn list_policies(
    AdminGuard(_admin): AdminGuard,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let with_certificate = state
        .db
        .courses_with_certificates()
        .await
        .reject("could not load certificate policies")?;

    let without_certificate = state
        .db
        .courses_without_certificates()
        .await
        .reject("could not load courses")?;

    Ok(Json(json!({
        "coursesWithCertificate": with_certificate,
        "coursesWithoutCertificate": without_certificate,
    })))
}

async fn upsert_policy(
    AdminGuard(_admin): AdminGuard,
    State(state): State<AppState>,
    Json(body): Json<PolicyUpsert>,
) -> Result<impl IntoResponse, AppError> {
    if body.min_lectures_required < 0 {
        return Err(AppError::Input("Lecture threshold cannot be negative"));
    }

    state
        .db
        .course(body.course_id)
        .await
        .reject("could not load course")?
        .or_not_found("Course not found")?;

    let created = state
        .db
        .upsert_certificate_policy(body.course_id, body.min_lectures_required)
        .await
        .reject("could not save certificate policy")?;

    if created {
        Ok((
            StatusCode::CREATED,
            Json(json!({ "message": "Certificate created successfully" })),
        ))
    } else {
        Ok((
            StatusCode::OK,
            Json(json!({ "message": "Certificate updated successfully" })),
        ))
    }
}

async fn delete_policy(
    AdminGuard(_admin): AdminGuard,
    State(state): State<AppState>,
    Path(policy_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let deleted = state
        .db
        .delete_certificate_policy(policy_id)
        .await
        .reject("could not delete certificate policy")?;

    if !deleted {
        return Err(AppError::NotFound("Certificate not found"));
    }

    Ok(Json(
        json!({ "message": "Certificate deleted successfully" }),
    ))
}

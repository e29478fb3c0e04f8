use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    extractors::{AdminGuard, AuthGuard},
    models::{AssistQuery, ChallengeSubmission, ChallengeUpdate, ChallengeUpload},
    names,
    rejections::{AppError, OptionExt, ResultExt},
    services::challenge::{AssistOutcome, JudgeOutcome},
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            names::CHALLENGES_URL,
            get(student_challenges).post(create_challenge),
        )
        .route(
            "/challenges/{challenge_id}",
            put(update_challenge).delete(delete_challenge),
        )
        .route("/challenges/{challenge_id}/submit", post(submit_challenge))
        .route("/course/{course_id}/challenges", get(course_challenges))
        .route(names::AI_ASSIST_URL, post(ai_assist))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChallengeFilter {
    course_id: i64,
}

fn validate_challenge(
    title: &str,
    description: &str,
    starter_code: &str,
    expected_output: &str,
    difficulty: &str,
) -> Result<(), AppError> {
    if title.is_empty() || description.is_empty() || starter_code.is_empty() || expected_output.is_empty()
    {
        return Err(AppError::Input("All fields are required"));
    }

    if !names::CHALLENGE_DIFFICULTIES.contains(&difficulty) {
        return Err(AppError::Input("Unknown difficulty level"));
    }

    Ok(())
}

async fn create_challenge(
    AdminGuard(_admin): AdminGuard,
    State(state): State<AppState>,
    Json(body): Json<ChallengeUpload>,
) -> Result<impl IntoResponse, AppError> {
    validate_challenge(
        &body.title,
        &body.description,
        &body.starter_code,
        &body.expected_output,
        &body.difficulty,
    )?;

    state
        .db
        .course(body.course_id)
        .await
        .reject("could not load course")?
        .or_not_found("Course not found")?;

    let challenge = state
        .db
        .create_challenge(&body)
        .await
        .reject("could not create challenge")?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Challenge added successfully!", "challenge": challenge })),
    ))
}

async fn student_challenges(
    AuthGuard(_user): AuthGuard,
    State(state): State<AppState>,
    Query(filter): Query<ChallengeFilter>,
) -> Result<impl IntoResponse, AppError> {
    let challenges = state
        .db
        .challenges_for_course(filter.course_id)
        .await
        .reject("could not load challenges")?;

    Ok(Json(challenges))
}

async fn course_challenges(
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

    let challenges = state
        .db
        .challenges_for_course(course_id)
        .await
        .reject("could not load challenges")?;

    Ok(Json(challenges))
}

async fn update_challenge(
    AdminGuard(_admin): AdminGuard,
    State(state): State<AppState>,
    Path(challenge_id): Path<i64>,
    Json(body): Json<ChallengeUpdate>,
) -> Result<impl IntoResponse, AppError> {
    validate_challenge(
        &body.title,
        &body.description,
        &body.starter_code,
        &body.expected_output,
        &body.difficulty,
    )?;

    let challenge = state
        .db
        .update_challenge(challenge_id, &body)
        .await
        .reject("could not update challenge")?
        .or_not_found("Challenge not found")?;

    Ok(Json(
        json!({ "message": "Challenge updated successfully", "challenge": challenge }),
    ))
}

async fn delete_challenge(
    AdminGuard(_admin): AdminGuard,
    State(state): State<AppState>,
    Path(challenge_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let deleted = state
        .db
        .delete_challenge(challenge_id)
        .await
        .reject("could not delete challenge")?;

    if !deleted {
        return Err(AppError::NotFound("Challenge not found"));
    }

    Ok(Json(json!({ "message": "Challenge deleted successfully" })))
}

/// Hand the submission to the AI judge; pass/fail only, the platform
/// never interprets the code itself.
async fn submit_challenge(
    AuthGuard(_user): AuthGuard,
    State(state): State<AppState>,
    Path(challenge_id): Path<i64>,
    Json(body): Json<ChallengeSubmission>,
) -> Result<impl IntoResponse, AppError> {
    if body.code.is_empty() {
        return Err(AppError::Input("Code is required"));
    }

    let challenge = state
        .db
        .challenge(challenge_id)
        .await
        .reject("could not load challenge")?
        .or_not_found("Challenge not found")?;

    let outcome = state
        .challenges
        .judge(&challenge, &body.code, body.language.as_deref())
        .await
        .reject("could not reach the AI judge")?;

    match outcome {
        JudgeOutcome::Correct => Ok(Json(
            json!({ "message": "Correct solution! Challenge completed." }),
        )),
        JudgeOutcome::Incorrect(detail) => Ok(Json(
            json!({ "message": format!("Incorrect solution. Try again! {detail}") }),
        )),
        JudgeOutcome::Unavailable => Err(AppError::Internal("AI judge is not configured")),
    }
}

async fn ai_assist(
    AuthGuard(_user): AuthGuard,
    State(state): State<AppState>,
    Json(body): Json<AssistQuery>,
) -> Result<impl IntoResponse, AppError> {
    if body.query.is_empty() {
        return Err(AppError::Input("Invalid query"));
    }

    let outcome = state
        .challenges
        .assist(&body.query)
        .await
        .reject("could not reach the AI assistant")?;

    match outcome {
        AssistOutcome::Solution(solution) => Ok(Json(json!({ "solution": solution }))),
        AssistOutcome::Unavailable => Err(AppError::Internal("AI assistant is not configured")),
    }
}

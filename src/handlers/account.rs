use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use axum_extra::extract::CookieJar;
use serde_json::json;

use crate::{
    extractors::AuthGuard,
    models::{ChangePasswordBody, LoginBody, ProfilePicUpdate, ProfileUpdate, RegisterBody},
    names,
    rejections::{AppError, ResultExt},
    utils, AppState,
};

const MIN_PASSWORD_LENGTH: usize = 8;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(names::REGISTER_URL, post(register))
        .route(names::LOGIN_URL, post(login))
        .route(names::LOGOUT_URL, post(logout))
        .route(names::PROFILE_URL, get(profile).put(update_profile))
        .route("/profile/picture", put(update_profile_pic))
        .route(names::CHANGE_PASSWORD_URL, put(change_password))
}

async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse, AppError> {
    if body.name.is_empty() || body.email.is_empty() || body.password.is_empty() {
        return Err(AppError::Input("All fields are required"));
    }

    if body.password.len() < MIN_PASSWORD_LENGTH {
        return Err(AppError::Input("Password must be at least 8 characters"));
    }

    let taken = state
        .db
        .email_exists(&body.email)
        .await
        .reject("could not check email")?;
    if taken {
        return Err(AppError::Input("Email already registered"));
    }

    state
        .db
        .create_user(&body.name, &body.email, &body.password, names::STUDENT_ROLE)
        .await
        .reject("could not create user")?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Registration successful" })),
    ))
}

async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginBody>,
) -> Result<impl IntoResponse, AppError> {
    let verified = state
        .db
        .verify_user_password(&body.email, &body.password)
        .await
        .reject("could not verify password")?;

    if !verified {
        return Err(AppError::Unauthorized);
    }

    let user = state
        .db
        .find_user_by_email(&body.email)
        .await
        .reject("could not load user")?
        .ok_or(AppError::Unauthorized)?;

    let session = state
        .db
        .create_user_session(user.id)
        .await
        .reject("could not create session")?;

    let cookie = utils::cookie(names::SESSION_COOKIE_NAME, &session, state.secure_cookies);
    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, cookie.parse().expect("valid cookie header"));

    Ok((
        headers,
        Json(json!({ "message": "Login successful", "user": user })),
    ))
}

async fn logout(
    AuthGuard(_user): AuthGuard,
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    if let Some(session) = jar.get(names::SESSION_COOKIE_NAME) {
        state
            .db
            .delete_user_session(session.value())
            .await
            .reject("could not delete session")?;
    }

    let cookie = utils::clear_cookie(names::SESSION_COOKIE_NAME, state.secure_cookies);
    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, cookie.parse().expect("valid cookie header"));

    Ok((headers, Json(json!({ "message": "Logged out" }))))
}

async fn profile(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let progress = state
        .db
        .progress_summaries(user.id)
        .await
        .reject("could not load progress")?;

    Ok(Json(json!({ "user": user, "progress": progress })))
}

async fn update_profile(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Json(body): Json<ProfileUpdate>,
) -> Result<impl IntoResponse, AppError> {
    if body.name.is_empty() {
        return Err(AppError::Input("Name is required"));
    }

    let updated = state
        .db
        .update_user_name(user.id, &body.name)
        .await
        .reject("could not update profile")?;

    Ok(Json(json!({ "message": "Profile updated", "user": updated })))
}

async fn update_profile_pic(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Json(body): Json<ProfilePicUpdate>,
) -> Result<impl IntoResponse, AppError> {
    if body.profile_pic.is_empty() {
        return Err(AppError::Input("Profile picture URL is required"));
    }

    state
        .db
        .update_profile_pic(user.id, &body.profile_pic)
        .await
        .reject("could not update profile picture")?;

    Ok(Json(json!({ "message": "Profile picture updated" })))
}

async fn change_password(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Json(body): Json<ChangePasswordBody>,
) -> Result<impl IntoResponse, AppError> {
    if body.current_password.is_empty() || body.new_password.is_empty() {
        return Err(AppError::Input("All fields are required"));
    }

    if body.new_password.len() < MIN_PASSWORD_LENGTH {
        return Err(AppError::Input("Password must be at least 8 characters"));
    }

    let changed = state
        .db
        .change_password(user.id, &body.current_password, &body.new_password)
        .await
        .reject("could not change password")?;

    if !changed {
        return Err(AppError::Input("Current password is incorrect"));
    }

    Ok(Json(json!({ "message": "Password updated" })))
}

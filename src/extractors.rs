use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::CookieJar;

use crate::{db::models::AuthUser, names, rejections::AppError, AppState};

/// Guard extractor that verifies the session cookie against the database.
/// Carries the authenticated user's info for use in handlers.
pub struct AuthGuard(pub AuthUser);

impl FromRequestParts<AppState> for AuthGuard {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        if let Some(session_id) = jar
            .get(names::SESSION_COOKIE_NAME)
            .map(|c| c.value().to_string())
        {
            if let Ok(Some(user)) = state.db.get_user_by_session(&session_id).await {
                return Ok(AuthGuard(user));
            }
        }

        Err(AppError::Unauthorized)
    }
}

/// Guard for the admin surface: a valid session whose user has the admin
/// role. Non-admins get Forbidden, not NotFound, matching the original
/// platform's behavior.
pub struct AdminGuard(pub AuthUser);

impl FromRequestParts<AppState> for AdminGuard {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthGuard(user) = AuthGuard::from_request_parts(parts, state).await?;

        if !user.is_admin() {
            return Err(AppError::Forbidden("Access denied: admins only"));
        }

        Ok(AdminGuard(user))
    }
}

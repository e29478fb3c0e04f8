use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Error taxonomy shared by every handler. Variants carry a human-readable
/// message that is serialized as `{"message": ...}` in the response body.
#[derive(Debug, PartialEq, Eq)]
pub enum AppError {
    NotFound(&'static str),
    Unauthorized,
    Forbidden(&'static str),
    Input(&'static str),
    Internal(&'static str),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (code, message) = match self {
            AppError::NotFound(m) => (StatusCode::NOT_FOUND, m),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized"),
            AppError::Forbidden(m) => (StatusCode::FORBIDDEN, m),
            AppError::Input(m) => (StatusCode::BAD_REQUEST, m),
            AppError::Internal(m) => (StatusCode::INTERNAL_SERVER_ERROR, m),
        };

        (code, Json(json!({ "message": message }))).into_response()
    }
}

/// Map a store/service error to `AppError::Internal`, logging the
/// underlying cause. Store errors are never leaked to the client.
pub trait ResultExt<T> {
    fn reject(self, msg: &'static str) -> Result<T, AppError>;
}

impl<T> ResultExt<T> for color_eyre::Result<T> {
    fn reject(self, msg: &'static str) -> Result<T, AppError> {
        self.map_err(|e| {
            tracing::error!("{msg}: {e}");
            AppError::Internal(msg)
        })
    }
}

/// Turn an absent row into a NotFound response.
pub trait OptionExt<T> {
    fn or_not_found(self, msg: &'static str) -> Result<T, AppError>;
}

impl<T> OptionExt<T> for Option<T> {
    fn or_not_found(self, msg: &'static str) -> Result<T, AppError> {
        self.ok_or(AppError::NotFound(msg))
    }
}

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
    models::{CommentUpload, PostUpload},
    names,
    rejections::{AppError, OptionExt, ResultExt},
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(names::POSTS_URL, get(feed).post(create_post))
        .route("/posts/{post_id}/comments", post(add_comment))
        .route("/posts/{post_id}/like", post(toggle_like))
}

/// The community feed: latest posts with comments, newest first.
async fn feed(
    AuthGuard(_user): AuthGuard,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let posts = state.db.posts().await.reject("could not load posts")?;
    Ok(Json(posts))
}

async fn create_post(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Json(body): Json<PostUpload>,
) -> Result<impl IntoResponse, AppError> {
    if body.title.is_empty() || body.content.is_empty() {
        return Err(AppError::Input("Title and content are required"));
    }

    let post = state
        .db
        .create_post(user.id, &body.title, &body.content)
        .await
        .reject("could not create post")?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Post created successfully", "post": post })),
    ))
}

async fn add_comment(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
    Json(body): Json<CommentUpload>,
) -> Result<impl IntoResponse, AppError> {
    if body.text.is_empty() {
        return Err(AppError::Input("Comment text is required"));
    }

    let comment = state
        .db
        .add_comment(post_id, user.id, &body.text)
        .await
        .reject("could not add comment")?
        .or_not_found("Post not found")?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Comment added successfully", "comment": comment })),
    ))
}

async fn toggle_like(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let likes = state
        .db
        .toggle_like(post_id, user.id)
        .await
        .reject("could not update like")?
        .or_not_found("Post not found")?;

    Ok(Json(json!({ "message": "Like updated", "likes": likes })))
}

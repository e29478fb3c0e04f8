pub mod ai;
pub mod db;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod names;
pub mod rejections;
pub mod services;
pub mod utils;

use axum::Router;

use ai::GeminiClient;
use services::{challenge::ChallengeService, progress::ProgressService};

#[derive(Clone)]
pub struct AppState {
    pub db: db::Db,
    pub progress: ProgressService,
    pub challenges: ChallengeService,
    pub secure_cookies: bool,
}

impl AppState {
    pub fn new(db: db::Db, ai: GeminiClient, secure_cookies: bool) -> Self {
        Self {
            progress: ProgressService::new(db.clone()),
            challenges: ChallengeService::new(ai),
            db,
            secure_cookies,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(handlers::account::routes())
        .merge(handlers::course::routes())
        .merge(handlers::lesson::routes())
        .merge(handlers::quiz::routes())
        .merge(handlers::certificate::routes())
        .merge(handlers::feedback::routes())
        .merge(handlers::community::routes())
        .merge(handlers::challenge::routes())
        .merge(handlers::dashboard::routes())
        .with_state(state)
}

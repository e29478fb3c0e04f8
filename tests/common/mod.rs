use learnhub::ai::GeminiClient;
use learnhub::db::Db;
use learnhub::models::{LessonUpload, QuestionUpload};
use learnhub::AppState;

pub fn app(db: Db) -> axum::Router {
    learnhub::router(AppState::new(db, GeminiClient::new(None), false))
}

/// Cookie header value for a fresh session of the given user.
pub async fn session_cookie(db: &Db, user_id: i64) -> String {
    let token = db.create_user_session(user_id).await.expect("create session");
    format!("{}={}", learnhub::names::SESSION_COOKIE_NAME, token)
}

pub async fn create_test_db() -> Db {
    use std::sync::atomic::{AtomicU32, Ordering};
    static COUNTER: AtomicU32 = AtomicU32::new(0);
    let id = COUNTER.fetch_add(1, Ordering::SeqCst);
    let path =
        std::env::temp_dir().join(format!("learnhub_test_{}_{}.db", std::process::id(), id));
    // Clean up leftover file from previous runs
    let _ = std::fs::remove_file(&path);
    let url = format!("file:{}", path.display());
    Db::new(url, String::new())
        .await
        .expect("failed to create test database")
}

pub async fn create_course(db: &Db, title: &str) -> i64 {
    db.create_course(&learnhub::models::CourseUpload {
        title: title.to_string(),
        description: "A test course".to_string(),
        difficulty: "Beginner".to_string(),
        category: "Programming".to_string(),
        thumbnail: None,
    })
    .await
    .expect("create course")
    .id
}

pub async fn create_lesson(db: &Db, course_id: i64, title: &str) -> i64 {
    db.create_lesson(&LessonUpload {
        course_id,
        title: title.to_string(),
        content: "lesson content".to_string(),
        video_url: None,
    })
    .await
    .expect("create lesson")
    .id
}

/// One question per (text, correct) pair, with the correct answer and a
/// fixed wrong option.
pub fn questions(pairs: &[(&str, &str)]) -> Vec<QuestionUpload> {
    pairs
        .iter()
        .map(|(text, correct)| QuestionUpload {
            question_text: text.to_string(),
            options: vec![correct.to_string(), "wrong".to_string()],
            correct_answer: correct.to_string(),
        })
        .collect()
}

pub async fn create_quiz(db: &Db, lesson_id: i64, pairs: &[(&str, &str)]) -> i64 {
    db.create_quiz(lesson_id, &questions(pairs))
        .await
        .expect("create quiz")
        .id
}

pub async fn create_student(db: &Db, email: &str) -> i64 {
    db.create_user("Student", email, "password123", "student")
        .await
        .expect("create student")
}

pub async fn create_admin(db: &Db, email: &str) -> i64 {
    db.create_user("Admin", email, "password123", "admin")
        .await
        .expect("create admin")
}

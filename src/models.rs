//! Request payload types. The single-page front end sends camelCase JSON.

use std::collections::HashMap;

use serde::Deserialize;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseUpload {
    pub title: String,
    pub description: String,
    pub difficulty: String,
    pub category: String,
    pub thumbnail: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonUpload {
    pub course_id: i64,
    pub title: String,
    pub content: String,
    pub video_url: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonUpdate {
    pub title: String,
    pub content: String,
    pub video_url: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizUpload {
    pub lesson_id: i64,
    pub questions: Vec<QuestionUpload>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionUpload {
    pub question_text: String,
    pub options: Vec<String>,
    pub correct_answer: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizUpdate {
    pub questions: Vec<QuestionUpload>,
}

/// `selectedAnswers` maps question position to the chosen option text.
/// Unanswered positions are simply absent; answers are compared
/// byte-for-byte against the stored correct answer.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSubmission {
    pub quiz_id: i64,
    pub selected_answers: HashMap<usize, String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollBody {
    pub course_id: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyUpsert {
    pub course_id: i64,
    pub min_lectures_required: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackUpload {
    pub course_id: i64,
    pub rating: i64,
    pub comment: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostUpload {
    pub title: String,
    pub content: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentUpload {
    pub text: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeUpload {
    pub course_id: i64,
    pub title: String,
    pub description: String,
    pub starter_code: String,
    pub expected_output: String,
    pub difficulty: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeUpdate {
    pub title: String,
    pub description: String,
    pub starter_code: String,
    pub expected_output: String,
    pub difficulty: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeSubmission {
    pub code: String,
    pub language: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistQuery {
    pub query: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterBody {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordBody {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub name: String,
}

/// Profile pictures are uploaded to external storage by the front end;
/// only the resulting URL is stored.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePicUpdate {
    pub profile_pic: String,
}

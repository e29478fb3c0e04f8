// Row structs. Deserialize is for `libsql::de::from_row`; Serialize
// (camelCase) is the JSON shape handed to the front end.

use serde::{Deserialize, Serialize};

/// SQLite has no boolean type; rows come back with 0/1 integers while the
/// API serializes real booleans.
pub(crate) mod sql_bool {
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(v: &bool, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_bool(*v)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        struct Vis;
        impl serde::de::Visitor<'_> for Vis {
            type Value = bool;
            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("boolean or 0/1 integer")
            }
            fn visit_bool<E: serde::de::Error>(self, v: bool) -> Result<bool, E> {
                Ok(v)
            }
            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<bool, E> {
                Ok(v != 0)
            }
            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<bool, E> {
                Ok(v != 0)
            }
        }
        d.deserialize_i64(Vis)
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct AuthUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
    pub profile_pic: Option<String>,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == crate::names::ADMIN_ROLE
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct Course {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub difficulty: String,
    pub category: String,
    pub thumbnail: Option<String>,
    pub created_at: String,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct Lesson {
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    pub content: String,
    pub video_url: Option<String>,
    pub position: i64,
}

/// Quiz header; question rows hang off it.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct QuizRef {
    pub id: i64,
    pub lesson_id: i64,
}

/// A question as served to students: the correct answer is withheld.
#[derive(Clone, Serialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct Question {
    pub id: i64,
    pub question_text: String,
    pub options: Vec<String>,
}

/// Full question row, for admin views and scoring.
#[derive(Clone, Serialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct QuestionFull {
    pub id: i64,
    pub question_text: String,
    pub options: Vec<String>,
    pub correct_answer: String,
}

/// Where a quiz sits in the catalog: its lesson and course.
#[derive(Clone, Deserialize)]
pub struct QuizContext {
    pub quiz_id: i64,
    pub lesson_id: i64,
    pub course_id: i64,
    pub lesson_title: String,
    pub course_title: String,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct QuizListing {
    pub id: i64,
    pub lesson_id: i64,
    pub lesson_title: String,
    pub question_count: i64,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct Progress {
    pub id: i64,
    pub user_id: i64,
    pub course_id: i64,
    pub completion_percentage: f64,
    #[serde(with = "sql_bool")]
    pub is_course_completed: bool,
    pub date_last_accessed: String,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct QuizScore {
    pub quiz_id: i64,
    pub score: f64,
}

/// Progress row joined with its completed-lesson and quiz-score sets.
#[derive(Clone, Serialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct ProgressDetail {
    pub id: i64,
    pub user_id: i64,
    pub course_id: i64,
    pub completed_lessons: Vec<i64>,
    pub quizzes_completed: Vec<QuizScore>,
    pub completion_percentage: f64,
    pub is_course_completed: bool,
    pub date_last_accessed: String,
}

/// Per-course progress summary, the read-side replacement for the
/// embedded per-user progress mirror the original platform kept.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct ProgressSummary {
    pub course_id: i64,
    pub course_title: String,
    pub completed_lessons: i64,
    pub completion_percentage: f64,
    #[serde(with = "sql_bool")]
    pub is_course_completed: bool,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct CertificatePolicy {
    pub id: i64,
    pub course_id: i64,
    pub min_lectures_required: i64,
    pub created_at: String,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct PolicyWithCourse {
    pub id: i64,
    pub course_id: i64,
    pub course_title: String,
    pub min_lectures_required: i64,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct CourseRef {
    pub id: i64,
    pub title: String,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct EligibleCertificate {
    pub course_id: i64,
    pub course_title: String,
    pub min_lectures_required: i64,
    pub completed_lessons: i64,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct FeedbackReview {
    pub id: i64,
    pub course_id: i64,
    pub student_id: i64,
    pub student_name: String,
    pub rating: i64,
    pub comment: Option<String>,
    pub created_at: String,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct PostRow {
    pub id: i64,
    pub user_id: i64,
    pub author_name: String,
    pub title: String,
    pub content: String,
    pub likes: i64,
    pub created_at: String,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct CommentRow {
    pub id: i64,
    pub post_id: i64,
    pub user_id: i64,
    pub author_name: String,
    pub text: String,
    pub created_at: String,
}

#[derive(Clone, Serialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct PostView {
    #[serde(flatten)]
    pub post: PostRow,
    pub comments: Vec<CommentRow>,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct Challenge {
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    pub description: String,
    pub starter_code: String,
    pub expected_output: String,
    pub difficulty: String,
    pub created_at: String,
}

// Admin dashboard aggregates

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct RoleCount {
    pub role: String,
    pub count: i64,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct DifficultyCount {
    pub difficulty: String,
    pub count: i64,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct CourseCompletionStat {
    pub course_id: i64,
    pub course_title: String,
    pub avg_completion: f64,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct QuizPerformanceStat {
    pub quiz_id: i64,
    pub lesson_title: String,
    pub question_count: i64,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct StudentProgressRow {
    pub user_id: i64,
    pub student_name: String,
    pub course_id: i64,
    pub course_title: String,
    pub completion_percentage: f64,
    #[serde(with = "sql_bool")]
    pub is_course_completed: bool,
}

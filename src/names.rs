pub const SESSION_COOKIE_NAME: &str = "session";

pub const REGISTER_URL: &str = "/register";
pub const LOGIN_URL: &str = "/login";
pub const LOGOUT_URL: &str = "/logout";
pub const PROFILE_URL: &str = "/profile";
pub const CHANGE_PASSWORD_URL: &str = "/password";

pub const COURSES_URL: &str = "/courses";
pub const ENROLL_URL: &str = "/enroll";
pub const ENROLLED_COURSES_URL: &str = "/enrolled-courses";

pub const LESSONS_URL: &str = "/lessons";
pub const QUIZZES_URL: &str = "/quizzes";
pub const SUBMIT_QUIZ_URL: &str = "/quiz/submit";

pub const CERTIFICATES_URL: &str = "/certificates";
pub const CERTIFICATE_POLICIES_URL: &str = "/certificate-policies";

pub const COURSE_FEEDBACK_URL: &str = "/course-feedback";
pub const POSTS_URL: &str = "/posts";
pub const CHALLENGES_URL: &str = "/challenges";
pub const AI_ASSIST_URL: &str = "/ai/assist";

pub fn course_url(course_id: i64) -> String {
    format!("/course/{course_id}")
}

pub fn course_lessons_url(course_id: i64) -> String {
    format!("/course/{course_id}/lessons")
}

pub fn quiz_url(quiz_id: i64) -> String {
    format!("/quiz/{quiz_id}")
}

pub fn certificate_url(course_id: i64) -> String {
    format!("/certificate/{course_id}")
}

pub fn course_reviews_url(course_id: i64) -> String {
    format!("/course/{course_id}/reviews")
}

// Feedback bounds
pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;
pub const REVIEW_MIN_RATING: i64 = 3;
pub const COURSE_REVIEWS_LIMIT: i64 = 5;

// Community feed
pub const COMMUNITY_FEED_LIMIT: i64 = 15;

// Catalog enums (validated on write, stored as TEXT)
pub const COURSE_DIFFICULTIES: &[&str] = &["Beginner", "Intermediate", "Advanced"];
pub const CHALLENGE_DIFFICULTIES: &[&str] = &["Easy", "Medium", "Hard"];

pub const STUDENT_ROLE: &str = "student";
pub const ADMIN_ROLE: &str = "admin";

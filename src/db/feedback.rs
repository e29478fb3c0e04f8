use color_eyre::Result;
use libsql::params;

use super::helpers::{query_all, query_count};
use super::models::FeedbackReview;
use super::Db;
use crate::names;

impl Db {
    /// One feedback entry per (course, student), enforced by the unique
    /// index. Returns false when the student already left feedback.
    pub async fn submit_course_feedback(
        &self,
        course_id: i64,
        student_id: i64,
        rating: i64,
        comment: Option<&str>,
    ) -> Result<bool> {
        let conn = self.connect().await?;
        let affected = conn
            .execute(
                r#"
                INSERT OR IGNORE INTO course_feedback (course_id, student_id, rating, comment)
                VALUES (?, ?, ?, ?)
                "#,
                params![course_id, student_id, rating, comment.map(str::to_owned)],
            )
            .await?;

        if affected > 0 {
            tracing::info!(
                "feedback submitted: course_id={course_id}, student_id={student_id}, rating={rating}"
            );
        }
        Ok(affected > 0)
    }

    pub async fn has_course_feedback(&self, course_id: i64, student_id: i64) -> Result<bool> {
        let conn = self.connect().await?;
        let exists = query_count(
            &conn,
            "SELECT EXISTS(SELECT 1 FROM course_feedback WHERE course_id = ? AND student_id = ?)",
            params![course_id, student_id],
        )
        .await?;
        Ok(exists > 0)
    }

    /// Latest well-rated reviews for a course landing page.
    pub async fn course_reviews(&self, course_id: i64) -> Result<Vec<FeedbackReview>> {
        let conn = self.connect().await?;
        query_all(
            &conn,
            r#"
            SELECT f.id, f.course_id, f.student_id, u.name AS student_name,
                   f.rating, f.comment, f.created_at
            FROM course_feedback f
            JOIN users u ON u.id = f.student_id
            WHERE f.course_id = ? AND f.rating >= ?
            ORDER BY f.id DESC
            LIMIT ?
            "#,
            params![
                course_id,
                names::REVIEW_MIN_RATING,
                names::COURSE_REVIEWS_LIMIT
            ],
        )
        .await
    }
}

use color_eyre::Result;
use libsql::params;

use super::helpers::{query_all, query_count, query_optional};
use super::models::{CertificatePolicy, CourseRef, EligibleCertificate, PolicyWithCourse};
use super::Db;

impl Db {
    /// Create or update the certificate threshold for a course.
    /// Returns true when a new policy was created.
    pub async fn upsert_certificate_policy(
        &self,
        course_id: i64,
        min_lectures_required: i64,
    ) -> Result<bool> {
        let conn = self.connect().await?;

        let existing = query_count(
            &conn,
            "SELECT EXISTS(SELECT 1 FROM certificate_policies WHERE course_id = ?)",
            params![course_id],
        )
        .await?;

        conn.execute(
            r#"
            INSERT INTO certificate_policies (course_id, min_lectures_required)
            VALUES (?, ?)
            ON CONFLICT(course_id) DO UPDATE SET min_lectures_required = excluded.min_lectures_required
            "#,
            params![course_id, min_lectures_required],
        )
        .await?;

        let created = existing == 0;
        tracing::info!(
            "certificate policy {} for course_id={course_id}: min_lectures={min_lectures_required}",
            if created { "created" } else { "updated" },
        );
        Ok(created)
    }

    pub async fn certificate_policy(&self, course_id: i64) -> Result<Option<CertificatePolicy>> {
        let conn = self.connect().await?;
        query_optional(
            &conn,
            "SELECT id, course_id, min_lectures_required, created_at FROM certificate_policies WHERE course_id = ?",
            params![course_id],
        )
        .await
    }

    pub async fn delete_certificate_policy(&self, policy_id: i64) -> Result<bool> {
        let conn = self.connect().await?;
        let affected = conn
            .execute(
                "DELETE FROM certificate_policies WHERE id = ?",
                params![policy_id],
            )
            .await?;

        if affected > 0 {
            tracing::info!("certificate policy deleted: id={policy_id}");
        }
        Ok(affected > 0)
    }

    /// Courses that have a certificate policy, for the admin view.
    pub async fn courses_with_certificates(&self) -> Result<Vec<PolicyWithCourse>> {
        let conn = self.connect().await?;
        query_all(
            &conn,
            r#"
            SELECT cp.id, cp.course_id, c.title AS course_title, cp.min_lectures_required
            FROM certificate_policies cp
            JOIN courses c ON c.id = cp.course_id
            ORDER BY c.id
            "#,
            (),
        )
        .await
    }

    /// Courses without a policy yet, for the admin view.
    pub async fn courses_without_certificates(&self) -> Result<Vec<CourseRef>> {
        let conn = self.connect().await?;
        query_all(
            &conn,
            r#"
            SELECT c.id, c.title
            FROM courses c
            LEFT JOIN certificate_policies cp ON cp.course_id = c.id
            WHERE cp.id IS NULL
            ORDER BY c.id
            "#,
            (),
        )
        .await
    }

    /// Every policy the student currently satisfies: completed-lesson
    /// count at or above the course threshold.
    pub async fn eligible_certificates(&self, user_id: i64) -> Result<Vec<EligibleCertificate>> {
        let conn = self.connect().await?;
        query_all(
            &conn,
            r#"
            SELECT cp.course_id, c.title AS course_title, cp.min_lectures_required,
                   COUNT(DISTINCT pl.lesson_id) AS completed_lessons
            FROM certificate_policies cp
            JOIN courses c ON c.id = cp.course_id
            JOIN progress p ON p.course_id = cp.course_id AND p.user_id = ?
            LEFT JOIN progress_lessons pl ON pl.progress_id = p.id
            GROUP BY cp.course_id, c.title, cp.min_lectures_required
            HAVING COUNT(DISTINCT pl.lesson_id) >= cp.min_lectures_required
            ORDER BY cp.course_id
            "#,
            params![user_id],
        )
        .await
    }
}

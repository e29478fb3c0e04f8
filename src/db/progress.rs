use color_eyre::Result;
use libsql::params;

use super::helpers::{query_all, query_count, query_optional};
use super::models::{Course, Progress, ProgressDetail, ProgressSummary, QuizScore};
use super::Db;
use crate::services::progress::completion_percentage;

impl Db {
    /// Enroll a student in a course by creating the empty progress row.
    /// Returns false when the student is already enrolled.
    pub async fn enroll(&self, user_id: i64, course_id: i64) -> Result<bool> {
        let conn = self.connect().await?;
        let affected = conn
            .execute(
                "INSERT OR IGNORE INTO progress (user_id, course_id) VALUES (?, ?)",
                params![user_id, course_id],
            )
            .await?;

        if affected > 0 {
            tracing::info!("user_id={user_id} enrolled in course_id={course_id}");
        }
        Ok(affected > 0)
    }

    pub async fn find_progress(&self, user_id: i64, course_id: i64) -> Result<Option<Progress>> {
        let conn = self.connect().await?;
        query_optional(
            &conn,
            r#"
            SELECT id, user_id, course_id, completion_percentage, is_course_completed, date_last_accessed
            FROM progress
            WHERE user_id = ? AND course_id = ?
            "#,
            params![user_id, course_id],
        )
        .await
    }

    /// Distinct lesson ids the student has completed in a course. Empty
    /// when no progress row exists yet.
    pub async fn completed_lesson_ids(&self, user_id: i64, course_id: i64) -> Result<Vec<i64>> {
        let conn = self.connect().await?;
        let mut rows = conn
            .query(
                r#"
                SELECT pl.lesson_id
                FROM progress p
                JOIN progress_lessons pl ON pl.progress_id = p.id
                WHERE p.user_id = ? AND p.course_id = ?
                ORDER BY pl.lesson_id
                "#,
                params![user_id, course_id],
            )
            .await?;

        let mut ids = Vec::new();
        while let Some(row) = rows.next().await? {
            ids.push(row.get::<i64>(0)?);
        }
        Ok(ids)
    }

    pub async fn completed_lesson_count(&self, user_id: i64, course_id: i64) -> Result<i64> {
        let conn = self.connect().await?;
        query_count(
            &conn,
            r#"
            SELECT COUNT(DISTINCT pl.lesson_id)
            FROM progress p
            JOIN progress_lessons pl ON pl.progress_id = p.id
            WHERE p.user_id = ? AND p.course_id = ?
            "#,
            params![user_id, course_id],
        )
        .await
    }

    /// Apply one scored quiz attempt to the student's progress: find or
    /// create the progress row, mark the lesson completed when the attempt
    /// passed, upsert the score entry, and recompute the completion
    /// aggregate. One transaction; the caller serializes per (user, course).
    pub async fn record_quiz_result(
        &self,
        user_id: i64,
        course_id: i64,
        lesson_id: i64,
        quiz_id: i64,
        score: f64,
        lesson_completed: bool,
    ) -> Result<ProgressDetail> {
        let conn = self.connect().await?;
        conn.execute("BEGIN IMMEDIATE", ()).await?;

        let result = Self::record_quiz_result_tx(
            &conn,
            user_id,
            course_id,
            lesson_id,
            quiz_id,
            score,
            lesson_completed,
        )
        .await;

        match result {
            Ok(()) => conn.execute("COMMIT", ()).await?,
            Err(e) => {
                let _ = conn.execute("ROLLBACK", ()).await;
                return Err(e);
            }
        };

        tracing::info!(
            "quiz result recorded: user_id={user_id}, quiz_id={quiz_id}, score={score}"
        );
        Self::progress_detail_on(&conn, user_id, course_id).await
    }

    async fn record_quiz_result_tx(
        conn: &libsql::Connection,
        user_id: i64,
        course_id: i64,
        lesson_id: i64,
        quiz_id: i64,
        score: f64,
        lesson_completed: bool,
    ) -> Result<()> {
        let existing: Option<Progress> = query_optional(
            conn,
            r#"
            SELECT id, user_id, course_id, completion_percentage, is_course_completed, date_last_accessed
            FROM progress
            WHERE user_id = ? AND course_id = ?
            "#,
            params![user_id, course_id],
        )
        .await?;

        let progress_id = match existing {
            Some(p) => p.id,
            None => {
                query_count(
                    conn,
                    "INSERT INTO progress (user_id, course_id) VALUES (?, ?) RETURNING id",
                    params![user_id, course_id],
                )
                .await?
            }
        };

        if lesson_completed {
            conn.execute(
                "INSERT OR IGNORE INTO progress_lessons (progress_id, lesson_id) VALUES (?, ?)",
                params![progress_id, lesson_id],
            )
            .await?;
        }

        conn.execute(
            r#"
            INSERT INTO progress_quizzes (progress_id, quiz_id, score)
            VALUES (?, ?, ?)
            ON CONFLICT(progress_id, quiz_id) DO UPDATE SET score = excluded.score
            "#,
            params![progress_id, quiz_id, score],
        )
        .await?;

        let completed = query_count(
            conn,
            "SELECT COUNT(DISTINCT lesson_id) FROM progress_lessons WHERE progress_id = ?",
            params![progress_id],
        )
        .await?;

        let total = query_count(
            conn,
            "SELECT COUNT(*) FROM lessons WHERE course_id = ?",
            params![course_id],
        )
        .await?;

        let percentage = completion_percentage(completed, total);
        let is_completed: i64 = (total > 0 && completed >= total).into();

        conn.execute(
            r#"
            UPDATE progress
            SET completion_percentage = ?, is_course_completed = ?,
                date_last_accessed = datetime('now')
            WHERE id = ?
            "#,
            params![percentage, is_completed, progress_id],
        )
        .await?;

        Ok(())
    }

    /// Progress row joined with its completed-lesson and quiz-score sets.
    pub async fn progress_detail(
        &self,
        user_id: i64,
        course_id: i64,
    ) -> Result<Option<ProgressDetail>> {
        let conn = self.connect().await?;
        let existing: Option<Progress> = query_optional(
            &conn,
            r#"
            SELECT id, user_id, course_id, completion_percentage, is_course_completed, date_last_accessed
            FROM progress
            WHERE user_id = ? AND course_id = ?
            "#,
            params![user_id, course_id],
        )
        .await?;

        match existing {
            Some(_) => Ok(Some(
                Self::progress_detail_on(&conn, user_id, course_id).await?,
            )),
            None => Ok(None),
        }
    }

    async fn progress_detail_on(
        conn: &libsql::Connection,
        user_id: i64,
        course_id: i64,
    ) -> Result<ProgressDetail> {
        let progress: Progress = super::helpers::query_one(
            conn,
            r#"
            SELECT id, user_id, course_id, completion_percentage, is_course_completed, date_last_accessed
            FROM progress
            WHERE user_id = ? AND course_id = ?
            "#,
            params![user_id, course_id],
        )
        .await?;

        let mut rows = conn
            .query(
                "SELECT lesson_id FROM progress_lessons WHERE progress_id = ? ORDER BY lesson_id",
                params![progress.id],
            )
            .await?;
        let mut completed_lessons = Vec::new();
        while let Some(row) = rows.next().await? {
            completed_lessons.push(row.get::<i64>(0)?);
        }

        let quizzes_completed: Vec<QuizScore> = query_all(
            conn,
            "SELECT quiz_id, score FROM progress_quizzes WHERE progress_id = ? ORDER BY quiz_id",
            params![progress.id],
        )
        .await?;

        Ok(ProgressDetail {
            id: progress.id,
            user_id: progress.user_id,
            course_id: progress.course_id,
            completed_lessons,
            quizzes_completed,
            completion_percentage: progress.completion_percentage,
            is_course_completed: progress.is_course_completed,
            date_last_accessed: progress.date_last_accessed,
        })
    }

    /// Courses the student is enrolled in, joined through progress.
    pub async fn enrolled_courses(&self, user_id: i64) -> Result<Vec<Course>> {
        let conn = self.connect().await?;
        query_all(
            &conn,
            r#"
            SELECT c.id, c.title, c.description, c.difficulty, c.category, c.thumbnail, c.created_at
            FROM progress p
            JOIN courses c ON c.id = p.course_id
            WHERE p.user_id = ?
            ORDER BY c.id
            "#,
            params![user_id],
        )
        .await
    }

    /// Per-course progress summaries for the profile view. This is the
    /// read-side join that replaces the embedded per-user mirror.
    pub async fn progress_summaries(&self, user_id: i64) -> Result<Vec<ProgressSummary>> {
        let conn = self.connect().await?;
        query_all(
            &conn,
            r#"
            SELECT p.course_id, c.title AS course_title,
                   COUNT(DISTINCT pl.lesson_id) AS completed_lessons,
                   p.completion_percentage, p.is_course_completed
            FROM progress p
            JOIN courses c ON c.id = p.course_id
            LEFT JOIN progress_lessons pl ON pl.progress_id = p.id
            WHERE p.user_id = ?
            GROUP BY p.id, p.course_id, c.title, p.completion_percentage, p.is_course_completed
            ORDER BY p.course_id
            "#,
            params![user_id],
        )
        .await
    }
}

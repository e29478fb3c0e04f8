use color_eyre::Result;
use libsql::params;

use super::helpers::{query_all, query_count, query_one, query_optional};
use super::models::Lesson;
use super::Db;
use crate::models::{LessonUpdate, LessonUpload};

impl Db {
    /// Append a lesson at the next position within its course. The caller
    /// is responsible for checking that the course exists.
    pub async fn create_lesson(&self, upload: &LessonUpload) -> Result<Lesson> {
        let conn = self.connect().await?;
        let lesson: Lesson = query_one(
            &conn,
            r#"
            INSERT INTO lessons (course_id, title, content, video_url, position)
            VALUES (?, ?, ?, ?,
                    (SELECT COALESCE(MAX(position), 0) + 1 FROM lessons WHERE course_id = ?))
            RETURNING id, course_id, title, content, video_url, position
            "#,
            params![
                upload.course_id,
                upload.title.clone(),
                upload.content.clone(),
                upload.video_url.clone(),
                upload.course_id
            ],
        )
        .await?;

        tracing::info!(
            "new lesson created: id={}, course_id={}, position={}",
            lesson.id,
            lesson.course_id,
            lesson.position
        );
        Ok(lesson)
    }

    pub async fn lesson(&self, lesson_id: i64) -> Result<Option<Lesson>> {
        let conn = self.connect().await?;
        query_optional(
            &conn,
            "SELECT id, course_id, title, content, video_url, position FROM lessons WHERE id = ?",
            params![lesson_id],
        )
        .await
    }

    /// All lessons of a course in gating order.
    pub async fn lessons_for_course(&self, course_id: i64) -> Result<Vec<Lesson>> {
        let conn = self.connect().await?;
        query_all(
            &conn,
            "SELECT id, course_id, title, content, video_url, position FROM lessons WHERE course_id = ? ORDER BY position",
            params![course_id],
        )
        .await
    }

    pub async fn lesson_count(&self, course_id: i64) -> Result<i64> {
        let conn = self.connect().await?;
        query_count(
            &conn,
            "SELECT COUNT(*) FROM lessons WHERE course_id = ?",
            params![course_id],
        )
        .await
    }

    pub async fn update_lesson(
        &self,
        lesson_id: i64,
        update: &LessonUpdate,
    ) -> Result<Option<Lesson>> {
        let conn = self.connect().await?;
        let updated: Option<Lesson> = query_optional(
            &conn,
            r#"
            UPDATE lessons
            SET title = ?, content = ?, video_url = ?
            WHERE id = ?
            RETURNING id, course_id, title, content, video_url, position
            "#,
            params![
                update.title.clone(),
                update.content.clone(),
                update.video_url.clone(),
                lesson_id
            ],
        )
        .await?;

        if updated.is_some() {
            tracing::info!("lesson updated: id={lesson_id}");
        }
        Ok(updated)
    }

    pub async fn delete_lesson(&self, lesson_id: i64) -> Result<bool> {
        let conn = self.connect().await?;
        let affected = conn
            .execute("DELETE FROM lessons WHERE id = ?", params![lesson_id])
            .await?;

        if affected > 0 {
            tracing::info!("lesson deleted: id={lesson_id}");
        }
        Ok(affected > 0)
    }

    /// Lessons of a course that do not have a quiz yet (quiz authoring
    /// picks from these).
    pub async fn lessons_without_quizzes(&self, course_id: i64) -> Result<Vec<Lesson>> {
        let conn = self.connect().await?;
        query_all(
            &conn,
            r#"
            SELECT l.id, l.course_id, l.title, l.content, l.video_url, l.position
            FROM lessons l
            LEFT JOIN quizzes q ON q.lesson_id = l.id
            WHERE l.course_id = ? AND q.id IS NULL
            ORDER BY l.position
            "#,
            params![course_id],
        )
        .await
    }
}

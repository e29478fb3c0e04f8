use color_eyre::Result;
use libsql::params;

use super::helpers::{query_all, query_one, query_optional};
use super::models::Course;
use super::Db;
use crate::models::CourseUpload;

impl Db {
    pub async fn create_course(&self, upload: &CourseUpload) -> Result<Course> {
        let conn = self.connect().await?;
        let course: Course = query_one(
            &conn,
            r#"
            INSERT INTO courses (title, description, difficulty, category, thumbnail)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, title, description, difficulty, category, thumbnail, created_at
            "#,
            params![
                upload.title.clone(),
                upload.description.clone(),
                upload.difficulty.clone(),
                upload.category.clone(),
                upload.thumbnail.clone()
            ],
        )
        .await?;

        tracing::info!("new course created: id={}, title={}", course.id, course.title);
        Ok(course)
    }

    pub async fn courses(&self) -> Result<Vec<Course>> {
        let conn = self.connect().await?;
        query_all(
            &conn,
            "SELECT id, title, description, difficulty, category, thumbnail, created_at FROM courses ORDER BY id",
            (),
        )
        .await
    }

    pub async fn course(&self, course_id: i64) -> Result<Option<Course>> {
        let conn = self.connect().await?;
        query_optional(
            &conn,
            "SELECT id, title, description, difficulty, category, thumbnail, created_at FROM courses WHERE id = ?",
            params![course_id],
        )
        .await
    }

    pub async fn update_course(
        &self,
        course_id: i64,
        upload: &CourseUpload,
    ) -> Result<Option<Course>> {
        let conn = self.connect().await?;
        let updated: Option<Course> = query_optional(
            &conn,
            r#"
            UPDATE courses
            SET title = ?, description = ?, difficulty = ?, category = ?,
                thumbnail = COALESCE(?, thumbnail)
            WHERE id = ?
            RETURNING id, title, description, difficulty, category, thumbnail, created_at
            "#,
            params![
                upload.title.clone(),
                upload.description.clone(),
                upload.difficulty.clone(),
                upload.category.clone(),
                upload.thumbnail.clone(),
                course_id
            ],
        )
        .await?;

        if updated.is_some() {
            tracing::info!("course updated: id={course_id}");
        }
        Ok(updated)
    }

    pub async fn delete_course(&self, course_id: i64) -> Result<bool> {
        let conn = self.connect().await?;
        let affected = conn
            .execute("DELETE FROM courses WHERE id = ?", params![course_id])
            .await?;

        if affected > 0 {
            tracing::info!("course deleted: id={course_id}");
        }
        Ok(affected > 0)
    }
}

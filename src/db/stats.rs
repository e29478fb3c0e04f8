// Admin dashboard aggregates.

use color_eyre::Result;

use super::helpers::query_all;
use super::models::{
    CourseCompletionStat, DifficultyCount, QuizPerformanceStat, RoleCount, StudentProgressRow,
};
use super::Db;

impl Db {
    pub async fn user_role_counts(&self) -> Result<Vec<RoleCount>> {
        let conn = self.connect().await?;
        query_all(
            &conn,
            "SELECT role, COUNT(*) AS count FROM users GROUP BY role ORDER BY role",
            (),
        )
        .await
    }

    pub async fn course_difficulty_counts(&self) -> Result<Vec<DifficultyCount>> {
        let conn = self.connect().await?;
        query_all(
            &conn,
            "SELECT difficulty, COUNT(*) AS count FROM courses GROUP BY difficulty ORDER BY difficulty",
            (),
        )
        .await
    }

    /// Average completion percentage per course, across enrolled students.
    pub async fn course_completion_stats(&self) -> Result<Vec<CourseCompletionStat>> {
        let conn = self.connect().await?;
        query_all(
            &conn,
            r#"
            SELECT p.course_id, c.title AS course_title,
                   ROUND(AVG(p.completion_percentage), 2) AS avg_completion
            FROM progress p
            JOIN courses c ON c.id = p.course_id
            GROUP BY p.course_id, c.title
            ORDER BY p.course_id
            "#,
            (),
        )
        .await
    }

    pub async fn quiz_performance_stats(&self) -> Result<Vec<QuizPerformanceStat>> {
        let conn = self.connect().await?;
        query_all(
            &conn,
            r#"
            SELECT q.id AS quiz_id, l.title AS lesson_title,
                   COUNT(qq.id) AS question_count
            FROM quizzes q
            JOIN lessons l ON l.id = q.lesson_id
            LEFT JOIN quiz_questions qq ON qq.quiz_id = q.id
            GROUP BY q.id, l.title
            ORDER BY q.id
            "#,
            (),
        )
        .await
    }

    /// Per-student per-course progress rows for the monitoring table.
    pub async fn student_progress_rows(&self) -> Result<Vec<StudentProgressRow>> {
        let conn = self.connect().await?;
        query_all(
            &conn,
            r#"
            SELECT p.user_id, u.name AS student_name, p.course_id, c.title AS course_title,
                   p.completion_percentage, p.is_course_completed
            FROM progress p
            JOIN users u ON u.id = p.user_id
            JOIN courses c ON c.id = p.course_id
            ORDER BY u.name, p.course_id
            "#,
            (),
        )
        .await
    }
}

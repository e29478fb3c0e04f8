use color_eyre::Result;
use libsql::params;
use serde::Deserialize;

use super::helpers::{query_all, query_count, query_optional};
use super::models::{QuestionFull, QuizContext, QuizListing, QuizRef};
use super::Db;
use crate::models::QuestionUpload;

#[derive(Deserialize)]
struct QuestionRow {
    id: i64,
    question_text: String,
    correct_answer: String,
}

#[derive(Deserialize)]
struct OptionRow {
    question_id: i64,
    option_text: String,
}

impl Db {
    /// Insert a quiz with all its questions and options atomically.
    /// The caller checks that the lesson exists and has no quiz yet.
    pub async fn create_quiz(
        &self,
        lesson_id: i64,
        questions: &[QuestionUpload],
    ) -> Result<QuizRef> {
        let conn = self.connect().await?;
        conn.execute("BEGIN IMMEDIATE", ()).await?;

        let result = Self::insert_quiz_tx(&conn, lesson_id, questions).await;
        match result {
            Ok(quiz_id) => {
                conn.execute("COMMIT", ()).await?;
                tracing::info!("new quiz created: id={quiz_id}, lesson_id={lesson_id}");
                Ok(QuizRef {
                    id: quiz_id,
                    lesson_id,
                })
            }
            Err(e) => {
                let _ = conn.execute("ROLLBACK", ()).await;
                Err(e)
            }
        }
    }

    async fn insert_quiz_tx(
        conn: &libsql::Connection,
        lesson_id: i64,
        questions: &[QuestionUpload],
    ) -> Result<i64> {
        let quiz_id = query_count(
            conn,
            "INSERT INTO quizzes (lesson_id) VALUES (?) RETURNING id",
            params![lesson_id],
        )
        .await?;

        Self::insert_questions_tx(conn, quiz_id, questions).await?;
        Ok(quiz_id)
    }

    async fn insert_questions_tx(
        conn: &libsql::Connection,
        quiz_id: i64,
        questions: &[QuestionUpload],
    ) -> Result<()> {
        for (position, q) in questions.iter().enumerate() {
            let question_id = query_count(
                conn,
                "INSERT INTO quiz_questions (quiz_id, question, correct_answer, position) VALUES (?, ?, ?, ?) RETURNING id",
                params![
                    quiz_id,
                    q.question_text.clone(),
                    q.correct_answer.clone(),
                    position as i64
                ],
            )
            .await?;

            for (opt_position, option) in q.options.iter().enumerate() {
                conn.execute(
                    "INSERT INTO quiz_options (question_id, option, position) VALUES (?, ?, ?)",
                    params![question_id, option.clone(), opt_position as i64],
                )
                .await?;
            }
        }
        Ok(())
    }

    pub async fn quiz_for_lesson(&self, lesson_id: i64) -> Result<Option<QuizRef>> {
        let conn = self.connect().await?;
        query_optional(
            &conn,
            "SELECT id, lesson_id FROM quizzes WHERE lesson_id = ?",
            params![lesson_id],
        )
        .await
    }

    /// Quiz refs for every quizzed lesson of a course, used by gating.
    pub async fn quiz_refs_for_course(&self, course_id: i64) -> Result<Vec<QuizRef>> {
        let conn = self.connect().await?;
        query_all(
            &conn,
            r#"
            SELECT q.id, q.lesson_id
            FROM quizzes q
            JOIN lessons l ON l.id = q.lesson_id
            WHERE l.course_id = ?
            "#,
            params![course_id],
        )
        .await
    }

    /// Where a quiz sits in the catalog: its lesson and course.
    pub async fn quiz_context(&self, quiz_id: i64) -> Result<Option<QuizContext>> {
        let conn = self.connect().await?;
        query_optional(
            &conn,
            r#"
            SELECT q.id AS quiz_id, l.id AS lesson_id, c.id AS course_id,
                   l.title AS lesson_title, c.title AS course_title
            FROM quizzes q
            JOIN lessons l ON l.id = q.lesson_id
            JOIN courses c ON c.id = l.course_id
            WHERE q.id = ?
            "#,
            params![quiz_id],
        )
        .await
    }

    /// Questions of a quiz in position order, each with its option texts.
    pub async fn quiz_questions(&self, quiz_id: i64) -> Result<Vec<QuestionFull>> {
        let conn = self.connect().await?;

        let questions: Vec<QuestionRow> = query_all(
            &conn,
            "SELECT id, question AS question_text, correct_answer FROM quiz_questions WHERE quiz_id = ? ORDER BY position",
            params![quiz_id],
        )
        .await?;

        let options: Vec<OptionRow> = query_all(
            &conn,
            r#"
            SELECT o.question_id, o.option AS option_text
            FROM quiz_options o
            JOIN quiz_questions qq ON qq.id = o.question_id
            WHERE qq.quiz_id = ?
            ORDER BY qq.position, o.position
            "#,
            params![quiz_id],
        )
        .await?;

        Ok(questions
            .into_iter()
            .map(|q| {
                let opts = options
                    .iter()
                    .filter(|o| o.question_id == q.id)
                    .map(|o| o.option_text.clone())
                    .collect();
                QuestionFull {
                    id: q.id,
                    question_text: q.question_text,
                    options: opts,
                    correct_answer: q.correct_answer,
                }
            })
            .collect())
    }

    /// Correct answers in question position order, for scoring.
    pub async fn correct_answers(&self, quiz_id: i64) -> Result<Vec<String>> {
        let conn = self.connect().await?;
        let mut rows = conn
            .query(
                "SELECT correct_answer FROM quiz_questions WHERE quiz_id = ? ORDER BY position",
                params![quiz_id],
            )
            .await?;

        let mut answers = Vec::new();
        while let Some(row) = rows.next().await? {
            answers.push(row.get::<String>(0)?);
        }
        Ok(answers)
    }

    pub async fn quizzes_for_course(&self, course_id: i64) -> Result<Vec<QuizListing>> {
        let conn = self.connect().await?;
        query_all(
            &conn,
            r#"
            SELECT q.id, q.lesson_id, l.title AS lesson_title,
                   COUNT(qq.id) AS question_count
            FROM quizzes q
            JOIN lessons l ON l.id = q.lesson_id
            LEFT JOIN quiz_questions qq ON qq.quiz_id = q.id
            WHERE l.course_id = ?
            GROUP BY q.id, q.lesson_id, l.title
            ORDER BY l.position
            "#,
            params![course_id],
        )
        .await
    }

    /// Replace a quiz's questions wholesale. Returns false when the quiz
    /// does not exist.
    pub async fn update_quiz(&self, quiz_id: i64, questions: &[QuestionUpload]) -> Result<bool> {
        let conn = self.connect().await?;

        let exists = query_count(
            &conn,
            "SELECT EXISTS(SELECT 1 FROM quizzes WHERE id = ?)",
            params![quiz_id],
        )
        .await?;
        if exists == 0 {
            return Ok(false);
        }

        conn.execute("BEGIN IMMEDIATE", ()).await?;
        let result = async {
            conn.execute(
                "DELETE FROM quiz_questions WHERE quiz_id = ?",
                params![quiz_id],
            )
            .await?;
            Self::insert_questions_tx(&conn, quiz_id, questions).await
        }
        .await;

        match result {
            Ok(()) => {
                conn.execute("COMMIT", ()).await?;
                tracing::info!("quiz updated: id={quiz_id}");
                Ok(true)
            }
            Err(e) => {
                let _ = conn.execute("ROLLBACK", ()).await;
                Err(e)
            }
        }
    }

    pub async fn delete_quiz(&self, quiz_id: i64) -> Result<bool> {
        let conn = self.connect().await?;
        let affected = conn
            .execute("DELETE FROM quizzes WHERE id = ?", params![quiz_id])
            .await?;

        if affected > 0 {
            tracing::info!("quiz deleted: id={quiz_id}");
        }
        Ok(affected > 0)
    }
}

//! Quiz scoring and progress tracking.
//!
//! Scoring and the completion aggregate are pure functions; the service
//! wraps them with the store round-trips and serializes writes per
//! (user, course) so concurrent submissions cannot lose updates.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use color_eyre::Result;

use crate::db::models::ProgressDetail;
use crate::db::Db;

/// Count exact, case-sensitive matches between submitted answers and the
/// correct answers at each question position. Returns the match count and
/// the resulting score (0-100, unrounded).
pub fn score_answers(correct_answers: &[String], selected: &HashMap<usize, String>) -> (usize, f64) {
    if correct_answers.is_empty() {
        return (0, 0.0);
    }

    let correct_count = correct_answers
        .iter()
        .enumerate()
        .filter(|(i, answer)| selected.get(i).is_some_and(|s| s == *answer))
        .count();

    let score = correct_count as f64 / correct_answers.len() as f64 * 100.0;
    (correct_count, score)
}

/// Completion percentage contract: distinct completed lessons over the
/// course total, times 100, rounded half-up to two decimals. Clamped so it
/// never exceeds 100; zero-lesson courses report 0.
pub fn completion_percentage(completed: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    let completed = completed.min(total);
    round2(completed as f64 / total as f64 * 100.0)
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

pub enum SubmitOutcome {
    QuizNotFound,
    Scored { score: f64, progress: ProgressDetail },
}

/// Serializes quiz submissions per (user, course) and applies the scored
/// attempt in a single transaction.
#[derive(Clone)]
pub struct ProgressService {
    db: Db,
    locks: Arc<Mutex<HashMap<(i64, i64), Arc<tokio::sync::Mutex<()>>>>>,
}

impl ProgressService {
    pub fn new(db: Db) -> Self {
        Self {
            db,
            locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn lock_for(&self, key: (i64, i64)) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().expect("progress lock map poisoned");
        locks.entry(key).or_default().clone()
    }

    pub async fn submit_quiz(
        &self,
        user_id: i64,
        quiz_id: i64,
        selected: &HashMap<usize, String>,
    ) -> Result<SubmitOutcome> {
        let Some(ctx) = self.db.quiz_context(quiz_id).await? else {
            return Ok(SubmitOutcome::QuizNotFound);
        };

        let correct_answers = self.db.correct_answers(quiz_id).await?;
        let (correct_count, score) = score_answers(&correct_answers, selected);

        // A lesson counts as completed only when the whole quiz was
        // answered correctly.
        let lesson_completed =
            !correct_answers.is_empty() && correct_count == correct_answers.len();

        let lock = self.lock_for((user_id, ctx.course_id));
        let _guard = lock.lock().await;

        let progress = self
            .db
            .record_quiz_result(
                user_id,
                ctx.course_id,
                ctx.lesson_id,
                quiz_id,
                score,
                lesson_completed,
            )
            .await?;

        Ok(SubmitOutcome::Scored { score, progress })
    }
}

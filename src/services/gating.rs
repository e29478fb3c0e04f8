//! Lesson unlock gating.
//!
//! Walks a course's lessons in position order, carrying an `unlocked`
//! flag. The first lesson is always unlocked; each later lesson is
//! unlocked only while every earlier quizzed lesson has been completed.
//! Lessons without a quiz cannot be completed by quiz submission, so they
//! are excluded from the chain instead of locking everything after them.

use std::collections::HashSet;

use serde::Serialize;

use crate::db::models::{Lesson, QuizRef};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatedLesson {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub quiz: Option<QuizRef>,
    pub is_unlocked: bool,
}

pub fn annotate_unlocks(
    lessons: Vec<(Lesson, Option<QuizRef>)>,
    completed: &HashSet<i64>,
) -> Vec<GatedLesson> {
    let mut unlocked = true;
    let mut gated = Vec::with_capacity(lessons.len());

    for (lesson, quiz) in lessons {
        let satisfied = quiz.is_none() || completed.contains(&lesson.id);

        gated.push(GatedLesson {
            id: lesson.id,
            title: lesson.title,
            content: lesson.content,
            quiz,
            is_unlocked: unlocked,
        });

        unlocked = unlocked && satisfied;
    }

    gated
}

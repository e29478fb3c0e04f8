mod common;

use std::collections::{HashMap, HashSet};

use common::{create_course, create_lesson, create_quiz, create_student, create_test_db};
use learnhub::db::Db;
use learnhub::services::gating::{annotate_unlocks, GatedLesson};
use learnhub::services::progress::ProgressService;

/// Assemble the gated lesson list the way the handler does: ordered
/// lessons, their quizzes, and the student's completed-lesson set.
async fn gated_lessons(db: &Db, course_id: i64, user_id: i64) -> Vec<GatedLesson> {
    let lessons = db.lessons_for_course(course_id).await.unwrap();
    let mut quizzes: HashMap<i64, _> = db
        .quiz_refs_for_course(course_id)
        .await
        .unwrap()
        .into_iter()
        .map(|q| (q.lesson_id, q))
        .collect();
    let completed: HashSet<i64> = db
        .completed_lesson_ids(user_id, course_id)
        .await
        .unwrap()
        .into_iter()
        .collect();

    let paired = lessons
        .into_iter()
        .map(|lesson| {
            let quiz = quizzes.remove(&lesson.id);
            (lesson, quiz)
        })
        .collect();

    annotate_unlocks(paired, &completed)
}

fn unlock_flags(gated: &[GatedLesson]) -> Vec<bool> {
    gated.iter().map(|g| g.is_unlocked).collect()
}

#[tokio::test]
async fn only_the_first_lesson_starts_unlocked() {
    let db = create_test_db().await;
    let course_id = create_course(&db, "Gated").await;
    for title in ["One", "Two", "Three"] {
        let lesson_id = create_lesson(&db, course_id, title).await;
        create_quiz(&db, lesson_id, &[("Q", "a")]).await;
    }
    let user_id = create_student(&db, "fresh@test.com").await;

    let gated = gated_lessons(&db, course_id, user_id).await;
    assert_eq!(unlock_flags(&gated), vec![true, false, false]);
    assert!(gated.iter().all(|g| g.quiz.is_some()));
}

#[tokio::test]
async fn passing_a_quiz_unlocks_the_next_lesson() {
    let db = create_test_db().await;
    let course_id = create_course(&db, "Gated").await;
    let first = create_lesson(&db, course_id, "One").await;
    let first_quiz = create_quiz(&db, first, &[("Q", "a")]).await;
    for title in ["Two", "Three"] {
        let lesson_id = create_lesson(&db, course_id, title).await;
        create_quiz(&db, lesson_id, &[("Q", "a")]).await;
    }
    let user_id = create_student(&db, "learner@test.com").await;

    let service = ProgressService::new(db.clone());
    let answers = HashMap::from([(0usize, "a".to_string())]);
    service
        .submit_quiz(user_id, first_quiz, &answers)
        .await
        .unwrap();

    let gated = gated_lessons(&db, course_id, user_id).await;
    assert_eq!(unlock_flags(&gated), vec![true, true, false]);
}

#[tokio::test]
async fn failing_a_quiz_unlocks_nothing() {
    let db = create_test_db().await;
    let course_id = create_course(&db, "Gated").await;
    let first = create_lesson(&db, course_id, "One").await;
    let first_quiz = create_quiz(&db, first, &[("Q", "a")]).await;
    let second = create_lesson(&db, course_id, "Two").await;
    create_quiz(&db, second, &[("Q", "a")]).await;
    let user_id = create_student(&db, "struggler@test.com").await;

    let service = ProgressService::new(db.clone());
    let answers = HashMap::from([(0usize, "b".to_string())]);
    service
        .submit_quiz(user_id, first_quiz, &answers)
        .await
        .unwrap();

    let gated = gated_lessons(&db, course_id, user_id).await;
    assert_eq!(unlock_flags(&gated), vec![true, false]);
}

#[tokio::test]
async fn quizless_lesson_does_not_block_progression() {
    let db = create_test_db().await;
    let course_id = create_course(&db, "Gated").await;
    let first = create_lesson(&db, course_id, "One").await;
    let first_quiz = create_quiz(&db, first, &[("Q", "a")]).await;
    // Reading-only lesson with no quiz.
    create_lesson(&db, course_id, "Interlude").await;
    let third = create_lesson(&db, course_id, "Three").await;
    create_quiz(&db, third, &[("Q", "a")]).await;
    let user_id = create_student(&db, "reader@test.com").await;

    let service = ProgressService::new(db.clone());
    let answers = HashMap::from([(0usize, "a".to_string())]);
    service
        .submit_quiz(user_id, first_quiz, &answers)
        .await
        .unwrap();

    let gated = gated_lessons(&db, course_id, user_id).await;
    assert_eq!(unlock_flags(&gated), vec![true, true, true]);
    assert!(gated[1].quiz.is_none());
}

#[tokio::test]
async fn lessons_keep_their_authoring_order() {
    let db = create_test_db().await;
    let course_id = create_course(&db, "Ordered").await;
    let mut expected = Vec::new();
    for title in ["Alpha", "Beta", "Gamma", "Delta"] {
        expected.push(create_lesson(&db, course_id, title).await);
    }

    let lessons = db.lessons_for_course(course_id).await.unwrap();
    let ids: Vec<i64> = lessons.iter().map(|l| l.id).collect();
    assert_eq!(ids, expected);

    let positions: Vec<i64> = lessons.iter().map(|l| l.position).collect();
    assert_eq!(positions, vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn lessons_without_quizzes_listing() {
    let db = create_test_db().await;
    let course_id = create_course(&db, "Mixed").await;
    let quizzed = create_lesson(&db, course_id, "Quizzed").await;
    create_quiz(&db, quizzed, &[("Q", "a")]).await;
    let bare = create_lesson(&db, course_id, "Bare").await;

    let without = db.lessons_without_quizzes(course_id).await.unwrap();
    assert_eq!(without.len(), 1);
    assert_eq!(without[0].id, bare);
}

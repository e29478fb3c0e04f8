mod common;

use std::collections::HashMap;

use common::{create_course, create_lesson, create_quiz, create_student, create_test_db};
use learnhub::db::models::ProgressDetail;
use learnhub::services::progress::{ProgressService, SubmitOutcome};

fn answers(pairs: &[(usize, &str)]) -> HashMap<usize, String> {
    pairs.iter().map(|(i, s)| (*i, s.to_string())).collect()
}

fn scored(outcome: SubmitOutcome) -> (f64, ProgressDetail) {
    match outcome {
        SubmitOutcome::Scored { score, progress } => (score, progress),
        SubmitOutcome::QuizNotFound => panic!("expected a scored submission"),
    }
}

#[tokio::test]
async fn perfect_submission_scores_100_and_completes_the_lesson() {
    let db = create_test_db().await;
    let course_id = create_course(&db, "Intro").await;
    let lesson_a = create_lesson(&db, course_id, "Lesson A").await;
    create_lesson(&db, course_id, "Lesson B").await;
    let quiz_id = create_quiz(&db, lesson_a, &[("Q1", "x"), ("Q2", "y")]).await;
    let user_id = create_student(&db, "perfect@test.com").await;
    assert_eq!(db.lesson_count(course_id).await.unwrap(), 2);

    let service = ProgressService::new(db.clone());
    let outcome = service
        .submit_quiz(user_id, quiz_id, &answers(&[(0, "x"), (1, "y")]))
        .await
        .unwrap();

    let (score, progress) = scored(outcome);
    assert_eq!(score, 100.0);
    assert_eq!(progress.completed_lessons, vec![lesson_a]);
    assert_eq!(progress.completion_percentage, 50.0);
    assert!(!progress.is_course_completed);
    assert_eq!(progress.quizzes_completed.len(), 1);
    assert_eq!(progress.quizzes_completed[0].quiz_id, quiz_id);
    assert_eq!(progress.quizzes_completed[0].score, 100.0);
}

#[tokio::test]
async fn partial_submission_scores_50_without_completing_the_lesson() {
    let db = create_test_db().await;
    let course_id = create_course(&db, "Intro").await;
    let lesson_a = create_lesson(&db, course_id, "Lesson A").await;
    create_lesson(&db, course_id, "Lesson B").await;
    let quiz_id = create_quiz(&db, lesson_a, &[("Q1", "x"), ("Q2", "y")]).await;
    let user_id = create_student(&db, "partial@test.com").await;

    let service = ProgressService::new(db.clone());
    let outcome = service
        .submit_quiz(user_id, quiz_id, &answers(&[(0, "x"), (1, "z")]))
        .await
        .unwrap();

    let (score, progress) = scored(outcome);
    assert_eq!(score, 50.0);
    assert!(progress.completed_lessons.is_empty());
    assert_eq!(progress.completion_percentage, 0.0);
    // The attempt is still recorded even though the lesson stays incomplete.
    assert_eq!(progress.quizzes_completed.len(), 1);
    assert_eq!(progress.quizzes_completed[0].score, 50.0);
}

#[tokio::test]
async fn resubmission_updates_the_score_entry_in_place() {
    let db = create_test_db().await;
    let course_id = create_course(&db, "Intro").await;
    let lesson_a = create_lesson(&db, course_id, "Lesson A").await;
    let quiz_id = create_quiz(&db, lesson_a, &[("Q1", "x"), ("Q2", "y")]).await;
    let user_id = create_student(&db, "retry@test.com").await;

    let service = ProgressService::new(db.clone());

    let outcome = service
        .submit_quiz(user_id, quiz_id, &answers(&[(0, "x"), (1, "z")]))
        .await
        .unwrap();
    let (_, progress) = scored(outcome);
    assert_eq!(progress.quizzes_completed.len(), 1);
    assert_eq!(progress.quizzes_completed[0].score, 50.0);

    let outcome = service
        .submit_quiz(user_id, quiz_id, &answers(&[(0, "x"), (1, "y")]))
        .await
        .unwrap();
    let (_, progress) = scored(outcome);

    // Updated, not duplicated.
    assert_eq!(progress.quizzes_completed.len(), 1);
    assert_eq!(progress.quizzes_completed[0].score, 100.0);
    assert_eq!(progress.completed_lessons, vec![lesson_a]);
}

#[tokio::test]
async fn completing_every_lesson_completes_the_course() {
    let db = create_test_db().await;
    let course_id = create_course(&db, "Intro").await;
    let lesson_a = create_lesson(&db, course_id, "Lesson A").await;
    let lesson_b = create_lesson(&db, course_id, "Lesson B").await;
    let quiz_a = create_quiz(&db, lesson_a, &[("Q1", "x")]).await;
    let quiz_b = create_quiz(&db, lesson_b, &[("Q1", "y")]).await;
    let user_id = create_student(&db, "finisher@test.com").await;

    let service = ProgressService::new(db.clone());

    let outcome = service
        .submit_quiz(user_id, quiz_a, &answers(&[(0, "x")]))
        .await
        .unwrap();
    let (_, progress) = scored(outcome);
    assert_eq!(progress.completion_percentage, 50.0);
    assert!(!progress.is_course_completed);

    let outcome = service
        .submit_quiz(user_id, quiz_b, &answers(&[(0, "y")]))
        .await
        .unwrap();
    let (_, progress) = scored(outcome);
    assert_eq!(progress.completion_percentage, 100.0);
    assert!(progress.is_course_completed);
    assert_eq!(progress.completed_lessons, vec![lesson_a, lesson_b]);
}

#[tokio::test]
async fn percentage_is_rounded_to_two_decimals() {
    let db = create_test_db().await;
    let course_id = create_course(&db, "Thirds").await;
    let lesson_a = create_lesson(&db, course_id, "Lesson A").await;
    create_lesson(&db, course_id, "Lesson B").await;
    create_lesson(&db, course_id, "Lesson C").await;
    let quiz_id = create_quiz(&db, lesson_a, &[("Q1", "x")]).await;
    let user_id = create_student(&db, "thirds@test.com").await;

    let service = ProgressService::new(db.clone());
    let outcome = service
        .submit_quiz(user_id, quiz_id, &answers(&[(0, "x")]))
        .await
        .unwrap();

    let (_, progress) = scored(outcome);
    assert_eq!(progress.completion_percentage, 33.33);
}

#[tokio::test]
async fn unknown_quiz_reports_not_found() {
    let db = create_test_db().await;
    let user_id = create_student(&db, "lost@test.com").await;

    let service = ProgressService::new(db.clone());
    let outcome = service
        .submit_quiz(user_id, 4242, &answers(&[(0, "x")]))
        .await
        .unwrap();

    assert!(matches!(outcome, SubmitOutcome::QuizNotFound));
}

#[tokio::test]
async fn concurrent_submissions_lose_no_updates() {
    let db = create_test_db().await;
    let course_id = create_course(&db, "Intro").await;
    let lesson_a = create_lesson(&db, course_id, "Lesson A").await;
    let lesson_b = create_lesson(&db, course_id, "Lesson B").await;
    let quiz_a = create_quiz(&db, lesson_a, &[("Q1", "x")]).await;
    let quiz_b = create_quiz(&db, lesson_b, &[("Q1", "y")]).await;
    let user_id = create_student(&db, "racer@test.com").await;

    let service = ProgressService::new(db.clone());

    let answers_a = answers(&[(0, "x")]);
    let answers_b = answers(&[(0, "y")]);
    let (first, second) = tokio::join!(
        service.submit_quiz(user_id, quiz_a, &answers_a),
        service.submit_quiz(user_id, quiz_b, &answers_b),
    );
    first.unwrap();
    second.unwrap();

    let progress = db
        .progress_detail(user_id, course_id)
        .await
        .unwrap()
        .expect("progress row exists");

    assert_eq!(progress.completed_lessons, vec![lesson_a, lesson_b]);
    assert_eq!(progress.quizzes_completed.len(), 2);
    assert_eq!(progress.completion_percentage, 100.0);
    assert!(progress.is_course_completed);
}

#[tokio::test]
async fn enrollment_is_unique_per_user_and_course() {
    let db = create_test_db().await;
    let course_id = create_course(&db, "Intro").await;
    let user_id = create_student(&db, "enrollee@test.com").await;

    assert!(db.enroll(user_id, course_id).await.unwrap());
    assert!(!db.enroll(user_id, course_id).await.unwrap());

    let enrolled = db.enrolled_courses(user_id).await.unwrap();
    assert_eq!(enrolled.len(), 1);
    assert_eq!(enrolled[0].id, course_id);
}

#[tokio::test]
async fn progress_summaries_join_replaces_the_embedded_mirror() {
    let db = create_test_db().await;
    let course_id = create_course(&db, "Intro").await;
    let lesson_a = create_lesson(&db, course_id, "Lesson A").await;
    create_lesson(&db, course_id, "Lesson B").await;
    let quiz_id = create_quiz(&db, lesson_a, &[("Q1", "x")]).await;
    let user_id = create_student(&db, "mirror@test.com").await;

    let service = ProgressService::new(db.clone());
    service
        .submit_quiz(user_id, quiz_id, &answers(&[(0, "x")]))
        .await
        .unwrap();

    let summaries = db.progress_summaries(user_id).await.unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].course_id, course_id);
    assert_eq!(summaries[0].completed_lessons, 1);
    assert_eq!(summaries[0].completion_percentage, 50.0);
    assert!(!summaries[0].is_course_completed);
}

mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use common::{
    app, create_course, create_lesson, create_quiz, create_student, create_test_db, session_cookie,
};
use http_body_util::BodyExt;
use learnhub::names;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    cookie: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&value).expect("serialize body"))
        }
        None => Body::empty(),
    };

    let resp = app
        .clone()
        .oneshot(builder.body(body).expect("request build should succeed"))
        .await
        .expect("router should respond");

    let status = resp.status();
    let bytes = resp
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response is JSON")
    };

    (status, value)
}

#[tokio::test]
async fn register_login_and_profile_flow() {
    let db = create_test_db().await;
    let app = app(db);

    let (status, body) = send(
        &app,
        Method::POST,
        "/register",
        None,
        Some(json!({
            "name": "Ada",
            "email": "ada@test.com",
            "password": "password123",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Registration successful");

    // Duplicate registration is rejected before any write.
    let (status, _) = send(
        &app,
        Method::POST,
        "/register",
        None,
        Some(json!({
            "name": "Ada",
            "email": "ada@test.com",
            "password": "password123",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Wrong password is unauthorized.
    let (status, _) = send(
        &app,
        Method::POST,
        "/login",
        None,
        Some(json!({ "email": "ada@test.com", "password": "wrong-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Successful login sets the session cookie.
    let login_req = Request::builder()
        .method(Method::POST)
        .uri("/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::to_vec(&json!({
                "email": "ada@test.com",
                "password": "password123",
            }))
            .unwrap(),
        ))
        .unwrap();
    let resp = app.clone().oneshot(login_req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let set_cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .expect("login sets a cookie")
        .to_str()
        .unwrap();
    let cookie = set_cookie
        .split(';')
        .next()
        .expect("cookie pair")
        .to_string();

    let (status, body) = send(&app, Method::GET, "/profile", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "ada@test.com");
    assert_eq!(body["user"]["role"], "student");
    assert!(body["progress"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn quiz_submission_flow_over_http() {
    let db = create_test_db().await;
    let course_id = create_course(&db, "Intro").await;
    let lesson_a = create_lesson(&db, course_id, "Lesson A").await;
    create_lesson(&db, course_id, "Lesson B").await;
    let quiz_id = create_quiz(&db, lesson_a, &[("Q1", "x"), ("Q2", "y")]).await;
    let student = create_student(&db, "quiztaker@test.com").await;
    let cookie = session_cookie(&db, student).await;
    let app = app(db);

    // Unknown quiz id is a 404.
    let (status, _) = send(
        &app,
        Method::POST,
        "/quiz/submit",
        Some(&cookie),
        Some(json!({ "quizId": 999, "selectedAnswers": { "0": "x" } })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Perfect submission.
    let (status, body) = send(
        &app,
        Method::POST,
        "/quiz/submit",
        Some(&cookie),
        Some(json!({ "quizId": quiz_id, "selectedAnswers": { "0": "x", "1": "y" } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["score"], 100.0);
    assert_eq!(body["progress"]["completionPercentage"], 50.0);
    assert_eq!(body["progress"]["isCourseCompleted"], false);
    assert_eq!(
        body["progress"]["completedLessons"],
        json!([lesson_a]),
    );

    // The gated listing now unlocks lesson B.
    let (status, body) = send(
        &app,
        Method::GET,
        &names::course_lessons_url(course_id),
        Some(&cookie),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let lessons = body.as_array().unwrap();
    assert_eq!(lessons.len(), 2);
    assert_eq!(lessons[0]["isUnlocked"], true);
    assert_eq!(lessons[1]["isUnlocked"], true);
    assert!(lessons[0]["quiz"].is_object());
    assert!(lessons[1]["quiz"].is_null());
}

#[tokio::test]
async fn quiz_detail_withholds_correct_answers() {
    let db = create_test_db().await;
    let course_id = create_course(&db, "Intro").await;
    let lesson_a = create_lesson(&db, course_id, "Lesson A").await;
    let quiz_id = create_quiz(&db, lesson_a, &[("Q1", "x")]).await;
    let student = create_student(&db, "peeker@test.com").await;
    let cookie = session_cookie(&db, student).await;
    let app = app(db);

    let (status, body) = send(
        &app,
        Method::GET,
        &names::quiz_url(quiz_id),
        Some(&cookie),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["lessonTitle"], "Lesson A");
    assert_eq!(body["courseTitle"], "Intro");

    let questions = body["quiz"]["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 1);
    assert_eq!(questions[0]["questionText"], "Q1");
    assert!(questions[0].get("correctAnswer").is_none());

    let (status, body) = send(
        &app,
        Method::GET,
        &names::course_url(course_id),
        Some(&cookie),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Intro");
    assert_eq!(body["difficulty"], "Beginner");
}

#[tokio::test]
async fn certificate_download_enforces_eligibility() {
    let db = create_test_db().await;
    let course_id = create_course(&db, "Certifiable").await;
    let lesson_id = create_lesson(&db, course_id, "Only Lesson").await;
    let quiz_id = create_quiz(&db, lesson_id, &[("Q", "a")]).await;
    let student = create_student(&db, "graduate@test.com").await;
    let cookie = session_cookie(&db, student).await;

    db.upsert_certificate_policy(course_id, 1).await.unwrap();
    let app = app(db);

    // No policy for this course id.
    let (status, _) = send(&app, Method::GET, "/certificate/999", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Below the threshold: forbidden with guidance.
    let (status, body) = send(
        &app,
        Method::GET,
        &names::certificate_url(course_id),
        Some(&cookie),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body["message"],
        "Complete required lectures to download the certificate."
    );

    // Complete the lesson, then the download data is served.
    let (status, _) = send(
        &app,
        Method::POST,
        "/quiz/submit",
        Some(&cookie),
        Some(json!({ "quizId": quiz_id, "selectedAnswers": { "0": "a" } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        Method::GET,
        &names::certificate_url(course_id),
        Some(&cookie),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["student"]["name"], "Student");
    assert_eq!(body["course"]["title"], "Certifiable");
    assert_eq!(body["percentage"], 100.0);

    let (status, body) = send(&app, Method::GET, "/certificates", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::OK);
    let eligible = body.as_array().unwrap();
    assert_eq!(eligible.len(), 1);
    assert_eq!(eligible[0]["courseId"], course_id);
}

#[tokio::test]
async fn feedback_is_validated_and_unique() {
    let db = create_test_db().await;
    let course_id = create_course(&db, "Reviewed").await;
    let student = create_student(&db, "reviewer@test.com").await;
    let cookie = session_cookie(&db, student).await;
    let app = app(db);

    // Out-of-range rating fails before any write.
    let (status, _) = send(
        &app,
        Method::POST,
        "/course-feedback",
        Some(&cookie),
        Some(json!({ "courseId": course_id, "rating": 6, "comment": "!" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        "/course-feedback",
        Some(&cookie),
        Some(json!({ "courseId": course_id, "rating": 5, "comment": "Great" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Second submission for the same course is rejected.
    let (status, _) = send(
        &app,
        Method::POST,
        "/course-feedback",
        Some(&cookie),
        Some(json!({ "courseId": course_id, "rating": 4, "comment": "Again" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        Method::GET,
        &names::course_reviews_url(course_id),
        Some(&cookie),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let reviews = body.as_array().unwrap();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0]["rating"], 5);
    assert_eq!(reviews[0]["studentName"], "Student");
}

#[tokio::test]
async fn community_feed_flow() {
    let db = create_test_db().await;
    let author = create_student(&db, "author@test.com").await;
    let commenter = create_student(&db, "commenter@test.com").await;
    let author_cookie = session_cookie(&db, author).await;
    let commenter_cookie = session_cookie(&db, commenter).await;
    let app = app(db);

    let (status, body) = send(
        &app,
        Method::POST,
        "/posts",
        Some(&author_cookie),
        Some(json!({ "title": "Hello", "content": "First post" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let post_id = body["post"]["id"].as_i64().unwrap();

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/posts/{post_id}/comments"),
        Some(&commenter_cookie),
        Some(json!({ "text": "Welcome!" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Like, then unlike.
    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/posts/{post_id}/like"),
        Some(&commenter_cookie),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["likes"], 1);

    let (_, body) = send(
        &app,
        Method::POST,
        &format!("/posts/{post_id}/like"),
        Some(&commenter_cookie),
        None,
    )
    .await;
    assert_eq!(body["likes"], 0);

    let (status, body) = send(&app, Method::GET, "/posts", Some(&author_cookie), None).await;
    assert_eq!(status, StatusCode::OK);
    let posts = body.as_array().unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["title"], "Hello");
    assert_eq!(posts[0]["comments"].as_array().unwrap().len(), 1);
    assert_eq!(posts[0]["comments"][0]["text"], "Welcome!");

    // Comments on a missing post are a 404.
    let (status, _) = send(
        &app,
        Method::POST,
        "/posts/999/comments",
        Some(&commenter_cookie),
        Some(json!({ "text": "lost" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

mod common;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use common::{app, create_admin, create_student, create_test_db, session_cookie};
use tower::ServiceExt;

#[tokio::test]
async fn protected_routes_reject_requests_without_a_session() {
    let db = create_test_db().await;
    let app = app(db);

    let cases = [
        (Method::GET, "/courses", Body::empty()),
        (Method::GET, "/course/1/lessons", Body::empty()),
        (Method::GET, "/certificates", Body::empty()),
        (Method::GET, "/certificate/1", Body::empty()),
        (Method::GET, "/posts", Body::empty()),
        (Method::GET, "/profile", Body::empty()),
        (
            Method::POST,
            "/quiz/submit",
            Body::from(r#"{"quizId":1,"selectedAnswers":{}}"#),
        ),
        (
            Method::POST,
            "/enroll",
            Body::from(r#"{"courseId":1}"#),
        ),
    ];

    for (method, uri, body) in cases {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(body)
            .expect("request build should succeed");

        let resp = app
            .clone()
            .oneshot(req)
            .await
            .expect("router should respond");

        assert_eq!(
            resp.status(),
            StatusCode::UNAUTHORIZED,
            "expected UNAUTHORIZED for {uri}",
        );
    }
}

#[tokio::test]
async fn admin_routes_reject_students() {
    let db = create_test_db().await;
    let student = create_student(&db, "student@test.com").await;
    let cookie = session_cookie(&db, student).await;
    let app = app(db);

    let cases = [
        (
            Method::POST,
            "/courses",
            Body::from(
                r#"{"title":"T","description":"D","difficulty":"Beginner","category":"C"}"#,
            ),
        ),
        (
            Method::POST,
            "/certificate-policies",
            Body::from(r#"{"courseId":1,"minLecturesRequired":1}"#),
        ),
        (Method::GET, "/admin/stats/user-roles", Body::empty()),
        (Method::GET, "/admin/students/progress", Body::empty()),
    ];

    for (method, uri, body) in cases {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .header("cookie", cookie.as_str())
            .body(body)
            .expect("request build should succeed");

        let resp = app
            .clone()
            .oneshot(req)
            .await
            .expect("router should respond");

        assert_eq!(
            resp.status(),
            StatusCode::FORBIDDEN,
            "expected FORBIDDEN for {uri}",
        );
    }
}

#[tokio::test]
async fn admin_routes_accept_admins() {
    let db = create_test_db().await;
    let admin = create_admin(&db, "admin@test.com").await;
    let cookie = session_cookie(&db, admin).await;
    let app = app(db);

    let req = Request::builder()
        .method(Method::GET)
        .uri("/admin/stats/user-roles")
        .header("cookie", cookie.as_str())
        .body(Body::empty())
        .expect("request build should succeed");

    let resp = app.oneshot(req).await.expect("router should respond");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn a_stale_session_cookie_is_rejected() {
    let db = create_test_db().await;
    let student = create_student(&db, "stale@test.com").await;
    let cookie = session_cookie(&db, student).await;

    let token = cookie.split('=').nth(1).unwrap().to_string();
    db.delete_user_session(&token).await.unwrap();

    let app = app(db);
    let req = Request::builder()
        .method(Method::GET)
        .uri("/courses")
        .header("cookie", cookie.as_str())
        .body(Body::empty())
        .expect("request build should succeed");

    let resp = app.oneshot(req).await.expect("router should respond");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

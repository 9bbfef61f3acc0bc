mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{AuthHeaders, TestApp};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn post_user(app: &TestApp, auth: &AuthHeaders, payload: Value) -> axum::response::Response {
    app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/users")
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .header("X-CSRF-Token", &auth.csrf_token)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string())).unwrap()
    ).await.unwrap()
}

#[tokio::test]
async fn test_admin_creates_user_without_leaking_hash() {
    let app = TestApp::new().await;
    app.seed_user("Admin", "admin@school.test", "admin-pass", "ADMIN").await;
    let auth = app.login("admin@school.test", "admin-pass").await;

    let res = post_user(&app, &auth, json!({
        "name": "Ana Souza",
        "email": "ana@school.test",
        "password": "secret-pass",
        "role": "TEACHER"
    })).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let body = parse_body(res).await;
    assert_eq!(body["name"], "Ana Souza");
    assert_eq!(body["role"], "TEACHER");
    assert!(body.get("passwordHash").is_none());
    assert!(body.get("password_hash").is_none());

    // The created account can log in.
    app.login("ana@school.test", "secret-pass").await;
}

#[tokio::test]
async fn test_duplicate_email_is_rejected() {
    let app = TestApp::new().await;
    app.seed_user("Admin", "admin@school.test", "admin-pass", "ADMIN").await;
    let auth = app.login("admin@school.test", "admin-pass").await;

    let payload = json!({
        "name": "Ana Souza",
        "email": "ana@school.test",
        "password": "secret-pass",
        "role": "TEACHER"
    });
    let res = post_user(&app, &auth, payload.clone()).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = post_user(&app, &auth, payload).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_user_validation() {
    let app = TestApp::new().await;
    app.seed_user("Admin", "admin@school.test", "admin-pass", "ADMIN").await;
    let auth = app.login("admin@school.test", "admin-pass").await;

    let res = post_user(&app, &auth, json!({
        "name": "Al", "email": "al@school.test", "password": "secret-pass", "role": "TEACHER"
    })).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = post_user(&app, &auth, json!({
        "name": "Ana Souza", "email": "not-an-email", "password": "secret-pass", "role": "TEACHER"
    })).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = post_user(&app, &auth, json!({
        "name": "Ana Souza", "email": "ana@school.test", "password": "short", "role": "TEACHER"
    })).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = post_user(&app, &auth, json!({
        "name": "Ana Souza", "email": "ana@school.test", "password": "secret-pass", "role": "WIZARD"
    })).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_non_admin_cannot_manage_users() {
    let app = TestApp::new().await;
    app.seed_user("Ana", "ana@school.test", "ana-pass", "TEACHER").await;
    let auth = app.login("ana@school.test", "ana-pass").await;

    let res = post_user(&app, &auth, json!({
        "name": "Bruno Lima", "email": "bruno@school.test", "password": "secret-pass", "role": "TEACHER"
    })).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app.router.clone().oneshot(
        Request::builder().method("GET").uri("/api/v1/users")
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_cannot_delete_own_account() {
    let app = TestApp::new().await;
    let admin = app.seed_user("Admin", "admin@school.test", "admin-pass", "ADMIN").await;
    let auth = app.login("admin@school.test", "admin-pass").await;

    let res = app.router.clone().oneshot(
        Request::builder().method("DELETE").uri(format!("/api/v1/users/{}", admin.id))
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .header("X-CSRF-Token", &auth.csrf_token)
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_cannot_demote_own_role() {
    let app = TestApp::new().await;
    let admin = app.seed_user("Admin", "admin@school.test", "admin-pass", "ADMIN").await;
    let auth = app.login("admin@school.test", "admin-pass").await;

    let res = app.router.clone().oneshot(
        Request::builder().method("PATCH").uri(format!("/api/v1/users/{}", admin.id))
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .header("X-CSRF-Token", &auth.csrf_token)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({
                "name": "Admin",
                "email": "admin@school.test",
                "role": "TEACHER"
            }).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Keeping the ADMIN role is allowed.
    let res = app.router.clone().oneshot(
        Request::builder().method("PATCH").uri(format!("/api/v1/users/{}", admin.id))
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .header("X-CSRF-Token", &auth.csrf_token)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({
                "name": "Head Admin",
                "email": "admin@school.test",
                "role": "ADMIN"
            }).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(parse_body(res).await["name"], "Head Admin");
}

#[tokio::test]
async fn test_user_with_bookings_cannot_be_deleted() {
    let app = TestApp::new().await;
    app.seed_user("Admin", "admin@school.test", "admin-pass", "ADMIN").await;
    let ana = app.seed_user("Ana", "ana@school.test", "ana-pass", "TEACHER").await;

    let admin = app.login("admin@school.test", "admin-pass").await;
    let ana_auth = app.login("ana@school.test", "ana-pass").await;

    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/rooms")
            .header(header::COOKIE, format!("access_token={}", admin.access_token))
            .header("X-CSRF-Token", &admin.csrf_token)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({ "name": "Room 101", "capacity": 30, "type": "Classroom" }).to_string())).unwrap()
    ).await.unwrap();
    let room_id = parse_body(res).await["id"].as_str().unwrap().to_string();

    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/bookings")
            .header(header::COOKIE, format!("access_token={}", ana_auth.access_token))
            .header("X-CSRF-Token", &ana_auth.csrf_token)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({
                "title": "Ana's class",
                "roomId": room_id,
                "startTime": "2030-05-10T10:00:00Z",
                "endTime": "2030-05-10T11:00:00Z"
            }).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = app.router.clone().oneshot(
        Request::builder().method("DELETE").uri(format!("/api/v1/users/{}", ana.id))
            .header(header::COOKIE, format!("access_token={}", admin.access_token))
            .header("X-CSRF-Token", &admin.csrf_token)
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_password_reset_to_default() {
    let app = TestApp::new().await;
    app.seed_user("Admin", "admin@school.test", "admin-pass", "ADMIN").await;
    let ana = app.seed_user("Ana", "ana@school.test", "ana-pass", "TEACHER").await;
    let auth = app.login("admin@school.test", "admin-pass").await;

    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri(format!("/api/v1/users/{}/reset-password", ana.id))
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .header("X-CSRF-Token", &auth.csrf_token)
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    app.login("ana@school.test", "123456").await;
}

#[tokio::test]
async fn test_admin_cannot_reset_own_password() {
    let app = TestApp::new().await;
    let admin = app.seed_user("Admin", "admin@school.test", "admin-pass", "ADMIN").await;
    let auth = app.login("admin@school.test", "admin-pass").await;

    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri(format!("/api/v1/users/{}/reset-password", admin.id))
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .header("X-CSRF-Token", &auth.csrf_token)
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

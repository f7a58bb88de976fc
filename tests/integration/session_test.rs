//! Integration tests for the login, logout and session lifecycle.

mod helpers;

use std::sync::Arc;

use axum::http::StatusCode;
use warden_entity::activity::ActivityType;

#[tokio::test]
async fn test_login_conflict_logout_relogin() {
    let app = helpers::TestApp::new().await;
    app.create_user("alice", "STAFF").await;

    let first = app.try_login("alice").await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body["data"]["user"]["email"], "alice@example.com");
    assert!(first.body["data"]["user"].get("passwordHash").is_none());
    let token = first.body["data"]["token"].as_str().unwrap().to_string();

    let replay = app.try_login("alice").await;
    assert_eq!(replay.status, StatusCode::FORBIDDEN);
    assert_eq!(replay.error_code(), "SESSION_CONFLICT");

    let logout = app
        .request("POST", "/api/sessions/logout", None, Some(&token))
        .await;
    assert_eq!(logout.status, StatusCode::OK);
    assert_eq!(logout.body["data"]["sessionsUpdated"], 1);

    let again = app.try_login("alice").await;
    assert_eq!(again.status, StatusCode::OK);
}

#[tokio::test]
async fn test_login_invalid_credentials_is_logged() {
    let app = helpers::TestApp::new().await;
    let user = app.create_user("bob", "STAFF").await;

    let response = app
        .request(
            "POST",
            "/api/sessions/login",
            Some(serde_json::json!({
                "email": "bob@example.com",
                "password": "wrong-password",
            })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "INVALID_CREDENTIALS");

    let unknown = app
        .request(
            "POST",
            "/api/sessions/login",
            Some(serde_json::json!({
                "email": "nobody@example.com",
                "password": "wrong-password",
            })),
            None,
        )
        .await;
    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.body["message"], response.body["message"]);

    let entries = app.stores.activity.recent_for_user(user.id, 10).await.unwrap();
    assert!(
        entries
            .iter()
            .any(|e| e.activity_type == ActivityType::LoginFailed)
    );
}

#[tokio::test]
async fn test_inactive_user_cannot_login() {
    let app = helpers::TestApp::new().await;
    let user = app.create_user("carol", "STAFF").await;
    app.stores.users.set_active(user.id, false).await.unwrap();

    let response = app.try_login("carol").await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error_code(), "ACCOUNT_INACTIVE");
}

#[tokio::test]
async fn test_authentication_reason_codes() {
    let app = helpers::TestApp::new().await;
    app.create_user("dave", "STAFF").await;

    let missing = app
        .request("GET", "/api/sessions/refetch", None, None)
        .await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_eq!(missing.error_code(), "MISSING_TOKEN");

    let garbage = app
        .request("GET", "/api/sessions/refetch", None, Some("not-a-jwt"))
        .await;
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);
    assert_eq!(garbage.error_code(), "INVALID_TOKEN");

    let token = app.login("dave").await;
    let ok = app
        .request("GET", "/api/sessions/refetch", None, Some(&token))
        .await;
    assert_eq!(ok.status, StatusCode::OK);
    assert_eq!(ok.body["data"]["user"]["username"], "dave");
    assert_eq!(ok.body["data"]["role"]["name"], "STAFF");

    app.request("POST", "/api/sessions/logout", None, Some(&token))
        .await;
    let stale = app
        .request("GET", "/api/sessions/refetch", None, Some(&token))
        .await;
    assert_eq!(stale.status, StatusCode::UNAUTHORIZED);
    assert_eq!(stale.error_code(), "SESSION_INVALIDATED");
}

#[tokio::test]
async fn test_admin_terminate_invalidates_target_session() {
    let app = helpers::TestApp::new().await;
    let target = app.create_user("erin", "STAFF").await;
    app.create_user("root", "ADMIN").await;

    let user_token = app.login("erin").await;
    let admin_token = app.login("root").await;

    let response = app
        .request(
            "POST",
            "/api/sessions/terminate",
            Some(serde_json::json!({ "userId": target.id })),
            Some(&admin_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["sessionsTerminated"], 1);

    let after = app
        .request("GET", "/api/sessions/refetch", None, Some(&user_token))
        .await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);
    assert_eq!(after.error_code(), "SESSION_INVALIDATED");

    let admin_still = app
        .request("GET", "/api/sessions/active", None, Some(&admin_token))
        .await;
    assert_eq!(admin_still.status, StatusCode::OK);
}

#[tokio::test]
async fn test_terminate_requires_admin_role() {
    let app = helpers::TestApp::new().await;
    let target = app.create_user("frank", "STAFF").await;
    app.create_user("gina", "STAFF").await;
    let token = app.login("gina").await;

    let response = app
        .request(
            "POST",
            "/api/sessions/terminate",
            Some(serde_json::json!({ "userId": target.id })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error_code(), "FORBIDDEN");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_logins_yield_one_session() {
    let app = Arc::new(helpers::TestApp::new().await);
    app.create_user("henry", "STAFF").await;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let app = Arc::clone(&app);
        handles.push(tokio::spawn(async move { app.try_login("henry").await }));
    }

    let mut succeeded = 0;
    for handle in handles {
        let response = handle.await.unwrap();
        match response.status {
            StatusCode::OK => succeeded += 1,
            StatusCode::FORBIDDEN => assert_eq!(response.error_code(), "SESSION_CONFLICT"),
            other => panic!("unexpected status {other}"),
        }
    }
    assert_eq!(succeeded, 1);
}

#[tokio::test]
async fn test_activity_log_failure_does_not_break_requests() {
    let app = helpers::TestApp::new().await;
    app.create_user("iris", "STAFF").await;
    app.memory.set_fail_activity_writes(true);

    let token = app.login("iris").await;
    let logout = app
        .request("POST", "/api/sessions/logout", None, Some(&token))
        .await;
    assert_eq!(logout.status, StatusCode::OK);

    let failed = app
        .request(
            "POST",
            "/api/sessions/login",
            Some(serde_json::json!({
                "email": "iris@example.com",
                "password": "wrong-password",
            })),
            None,
        )
        .await;
    assert_eq!(failed.status, StatusCode::UNAUTHORIZED);
}

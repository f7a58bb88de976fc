//! Integration tests for administrative CRUD, validation and the activity log.

mod helpers;

use axum::http::StatusCode;

#[tokio::test]
async fn test_health_reports_store() {
    let app = helpers::TestApp::new().await;

    let response = app.request("GET", "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "ok");
    assert_eq!(response.body["data"]["database"], "in-memory");
}

#[tokio::test]
async fn test_create_user_reports_field_errors() {
    let app = helpers::TestApp::new().await;
    app.create_user("root", "ADMIN").await;
    let token = app.login("root").await;

    let response = app
        .request(
            "POST",
            "/api/users",
            Some(serde_json::json!({
                "username": "x",
                "email": "not-an-email",
                "password": helpers::PASSWORD,
                "firstName": "A",
                "lastName": "B",
                "roleId": 1,
            })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.error_code(), "VALIDATION");
    let details = &response.body["details"];
    assert!(details.get("username").is_some());
    assert!(details.get("email").is_some());
    assert!(details.get("firstName").is_none());
}

#[tokio::test]
async fn test_create_user_rejects_weak_password() {
    let app = helpers::TestApp::new().await;
    let admin = app.create_user("root", "ADMIN").await;
    let token = app.login("root").await;

    let response = app
        .request(
            "POST",
            "/api/users",
            Some(serde_json::json!({
                "username": "weakling",
                "email": "weak@example.com",
                "password": "password",
                "firstName": "Weak",
                "lastName": "Ling",
                "roleId": admin.role_id,
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_create_user_then_login() {
    let app = helpers::TestApp::new().await;
    app.create_user("root", "ADMIN").await;
    let staff = app.role("STAFF").await;
    let token = app.login("root").await;

    let created = app
        .request(
            "POST",
            "/api/users",
            Some(serde_json::json!({
                "username": "newhire",
                "email": "NewHire@Example.com",
                "password": helpers::PASSWORD,
                "firstName": "New",
                "lastName": "Hire",
                "roleId": staff.id,
            })),
            Some(&token),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["data"]["email"], "newhire@example.com");
    assert_eq!(created.body["data"]["roleName"], "STAFF");

    let duplicate = app
        .request(
            "POST",
            "/api/users",
            Some(serde_json::json!({
                "username": "newhire",
                "email": "newhire@example.com",
                "password": helpers::PASSWORD,
                "firstName": "New",
                "lastName": "Hire",
                "roleId": staff.id,
            })),
            Some(&token),
        )
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);

    let login = app.try_login("newhire").await;
    assert_eq!(login.status, StatusCode::OK);
}

#[tokio::test]
async fn test_role_lifecycle_and_delete_conflict() {
    let app = helpers::TestApp::new().await;
    app.create_user("root", "ADMIN").await;
    let token = app.login("root").await;

    let created = app
        .request(
            "POST",
            "/api/roles",
            Some(serde_json::json!({ "name": "Auditor", "description": "Read-only review" })),
            Some(&token),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let role_id = created.body["data"]["id"].as_i64().unwrap();

    let duplicate = app
        .request(
            "POST",
            "/api/roles",
            Some(serde_json::json!({ "name": "Auditor" })),
            Some(&token),
        )
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);

    app.create_user("reviewer", "Auditor").await;
    let in_use = app
        .request("DELETE", &format!("/api/roles/{role_id}"), None, Some(&token))
        .await;
    assert_eq!(in_use.status, StatusCode::CONFLICT);

    let empty = app
        .request(
            "POST",
            "/api/roles",
            Some(serde_json::json!({ "name": "Temporary" })),
            Some(&token),
        )
        .await;
    let empty_id = empty.body["data"]["id"].as_i64().unwrap();
    let deleted = app
        .request("DELETE", &format!("/api/roles/{empty_id}"), None, Some(&token))
        .await;
    assert_eq!(deleted.status, StatusCode::OK);

    let gone = app
        .request("GET", &format!("/api/roles/{empty_id}"), None, Some(&token))
        .await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_activity_log_records_logins() {
    let app = helpers::TestApp::new().await;
    let admin = app.create_user("root", "ADMIN").await;
    app.create_user("worker", "STAFF").await;
    let token = app.login("root").await;
    app.login("worker").await;

    let response = app
        .request(
            "GET",
            "/api/activity-logs?activityType=LOGIN_SUCCESS",
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["totalItems"], 2);

    let own = app
        .request(
            "GET",
            &format!("/api/activity-logs?userId={}", admin.id),
            None,
            Some(&token),
        )
        .await;
    let items = own.body["data"]["items"].as_array().unwrap();
    assert!(!items.is_empty());
    assert!(items.iter().all(|e| e["userId"] == admin.id));

    let entry_id = items[0]["id"].as_str().unwrap();
    let single = app
        .request(
            "GET",
            &format!("/api/activity-logs/{entry_id}"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(single.status, StatusCode::OK);

    let bad_type = app
        .request(
            "GET",
            "/api/activity-logs?activityType=NOPE",
            None,
            Some(&token),
        )
        .await;
    assert_eq!(bad_type.status, StatusCode::UNPROCESSABLE_ENTITY);
}

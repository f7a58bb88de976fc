//! Integration tests for role gating, permission gating and deactivation.

mod helpers;

use axum::http::StatusCode;

#[tokio::test]
async fn test_role_gate_rejects_other_roles() {
    let app = helpers::TestApp::new().await;
    app.create_user("staffer", "STAFF").await;
    app.create_user("root", "ADMIN").await;

    let staff_token = app.login("staffer").await;
    let denied = app
        .request("GET", "/api/roles", None, Some(&staff_token))
        .await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);
    assert_eq!(denied.error_code(), "FORBIDDEN");

    let admin_token = app.login("root").await;
    let allowed = app
        .request("GET", "/api/roles", None, Some(&admin_token))
        .await;
    assert_eq!(allowed.status, StatusCode::OK);
}

#[tokio::test]
async fn test_role_names_match_case_insensitively() {
    let app = helpers::TestApp::new().await;
    app.create_user("lower", "admin").await;
    let token = app.login("lower").await;

    let response = app
        .request("GET", "/api/permissions", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_gate_rejects_before_authorization_without_token() {
    let app = helpers::TestApp::new().await;

    let response = app.request("GET", "/api/roles", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "MISSING_TOKEN");
}

#[tokio::test]
async fn test_permission_gate_follows_assignment() {
    let app = helpers::TestApp::new().await;
    let support = app.role("SUPPORT").await;
    app.create_user("helper", "SUPPORT").await;
    app.create_user("root", "ADMIN").await;

    let admin_token = app.login("root").await;
    let helper_token = app.login("helper").await;

    let before = app
        .request("GET", "/api/users", None, Some(&helper_token))
        .await;
    assert_eq!(before.status, StatusCode::FORBIDDEN);

    let created = app
        .request(
            "POST",
            "/api/permissions",
            Some(serde_json::json!({ "name": "User Management" })),
            Some(&admin_token),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let permission_id = created.body["data"]["id"].as_i64().unwrap();

    let assigned = app
        .request(
            "POST",
            &format!("/api/permissions/roles/{}", support.id),
            Some(serde_json::json!({ "permissionId": permission_id })),
            Some(&admin_token),
        )
        .await;
    assert_eq!(assigned.status, StatusCode::OK);
    assert_eq!(assigned.body["data"]["changed"], true);

    let after = app
        .request("GET", "/api/users", None, Some(&helper_token))
        .await;
    assert_eq!(after.status, StatusCode::OK);
    assert_eq!(after.body["data"]["totalItems"], 2);

    let revoked = app
        .request(
            "DELETE",
            &format!("/api/permissions/roles/{}/{permission_id}", support.id),
            None,
            Some(&admin_token),
        )
        .await;
    assert_eq!(revoked.status, StatusCode::OK);

    let again = app
        .request("GET", "/api/users", None, Some(&helper_token))
        .await;
    assert_eq!(again.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_manager_can_edit_but_not_create_users() {
    let app = helpers::TestApp::new().await;
    let target = app.create_user("subject", "STAFF").await;
    let staff = app.role("STAFF").await;
    app.create_user("boss", "MANAGER").await;
    let token = app.login("boss").await;

    let edited = app
        .request(
            "PATCH",
            &format!("/api/users/{}", target.id),
            Some(serde_json::json!({ "firstName": "Renamed" })),
            Some(&token),
        )
        .await;
    assert_eq!(edited.status, StatusCode::OK);
    assert_eq!(edited.body["data"]["firstName"], "Renamed");

    let create = app
        .request(
            "POST",
            "/api/users",
            Some(serde_json::json!({
                "username": "newbie",
                "email": "newbie@example.com",
                "password": helpers::PASSWORD,
                "firstName": "New",
                "lastName": "Bie",
                "roleId": staff.id,
            })),
            Some(&token),
        )
        .await;
    assert_eq!(create.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_deactivation_invalidates_live_session() {
    let app = helpers::TestApp::new().await;
    let target = app.create_user("leaver", "STAFF").await;
    app.create_user("root", "ADMIN").await;

    let user_token = app.login("leaver").await;
    let admin_token = app.login("root").await;

    let toggled = app
        .request(
            "PATCH",
            &format!("/api/users/{}/status", target.id),
            None,
            Some(&admin_token),
        )
        .await;
    assert_eq!(toggled.status, StatusCode::OK);
    assert_eq!(toggled.body["data"]["isActive"], false);

    let stale = app
        .request("GET", "/api/sessions/refetch", None, Some(&user_token))
        .await;
    assert_eq!(stale.status, StatusCode::UNAUTHORIZED);

    let relogin = app.try_login("leaver").await;
    assert_eq!(relogin.status, StatusCode::FORBIDDEN);
    assert_eq!(relogin.error_code(), "ACCOUNT_INACTIVE");
}

#[tokio::test]
async fn test_admin_cannot_deactivate_self() {
    let app = helpers::TestApp::new().await;
    let admin = app.create_user("root", "ADMIN").await;
    let token = app.login("root").await;

    let response = app
        .request(
            "DELETE",
            &format!("/api/users/{}", admin.id),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
}

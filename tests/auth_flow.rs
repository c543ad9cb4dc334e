//! End-to-end authentication flows over in-memory stores.

mod common;

use serde_json::json;

use portico_entity::membership::Role;

use common::spawn_app;

#[tokio::test]
async fn test_login_returns_tokens_and_memberships() {
    let app = spawn_app().await;
    let user = app.create_user("alice@acme.test", "correct horse").await;
    let north = app.add_tenant("Acme North").await;
    let south = app.add_tenant("Acme South").await;
    app.grant(&user, &north, Role::Admin).await;
    app.grant(&user, &south, Role::Viewer).await;

    let res = app.login("alice@acme.test", "correct horse").await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["success"], json!(true));
    assert_eq!(res.data()["user"]["email"], json!("alice@acme.test"));
    assert!(res.data()["token"].as_str().unwrap().contains('.'));
    assert!(!res.data()["refresh_token"].as_str().unwrap().is_empty());

    // First-granted membership is the active tenant, and all
    // memberships are listed in grant order.
    let tenants = res.data()["tenants"].as_array().unwrap();
    assert_eq!(tenants.len(), 2);
    assert_eq!(tenants[0]["name"], json!("Acme North"));
    assert_eq!(tenants[0]["role"], json!("ADMIN"));
    assert_eq!(tenants[1]["name"], json!("Acme South"));

    assert!(res.has_cookie("auth_token"));
    assert!(res.has_cookie("refresh_token"));
}

#[tokio::test]
async fn test_login_failures_are_uniform() {
    let app = spawn_app().await;
    let user = app.create_user("alice@acme.test", "correct horse").await;
    let tenant = app.add_tenant("Acme").await;
    app.grant(&user, &tenant, Role::Viewer).await;

    let wrong_password = app.login("alice@acme.test", "wrong").await;
    let unknown_email = app.login("nobody@acme.test", "whatever").await;

    assert_eq!(wrong_password.status, 401);
    assert_eq!(unknown_email.status, 401);
    assert_eq!(wrong_password.error_code(), "AUTH_001");
    assert_eq!(unknown_email.error_code(), "AUTH_001");
    assert_eq!(wrong_password.body["message"], unknown_email.body["message"]);
}

#[tokio::test]
async fn test_login_with_blank_credentials_is_a_validation_error() {
    let app = spawn_app().await;

    let res = app
        .post("/api/auth/login", None, json!({ "email": "", "password": "" }))
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.error_code(), "VAL_001");
}

#[tokio::test]
async fn test_login_without_memberships_is_rejected() {
    let app = spawn_app().await;
    app.create_user("orphan@acme.test", "correct horse").await;

    let res = app.login("orphan@acme.test", "correct horse").await;

    assert_eq!(res.status, 401);
    assert_eq!(res.error_code(), "AUTH_001");
}

#[tokio::test]
async fn test_me_reflects_the_access_token() {
    let app = spawn_app().await;
    let user = app.create_user("alice@acme.test", "pw123456").await;
    let tenant = app.add_tenant("Acme").await;
    app.grant(&user, &tenant, Role::Admin).await;

    let login = app.login("alice@acme.test", "pw123456").await;
    let token = login.data()["token"].as_str().unwrap().to_string();

    let res = app.get("/api/auth/me", Some(&token)).await;

    assert_eq!(res.status, 200);
    assert_eq!(res.data()["email"], json!("alice@acme.test"));
    assert_eq!(res.data()["tenant_id"], json!(tenant.id.to_string()));
    assert_eq!(res.data()["role"], json!("ADMIN"));
}

#[tokio::test]
async fn test_protected_routes_require_a_valid_token() {
    let app = spawn_app().await;

    let missing = app.get("/api/auth/me", None).await;
    let garbage = app.get("/api/auth/me", Some("not-a-jwt")).await;

    assert_eq!(missing.status, 401);
    assert_eq!(garbage.status, 401);
    assert_eq!(garbage.error_code(), "AUTH_001");
}

#[tokio::test]
async fn test_refresh_rotates_and_spends_the_old_token() {
    let app = spawn_app().await;
    let user = app.create_user("alice@acme.test", "pw123456").await;
    let tenant = app.add_tenant("Acme").await;
    app.grant(&user, &tenant, Role::Viewer).await;

    let login = app.login("alice@acme.test", "pw123456").await;
    let old_refresh = login.data()["refresh_token"].as_str().unwrap().to_string();

    let refreshed = app
        .post("/api/auth/refresh", None, json!({ "refresh_token": old_refresh }))
        .await;
    assert_eq!(refreshed.status, 200);
    let new_refresh = refreshed.data()["refresh_token"].as_str().unwrap();
    assert_ne!(new_refresh, old_refresh);
    assert!(refreshed.has_cookie("auth_token"));
    assert!(refreshed.has_cookie("refresh_token"));

    // The old token is single-use.
    let replay = app
        .post("/api/auth/refresh", None, json!({ "refresh_token": old_refresh }))
        .await;
    assert_eq!(replay.status, 401);
    assert_eq!(replay.error_code(), "AUTH_001");
}

#[tokio::test]
async fn test_refresh_without_a_token_is_rejected() {
    let app = spawn_app().await;

    let res = app.post("/api/auth/refresh", None, json!({})).await;

    assert_eq!(res.status, 401);
    assert_eq!(res.body["message"], json!("Missing refresh token"));
}

#[tokio::test]
async fn test_switch_tenant_rescopes_the_session() {
    let app = spawn_app().await;
    let user = app.create_user("alice@acme.test", "pw123456").await;
    let north = app.add_tenant("Acme North").await;
    let south = app.add_tenant("Acme South").await;
    app.grant(&user, &north, Role::Admin).await;
    app.grant(&user, &south, Role::Viewer).await;

    let login = app.login("alice@acme.test", "pw123456").await;
    let token = login.data()["token"].as_str().unwrap().to_string();

    let switched = app
        .post(
            "/api/auth/switch-tenant",
            Some(&token),
            json!({ "tenant_id": south.id.to_string() }),
        )
        .await;
    assert_eq!(switched.status, 200);
    assert_eq!(switched.data()["tenant_id"], json!(south.id.to_string()));
    assert_eq!(switched.data()["role"], json!("VIEWER"));

    // The new token carries the new tenant scope.
    let new_token = switched.data()["token"].as_str().unwrap().to_string();
    let me = app.get("/api/auth/me", Some(&new_token)).await;
    assert_eq!(me.data()["tenant_id"], json!(south.id.to_string()));
    assert_eq!(me.data()["role"], json!("VIEWER"));
}

#[tokio::test]
async fn test_switch_tenant_without_membership_is_forbidden() {
    let app = spawn_app().await;
    let user = app.create_user("alice@acme.test", "pw123456").await;
    let home = app.add_tenant("Home").await;
    let other = app.add_tenant("Other").await;
    app.grant(&user, &home, Role::Admin).await;

    let login = app.login("alice@acme.test", "pw123456").await;
    let token = login.data()["token"].as_str().unwrap().to_string();

    let res = app
        .post(
            "/api/auth/switch-tenant",
            Some(&token),
            json!({ "tenant_id": other.id.to_string() }),
        )
        .await;

    assert_eq!(res.status, 403);
    assert_eq!(res.error_code(), "AUTH_403");
}

#[tokio::test]
async fn test_switch_tenant_with_malformed_id_is_a_validation_error() {
    let app = spawn_app().await;
    let user = app.create_user("alice@acme.test", "pw123456").await;
    let tenant = app.add_tenant("Acme").await;
    app.grant(&user, &tenant, Role::Admin).await;

    let login = app.login("alice@acme.test", "pw123456").await;
    let token = login.data()["token"].as_str().unwrap().to_string();

    let res = app
        .post(
            "/api/auth/switch-tenant",
            Some(&token),
            json!({ "tenant_id": "not-a-uuid" }),
        )
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.error_code(), "VAL_001");
}

#[tokio::test]
async fn test_logout_revokes_the_refresh_token() {
    let app = spawn_app().await;
    let user = app.create_user("alice@acme.test", "pw123456").await;
    let tenant = app.add_tenant("Acme").await;
    app.grant(&user, &tenant, Role::Viewer).await;

    let login = app.login("alice@acme.test", "pw123456").await;
    let refresh = login.data()["refresh_token"].as_str().unwrap().to_string();

    // Token in the body only: the clearing cookies must still be
    // emitted, with an immediate expiry.
    let logout = app
        .post("/api/auth/logout", None, json!({ "refresh_token": refresh }))
        .await;
    assert_eq!(logout.status, 200);
    assert!(logout.has_cookie("auth_token"));
    assert!(logout.has_cookie("refresh_token"));
    let cleared = logout
        .set_cookies
        .iter()
        .find(|c| c.starts_with("auth_token="))
        .unwrap();
    assert!(cleared.contains("Max-Age=0"));

    let after = app
        .post("/api/auth/refresh", None, json!({ "refresh_token": refresh }))
        .await;
    assert_eq!(after.status, 401);
}

#[tokio::test]
async fn test_logout_is_lenient_about_unknown_tokens() {
    let app = spawn_app().await;

    let res = app
        .post(
            "/api/auth/logout",
            None,
            json!({ "refresh_token": "never-issued" }),
        )
        .await;

    assert_eq!(res.status, 200);
}

#[tokio::test]
async fn test_health_needs_no_auth() {
    let app = spawn_app().await;

    let res = app.get("/api/health", None).await;

    assert_eq!(res.status, 200);
    assert_eq!(res.data()["status"], json!("ok"));
}

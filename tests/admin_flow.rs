//! Tenant administration flows: role guarding and user provisioning.

mod common;

use serde_json::json;

use portico_entity::membership::Role;

use common::spawn_app;

#[tokio::test]
async fn test_admin_lists_tenant_members() {
    let app = spawn_app().await;
    let admin = app.create_user("admin@acme.test", "pw123456").await;
    let viewer = app.create_user("viewer@acme.test", "pw123456").await;
    let tenant = app.add_tenant("Acme").await;
    app.grant(&admin, &tenant, Role::Admin).await;
    app.grant(&viewer, &tenant, Role::Viewer).await;

    let login = app.login("admin@acme.test", "pw123456").await;
    let token = login.data()["token"].as_str().unwrap().to_string();

    let res = app.get("/api/admin/users", Some(&token)).await;

    assert_eq!(res.status, 200);
    let members = res.data().as_array().unwrap();
    assert_eq!(members.len(), 2);
    assert_eq!(members[0]["email"], json!("admin@acme.test"));
    assert_eq!(members[0]["role"], json!("ADMIN"));
    assert_eq!(members[1]["email"], json!("viewer@acme.test"));
    assert_eq!(members[1]["role"], json!("VIEWER"));
}

#[tokio::test]
async fn test_viewer_cannot_use_admin_routes() {
    let app = spawn_app().await;
    let viewer = app.create_user("viewer@acme.test", "pw123456").await;
    let tenant = app.add_tenant("Acme").await;
    app.grant(&viewer, &tenant, Role::Viewer).await;

    let login = app.login("viewer@acme.test", "pw123456").await;
    let token = login.data()["token"].as_str().unwrap().to_string();

    let list = app.get("/api/admin/users", Some(&token)).await;
    let create = app
        .post(
            "/api/admin/users",
            Some(&token),
            json!({ "email": "new@acme.test", "password": "pw123456", "role": "VIEWER" }),
        )
        .await;

    assert_eq!(list.status, 403);
    assert_eq!(list.error_code(), "AUTH_403");
    assert_eq!(create.status, 403);
}

#[tokio::test]
async fn test_admin_provisions_a_user_who_can_log_in() {
    let app = spawn_app().await;
    let admin = app.create_user("admin@acme.test", "pw123456").await;
    let tenant = app.add_tenant("Acme").await;
    app.grant(&admin, &tenant, Role::Admin).await;

    let login = app.login("admin@acme.test", "pw123456").await;
    let token = login.data()["token"].as_str().unwrap().to_string();

    let created = app
        .post(
            "/api/admin/users",
            Some(&token),
            json!({ "email": "bob@acme.test", "password": "bob-password", "role": "VIEWER" }),
        )
        .await;
    assert_eq!(created.status, 200);
    assert_eq!(created.data()["email"], json!("bob@acme.test"));

    // The new user is a member of the admin's tenant.
    let bob = app.login("bob@acme.test", "bob-password").await;
    assert_eq!(bob.status, 200);
    let tenants = bob.data()["tenants"].as_array().unwrap();
    assert_eq!(tenants.len(), 1);
    assert_eq!(tenants[0]["tenant_id"], json!(tenant.id.to_string()));
    assert_eq!(tenants[0]["role"], json!("VIEWER"));
}

#[tokio::test]
async fn test_create_user_rejects_weak_input() {
    let app = spawn_app().await;
    let admin = app.create_user("admin@acme.test", "pw123456").await;
    let tenant = app.add_tenant("Acme").await;
    app.grant(&admin, &tenant, Role::Admin).await;

    let login = app.login("admin@acme.test", "pw123456").await;
    let token = login.data()["token"].as_str().unwrap().to_string();

    let bad_email = app
        .post(
            "/api/admin/users",
            Some(&token),
            json!({ "email": "not-an-email", "password": "long-enough", "role": "VIEWER" }),
        )
        .await;
    let short_password = app
        .post(
            "/api/admin/users",
            Some(&token),
            json!({ "email": "ok@acme.test", "password": "short", "role": "VIEWER" }),
        )
        .await;
    let bad_role = app
        .post(
            "/api/admin/users",
            Some(&token),
            json!({ "email": "ok@acme.test", "password": "long-enough", "role": "OWNER" }),
        )
        .await;

    assert_eq!(bad_email.status, 400);
    assert_eq!(short_password.status, 400);
    assert_eq!(bad_role.status, 400);
    assert_eq!(bad_role.error_code(), "VAL_001");
}

#[tokio::test]
async fn test_create_user_with_duplicate_email_conflicts() {
    let app = spawn_app().await;
    let admin = app.create_user("admin@acme.test", "pw123456").await;
    let tenant = app.add_tenant("Acme").await;
    app.grant(&admin, &tenant, Role::Admin).await;

    let login = app.login("admin@acme.test", "pw123456").await;
    let token = login.data()["token"].as_str().unwrap().to_string();

    let res = app
        .post(
            "/api/admin/users",
            Some(&token),
            json!({ "email": "admin@acme.test", "password": "long-enough", "role": "VIEWER" }),
        )
        .await;

    assert_eq!(res.status, 409);
    assert_eq!(res.error_code(), "CONFLICT");
}

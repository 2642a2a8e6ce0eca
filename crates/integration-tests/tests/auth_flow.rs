//! Sign-in, sign-out and request plumbing.

use freshwash_integration_tests::{PASSWORD, TestApp, location};
use reqwest::StatusCode;

#[tokio::test]
async fn test_login_lands_on_role_home() {
    let app = TestApp::spawn().await;

    for (email, home) in [
        ("admin@freshwash.id", "/admin/dashboard"),
        ("driver@freshwash.id", "/employee/orders"),
        ("customer@freshwash.id", "/user/orders"),
    ] {
        let client = app.client();
        let response = app
            .post_form(&client, "/login", &[("email", email), ("password", PASSWORD)])
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{email}");
        assert_eq!(location(&response), home, "{email}");
    }
}

#[tokio::test]
async fn test_failed_login_shows_server_message() {
    let app = TestApp::spawn().await;
    let client = app.client();

    let response = app
        .post_form(
            &client,
            "/login",
            &[("email", "customer@freshwash.id"), ("password", "wrong")],
        )
        .await;
    let target = location(&response);
    assert!(target.starts_with("/login"), "redirected to {target}");

    let page = app.get(&client, &target).await;
    let body = page.text().await.expect("Failed to read response");
    assert!(body.contains("Invalid email or password"));
    assert!(body.contains("toast-error"));
    assert!(body.contains("customer@freshwash.id"), "email is kept in the form");
}

#[tokio::test]
async fn test_logout_ends_session() {
    let app = TestApp::spawn().await;
    let customer = app.signed_in("customer@freshwash.id").await;

    let response = app.post_form(&customer, "/logout", &[]).await;
    assert_eq!(location(&response), "/login");
    assert_eq!(app.api.hits("POST /api/auth/logout"), 1);

    let response = app.get(&customer, "/user/orders").await;
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_signed_in_user_skips_login_page() {
    let app = TestApp::spawn().await;
    let admin = app.signed_in("admin@freshwash.id").await;

    let response = app.get(&admin, "/login").await;
    assert_eq!(location(&response), "/admin/dashboard");

    let response = app.get(&admin, "/").await;
    assert_eq!(location(&response), "/admin/dashboard");
}

#[tokio::test]
async fn test_request_id_echoed_or_minted() {
    let app = TestApp::spawn().await;
    let client = app.client();

    let response = client
        .get(app.url("/health"))
        .header("x-request-id", "trace-abc.123")
        .send()
        .await
        .expect("GET request failed");
    assert_eq!(response.headers()["x-request-id"], "trace-abc.123");

    let response = client
        .get(app.url("/health"))
        .header("x-request-id", "not valid!")
        .send()
        .await
        .expect("GET request failed");
    let minted = response.headers()["x-request-id"]
        .to_str()
        .expect("header is ascii");
    assert_ne!(minted, "not valid!");
    assert_eq!(minted.len(), 36);
}

#[tokio::test]
async fn test_readiness_reports_reachable_api() {
    let app = TestApp::spawn().await;
    let response = app.get(&app.client(), "/health/ready").await;
    assert_eq!(response.status(), StatusCode::OK);
}

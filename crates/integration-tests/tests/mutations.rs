//! Mutations: toasts, invalidation and refetching.

use freshwash_integration_tests::{TestApp, location};
use freshwash_portal::api::GENERIC_ERROR_MESSAGE;
use reqwest::StatusCode;

#[tokio::test]
async fn test_address_delete_toasts_and_refetches_profile() {
    let app = TestApp::spawn().await;
    let customer = app.signed_in("customer@freshwash.id").await;

    let body = app
        .get(&customer, "/user/addresses")
        .await
        .text()
        .await
        .expect("Failed to read response");
    assert!(body.contains("Office"));
    assert_eq!(app.api.hits("GET /api/users/5"), 1);

    let response = app.post_form(&customer, "/user/addresses/5/delete", &[]).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/user/addresses");
    assert_eq!(app.api.hits("DELETE /api/addresses/5"), 1);

    let body = app
        .get(&customer, "/user/addresses")
        .await
        .text()
        .await
        .expect("Failed to read response");
    assert!(body.contains("Address deleted."));
    assert!(body.contains("toast-success"));
    assert!(!body.contains("Office"));
    assert_eq!(app.api.hits("GET /api/users/5"), 2);
}

#[tokio::test]
async fn test_toast_shown_once() {
    let app = TestApp::spawn().await;
    let customer = app.signed_in("customer@freshwash.id").await;

    app.post_form(&customer, "/user/addresses/5/delete", &[]).await;
    let first = app.get(&customer, "/user/addresses").await.text().await.expect("body");
    let second = app.get(&customer, "/user/addresses").await.text().await.expect("body");
    assert!(first.contains("Address deleted."));
    assert!(!second.contains("Address deleted."));
}

#[tokio::test]
async fn test_mutation_error_uses_server_message() {
    let app = TestApp::spawn().await;
    let customer = app.signed_in("customer@freshwash.id").await;

    app.post_form(&customer, "/user/addresses/99/delete", &[]).await;
    let body = app.get(&customer, "/user/addresses").await.text().await.expect("body");
    assert!(body.contains("Address not found"));
    assert!(body.contains("toast-error"));
}

#[tokio::test]
async fn test_mutation_error_conflict_message() {
    let app = TestApp::spawn().await;
    let admin = app.signed_in("admin@freshwash.id").await;

    let response = app.post_form(&admin, "/admin/items", &[("name", "Duplicate")]).await;
    assert_eq!(location(&response), "/admin/items");

    let body = app.get(&admin, "/admin/items").await.text().await.expect("body");
    assert!(body.contains("Item name already exists"));
}

#[tokio::test]
async fn test_server_failure_without_message_gets_generic_text() {
    let app = TestApp::spawn().await;
    let admin = app.signed_in("admin@freshwash.id").await;

    app.post_form(&admin, "/admin/items", &[("name", "Boom")]).await;
    let body = app.get(&admin, "/admin/items").await.text().await.expect("body");
    assert!(body.contains(GENERIC_ERROR_MESSAGE));
    assert!(body.contains("toast-error"));
}

#[tokio::test]
async fn test_server_failure_message_is_shown() {
    let app = TestApp::spawn().await;
    let admin = app.signed_in("admin@freshwash.id").await;

    let response = app.post_form(&admin, "/admin/items", &[("name", "Laundry")]).await;
    assert_eq!(location(&response), "/admin/items");

    let body = app.get(&admin, "/admin/items").await.text().await.expect("body");
    assert!(body.contains("Outlet is closed for maintenance"));
    assert!(!body.contains(GENERIC_ERROR_MESSAGE));
}

#[tokio::test]
async fn test_create_item_invalidates_list() {
    let app = TestApp::spawn().await;
    let admin = app.signed_in("admin@freshwash.id").await;

    app.get(&admin, "/admin/items").await;
    app.get(&admin, "/admin/items").await;
    assert_eq!(app.api.hits("GET /api/items"), 1, "second read served from cache");

    app.post_form(&admin, "/admin/items", &[("name", "Towel")]).await;
    let body = app.get(&admin, "/admin/items").await.text().await.expect("body");
    assert!(body.contains("Item created."));
    assert!(body.contains("Towel"));
    assert_eq!(app.api.hits("GET /api/items"), 2);
}

#[tokio::test]
async fn test_blank_item_name_never_reaches_api() {
    let app = TestApp::spawn().await;
    let admin = app.signed_in("admin@freshwash.id").await;

    app.post_form(&admin, "/admin/items", &[("name", "   ")]).await;
    let body = app.get(&admin, "/admin/items").await.text().await.expect("body");
    assert!(body.contains("Item name is required."));
    assert_eq!(app.api.hits("POST /api/items"), 0);
}

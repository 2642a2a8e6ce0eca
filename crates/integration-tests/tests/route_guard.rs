//! Route guard behaviour through the real router.
//!
//! A redirected request must never reach a handler, so these tests also
//! check that the mock API saw no data traffic.

use freshwash_integration_tests::{TestApp, location};
use reqwest::StatusCode;

#[tokio::test]
async fn test_admin_sees_item_catalogue() {
    let app = TestApp::spawn().await;
    let admin = app.signed_in("admin@freshwash.id").await;

    let response = app.get(&admin, "/admin/items").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.expect("Failed to read response");
    assert!(body.contains("Shirt"));
    assert!(body.contains("Bed sheet"));
    assert_eq!(app.api.hits("GET /api/items"), 1);
}

#[tokio::test]
async fn test_outlet_admin_redirected_from_admin_only_page() {
    let app = TestApp::spawn().await;
    let outlet_admin = app.signed_in("outlet@freshwash.id").await;

    let response = app.get(&outlet_admin, "/admin/items").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    assert_eq!(app.api.hits("GET /api/items"), 0);
}

#[tokio::test]
async fn test_anonymous_visitor_sent_to_login() {
    let app = TestApp::spawn().await;
    let visitor = app.client();

    for path in ["/admin/items", "/admin/dashboard", "/employee/orders", "/user/orders/abc"] {
        let response = app.get(&visitor, path).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{path}");
        assert_eq!(location(&response), "/login", "{path}");
    }
    assert_eq!(app.api.total_hits(), 0);
}

#[tokio::test]
async fn test_worker_redirected_from_driver_page() {
    let app = TestApp::spawn().await;
    let worker = app.signed_in("worker@freshwash.id").await;

    let response = app.get(&worker, "/employee/orders/delivery").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/employee/orders");
}

#[tokio::test]
async fn test_customer_redirected_from_staff_area() {
    let app = TestApp::spawn().await;
    let customer = app.signed_in("customer@freshwash.id").await;

    let response = app.get(&customer, "/admin/orders").await;
    assert_eq!(location(&response), "/");

    let response = app.get(&customer, "/user/orders").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_public_pages_need_no_session() {
    let app = TestApp::spawn().await;
    let visitor = app.client();

    for path in ["/login", "/health", "/static/portal.css"] {
        let response = app.get(&visitor, path).await;
        assert_eq!(response.status(), StatusCode::OK, "{path}");
    }
}

//! Request deduplication across concurrent page loads and users.

use freshwash_integration_tests::TestApp;
use reqwest::StatusCode;

#[tokio::test]
async fn test_concurrent_identical_queries_share_one_fetch() {
    let app = TestApp::spawn().await;
    let admin = app.signed_in("admin@freshwash.id").await;

    let (a, b) = tokio::join!(app.get(&admin, "/admin/items"), app.get(&admin, "/admin/items"));
    assert_eq!(a.status(), StatusCode::OK);
    assert_eq!(b.status(), StatusCode::OK);
    assert_eq!(app.api.hits("GET /api/items"), 1);
}

#[tokio::test]
async fn test_different_filters_fetch_separately() {
    let app = TestApp::spawn().await;
    let admin = app.signed_in("admin@freshwash.id").await;

    app.get(&admin, "/admin/items").await;
    app.get(&admin, "/admin/items?search=shirt").await;
    app.get(&admin, "/admin/items?search=").await;
    assert_eq!(
        app.api.hits("GET /api/items"),
        2,
        "a blank search is the same query as no search"
    );
}

#[tokio::test]
async fn test_cache_partition_follows_account() {
    let app = TestApp::spawn().await;
    let first = app.signed_in("admin@freshwash.id").await;
    let second = app.signed_in("admin@freshwash.id").await;

    app.get(&first, "/admin/items").await;
    app.get(&second, "/admin/items").await;
    assert_eq!(
        app.api.hits("GET /api/items"),
        1,
        "the same account shares one cache partition"
    );

    let customer = app.signed_in("customer@freshwash.id").await;
    app.get(&customer, "/user/profile").await;
    app.get(&customer, "/user/addresses").await;
    assert_eq!(
        app.api.hits("GET /api/users/5"),
        1,
        "profile and address book read the same query"
    );
}

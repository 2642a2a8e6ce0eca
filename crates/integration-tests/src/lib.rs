//! Test harness for the FreshWash portal.
//!
//! [`TestApp::spawn`] starts two servers on ephemeral ports:
//!
//! - a mock laundry REST API that records every request it receives, and
//! - the real portal router pointed at that mock.
//!
//! Tests talk to the portal through a cookie-keeping [`reqwest::Client`]
//! that does not follow redirects, so guard and PRG redirects can be
//! asserted directly.
//!
//! # Seeded accounts
//!
//! Every account's password is [`PASSWORD`].
//!
//! | Email                      | Role           | ID |
//! |----------------------------|----------------|----|
//! | `admin@freshwash.id`       | `ADMIN`        | 1  |
//! | `outlet@freshwash.id`      | `OUTLET_ADMIN` | 2  |
//! | `worker@freshwash.id`      | `WORKER`       | 3  |
//! | `driver@freshwash.id`      | `DRIVER`       | 4  |
//! | `customer@freshwash.id`    | `CUSTOMER`     | 5  |

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, Request, State},
    http::{HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use reqwest::header::LOCATION;
use serde::Deserialize;
use serde_json::{Value, json};

use freshwash_portal::{
    app,
    config::{ApiConfig, PortalConfig},
    state::AppState,
};

/// Password of every seeded account.
pub const PASSWORD: &str = "secret";

/// Delay of list endpoints, wide enough for concurrent requests to overlap.
const LIST_LATENCY: Duration = Duration::from_millis(100);

// ============================================================================
// Mock laundry API
// ============================================================================

#[derive(Default)]
struct MockData {
    hits: HashMap<String, usize>,
    items: Vec<Value>,
    addresses: Vec<Value>,
    next_item_id: u64,
}

/// Handle on the mock API's recorded traffic.
#[derive(Clone)]
pub struct MockApi {
    data: Arc<Mutex<MockData>>,
}

impl MockApi {
    fn seeded() -> Self {
        let data = MockData {
            hits: HashMap::new(),
            items: vec![
                json!({ "id": 1, "name": "Shirt" }),
                json!({ "id": 2, "name": "Bed sheet" }),
            ],
            addresses: vec![
                json!({
                    "id": 1,
                    "addressName": "Home",
                    "addressLine": "Jl. Melati 5",
                    "city": "Bandung",
                    "isPrimary": true
                }),
                json!({
                    "id": 5,
                    "addressName": "Office",
                    "addressLine": "Jl. Asia Afrika 8",
                    "city": "Bandung",
                    "isPrimary": false
                }),
            ],
            next_item_id: 3,
        };
        Self {
            data: Arc::new(Mutex::new(data)),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockData> {
        self.data.lock().expect("mock API state poisoned")
    }

    /// How many times `"{METHOD} {path}"` was requested, e.g.
    /// `"GET /api/users/5"`.
    #[must_use]
    pub fn hits(&self, route: &str) -> usize {
        self.lock().hits.get(route).copied().unwrap_or(0)
    }

    /// Total requests received on any route.
    #[must_use]
    pub fn total_hits(&self) -> usize {
        self.lock().hits.values().sum()
    }

    fn router(&self) -> Router {
        let api = Router::new()
            .route("/auth/login", post(login))
            .route("/auth/logout", post(|| async { Json(json!({})) }))
            .route("/items", get(list_items).post(create_item))
            .route("/users/{id}", get(profile))
            .route("/addresses/{id}", delete(delete_address))
            .route("/orders/user", get(|| async { Json(empty_page()) }))
            .with_state(self.clone());

        Router::new()
            .nest("/api", api)
            .layer(middleware::from_fn_with_state(self.clone(), record_hit))
    }
}

async fn record_hit(State(api): State<MockApi>, request: Request, next: Next) -> Response {
    let route = format!("{} {}", request.method(), request.uri().path());
    *api.lock().hits.entry(route).or_default() += 1;
    next.run(request).await
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

fn empty_page() -> Value {
    json!({ "data": [], "meta": { "page": 1, "take": 10, "total": 0 } })
}

#[derive(Deserialize)]
struct LoginBody {
    email: String,
    password: String,
}

async fn login(Json(body): Json<LoginBody>) -> Response {
    let account = match body.email.as_str() {
        "admin@freshwash.id" => (1, "ADMIN", None),
        "outlet@freshwash.id" => (2, "OUTLET_ADMIN", Some(10)),
        "worker@freshwash.id" => (3, "WORKER", Some(10)),
        "driver@freshwash.id" => (4, "DRIVER", Some(10)),
        "customer@freshwash.id" => (5, "CUSTOMER", None),
        _ => return error(StatusCode::UNAUTHORIZED, "Invalid email or password"),
    };
    if body.password != PASSWORD {
        return error(StatusCode::UNAUTHORIZED, "Invalid email or password");
    }

    let (id, role, outlet_id) = account;
    Json(json!({
        "data": {
            "user": {
                "id": id,
                "email": body.email,
                "fullname": format!("Test {role}"),
                "role": role,
                "outletId": outlet_id
            },
            "accessToken": format!("token-{id}")
        }
    }))
    .into_response()
}

async fn list_items(State(api): State<MockApi>) -> Json<Value> {
    tokio::time::sleep(LIST_LATENCY).await;
    let items = api.lock().items.clone();
    let total = items.len();
    Json(json!({ "data": items, "meta": { "page": 1, "take": 10, "total": total } }))
}

#[derive(Deserialize)]
struct ItemBody {
    name: String,
}

async fn create_item(State(api): State<MockApi>, Json(body): Json<ItemBody>) -> Response {
    match body.name.as_str() {
        "Duplicate" => error(StatusCode::CONFLICT, "Item name already exists"),
        "Boom" => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        "Laundry" => error(
            StatusCode::SERVICE_UNAVAILABLE,
            "Outlet is closed for maintenance",
        ),
        name => {
            let mut data = api.lock();
            let item = json!({ "id": data.next_item_id, "name": name });
            data.next_item_id += 1;
            data.items.push(item.clone());
            (StatusCode::CREATED, Json(json!({ "data": item }))).into_response()
        }
    }
}

async fn profile(State(api): State<MockApi>, Path(id): Path<u64>, headers: HeaderMap) -> Response {
    let expected = format!("Bearer token-{id}");
    let authorized = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == expected);
    if !authorized {
        return error(StatusCode::UNAUTHORIZED, "Unauthorized");
    }

    let addresses = api.lock().addresses.clone();
    Json(json!({
        "data": {
            "id": id,
            "email": "customer@freshwash.id",
            "fullname": "Test CUSTOMER",
            "phoneNumber": null,
            "isVerified": true,
            "addresses": addresses
        }
    }))
    .into_response()
}

async fn delete_address(State(api): State<MockApi>, Path(id): Path<u64>) -> Response {
    let mut data = api.lock();
    let before = data.addresses.len();
    data.addresses.retain(|address| address["id"] != json!(id));
    if data.addresses.len() == before {
        return error(StatusCode::NOT_FOUND, "Address not found");
    }
    Json(json!({ "message": "Address deleted" })).into_response()
}

// ============================================================================
// Portal under test
// ============================================================================

/// A running portal wired to a running mock API.
pub struct TestApp {
    pub base_url: String,
    pub api: MockApi,
}

impl TestApp {
    /// Start the mock API and the portal.
    ///
    /// # Panics
    ///
    /// Panics if either server cannot bind or the portal cannot be built.
    pub async fn spawn() -> Self {
        let api = MockApi::seeded();
        let api_addr = serve(api.router()).await;

        let api_config = ApiConfig::new(&format!("http://{api_addr}/api"))
            .expect("mock API URL is valid");
        let state = AppState::new(PortalConfig::local(api_config))
            .expect("portal state builds");
        let portal_addr = serve(app(state)).await;

        Self {
            base_url: format!("http://{portal_addr}"),
            api,
        }
    }

    /// A fresh visitor: own cookie jar, redirects not followed.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    #[must_use]
    pub fn client(&self) -> reqwest::Client {
        reqwest::Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client")
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// A client signed in as `email`.
    ///
    /// # Panics
    ///
    /// Panics if the login does not redirect away from `/login`.
    pub async fn signed_in(&self, email: &str) -> reqwest::Client {
        let client = self.client();
        let response = client
            .post(self.url("/login"))
            .form(&[("email", email), ("password", PASSWORD)])
            .send()
            .await
            .expect("login request failed");
        let target = location(&response);
        assert!(
            !target.starts_with("/login"),
            "login as {email} bounced back to {target}"
        );
        client
    }

    /// GET `path` and return the response.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn get(&self, client: &reqwest::Client, path: &str) -> reqwest::Response {
        client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request failed")
    }

    /// POST a form to `path` and return the response.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn post_form(
        &self,
        client: &reqwest::Client,
        path: &str,
        form: &[(&str, &str)],
    ) -> reqwest::Response {
        client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST request failed")
    }
}

/// `Location` header of a redirect response, or an empty string.
#[must_use]
pub fn location(response: &reqwest::Response) -> String {
    response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to address");
    let addr = listener.local_addr().expect("listener has an address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });
    addr
}

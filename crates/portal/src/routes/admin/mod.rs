//! Admin and outlet-admin pages.

pub mod attendance;
pub mod bypass;
pub mod dashboard;
pub mod items;
pub mod orders;
pub mod outlets;
pub mod reports;
pub mod users;

use axum::{
    Router,
    routing::{get, post},
};

use crate::api::types::Outlet;
use crate::query::QueryState;
use crate::state::AppState;
use crate::views::Field;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard::show))
        .route("/items", get(items::index).post(items::create))
        .route("/items/{id}/delete", post(items::delete))
        .route("/outlets", get(outlets::index).post(outlets::create))
        .route("/users", get(users::index).post(users::create))
        .route("/users/{id}/delete", post(users::delete))
        .route("/orders", get(orders::index))
        .route("/orders/{uuid}", get(orders::detail))
        .route("/orders/{uuid}/process", post(orders::process))
        .route("/reports/sales", get(reports::sales))
        .route("/attendance", get(attendance::index))
        .route("/bypass-requests", get(bypass::index))
        .route("/bypass-requests/{id}/approve", post(bypass::approve))
        .route("/bypass-requests/{id}/reject", post(bypass::reject))
}

/// Outlet filter select, present only when the outlet list was loaded
/// (ADMIN). Outlet admins are pinned to their outlet by the data hooks.
pub(crate) fn outlet_field(
    outlets: &QueryState<Vec<Outlet>>,
    label: &'static str,
    any: &str,
    current: Option<impl ToString>,
) -> Option<Field> {
    outlets.data().map(|outlets| {
        let choices = std::iter::once((String::new(), any.to_string()))
            .chain(outlets.iter().map(|o| (o.id.to_string(), o.name.clone())));
        Field::select("outletId", label, choices)
            .value(current.map(|c| c.to_string()).unwrap_or_default())
    })
}

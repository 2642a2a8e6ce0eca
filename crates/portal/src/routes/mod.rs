//! HTTP route handlers for the portal.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                                   - Landing (signed-in users go to their home)
//! GET  /health                             - Liveness
//! GET  /health/ready                       - API reachability
//! GET  /login, POST /login                 - Sign in
//! POST /logout                             - Sign out
//!
//! # Admin (ADMIN, OUTLET_ADMIN)
//! GET  /admin/dashboard
//! GET  /admin/items, POST /admin/items, POST /admin/items/{id}/delete
//! GET  /admin/outlets, POST /admin/outlets
//! GET  /admin/users, POST /admin/users, POST /admin/users/{id}/delete
//! GET  /admin/orders, GET /admin/orders/{uuid}, POST /admin/orders/{uuid}/process
//! GET  /admin/reports/sales
//! GET  /admin/attendance
//! GET  /admin/bypass-requests
//! POST /admin/bypass-requests/{id}/approve, POST /admin/bypass-requests/{id}/reject
//!
//! # Employee (WORKER, DRIVER)
//! GET  /employee/orders
//! GET  /employee/orders/station, POST /employee/orders/station/{uuid}/complete
//! GET  /employee/orders/pickup, POST /employee/orders/pickup/{id}/{take,complete}
//! GET  /employee/orders/delivery, POST /employee/orders/delivery/{id}/{take,complete}
//! GET  /employee/attendance, POST /employee/attendance/{check-in,check-out}
//! GET  /employee/bypass-requests, POST /employee/bypass-requests
//!
//! # Customer
//! GET  /user/profile, POST /user/profile
//! GET  /user/addresses, POST /user/addresses
//! POST /user/addresses/{id}/primary, POST /user/addresses/{id}/delete
//! GET  /user/orders, GET /user/orders/{uuid}, POST /user/orders/{uuid}/confirm
//! ```
//!
//! Role checks are not done here: the route guard middleware has already
//! redirected anyone who may not see a page.

pub mod admin;
pub mod auth;
pub mod employee;
pub mod health;
pub mod home;
pub mod user;

mod forms;

use axum::{
    Router,
    routing::{get, post},
};

use crate::api::types::Order;
use crate::state::AppState;
use crate::views::{self, Cell, Row, Table};

/// All portal routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::index))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
        .nest("/admin", admin::routes())
        .nest("/employee", employee::routes())
        .nest("/user", user::routes())
}

/// Order list shared by admin and customer pages.
pub(crate) fn order_table(orders: &[Order], detail_base: &str, show_outlet: bool) -> Table {
    let columns: &[&str] = if show_outlet {
        &["Order", "Customer", "Outlet", "Status", "Weight", "Total", "Paid", "Created"]
    } else {
        &["Order", "Status", "Weight", "Total", "Paid", "Created"]
    };

    orders
        .iter()
        .fold(Table::new(columns).empty("No orders found."), |table, order| {
            let mut cells = vec![Cell::link(
                order.order_number.clone(),
                format!("{detail_base}/{}", order.uuid),
            )];
            if show_outlet {
                cells.push(views::or_dash(order.customer_name.as_deref()).into());
                cells.push(views::or_dash(order.outlet_name.as_deref()).into());
            }
            cells.extend([
                Cell::text(order.status.label()),
                views::weight(order.total_weight).into(),
                views::money(order.total_price).into(),
                Cell::text(if order.is_paid { "Yes" } else { "No" }),
                views::timestamp(&order.created_at).into(),
            ]);
            table.row(Row::new(cells))
        })
}

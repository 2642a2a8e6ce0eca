//! Customer pages.

pub mod addresses;
pub mod orders;
pub mod profile;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(profile::show).post(profile::update))
        .route("/addresses", get(addresses::index).post(addresses::create))
        .route("/addresses/{id}/primary", post(addresses::set_primary))
        .route("/addresses/{id}/delete", post(addresses::delete))
        .route("/orders", get(orders::index))
        .route("/orders/{uuid}", get(orders::detail))
        .route("/orders/{uuid}/confirm", post(orders::confirm))
}

//! Worker and driver pages.

pub mod attendance;
pub mod bypass;
pub mod driver;
pub mod hub;
pub mod station;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(hub::index))
        .route("/orders/station", get(station::index))
        .route("/orders/station/{uuid}/complete", post(station::complete))
        .route("/orders/pickup", get(driver::pickups))
        .route("/orders/pickup/{id}/take", post(driver::take_pickup))
        .route("/orders/pickup/{id}/complete", post(driver::complete_pickup))
        .route("/orders/delivery", get(driver::deliveries))
        .route("/orders/delivery/{id}/take", post(driver::take_delivery))
        .route("/orders/delivery/{id}/complete", post(driver::complete_delivery))
        .route("/attendance", get(attendance::index))
        .route("/attendance/check-in", post(attendance::check_in))
        .route("/attendance/check-out", post(attendance::check_out))
        .route("/bypass-requests", get(bypass::index).post(bypass::create))
}

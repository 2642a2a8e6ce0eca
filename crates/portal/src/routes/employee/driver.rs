//! Driver pickup and delivery jobs.

use axum::{
    extract::{Path, Query},
    response::Redirect,
};
use tracing::instrument;

use freshwash_core::{DeliveryId, JobStatus, PickupId};

use crate::api::types::DriverJob;
use crate::resources::{DataContext, driver, driver::JobFilter};
use crate::views::{
    Action, Field, FormView, PageTemplate, Pager, Row, Section, Table, choices, wire_name,
};

const PICKUP_PATH: &str = "/employee/orders/pickup";
const DELIVERY_PATH: &str = "/employee/orders/delivery";

fn status_form(path: &str, current: Option<JobStatus>) -> FormView {
    FormView::get(path, "Filter").field(
        Field::select(
            "status",
            "Status",
            choices("Any", [JobStatus::Available, JobStatus::Taken, JobStatus::Completed]),
        )
        .value(current.as_ref().map(wire_name).unwrap_or_default()),
    )
}

/// Job rows with the next action for each job.
fn job_table<I: std::fmt::Display>(jobs: &[DriverJob<I>], path: &str) -> Table {
    jobs.iter().fold(
        Table::new(&["Order", "Customer", "Address", "Distance", "Status"]).empty("No jobs."),
        |table, job| {
            let distance = job
                .distance_km
                .map_or_else(|| "-".to_string(), |d| format!("{} km", d.round_dp(1)));
            let row = Row::new([
                job.order_number.clone(),
                job.customer_name.clone(),
                job.address.clone(),
                distance,
                job.status.to_string(),
            ]);
            let row = match job.status {
                JobStatus::Available => {
                    row.action(Action::post("Take", format!("{path}/{}/take", job.id)))
                }
                JobStatus::Taken => {
                    row.action(Action::post("Complete", format!("{path}/{}/complete", job.id)))
                }
                JobStatus::Completed => row,
            };
            table.row(row)
        },
    )
}

#[instrument(skip(ctx))]
pub async fn pickups(ctx: DataContext, Query(filter): Query<JobFilter>) -> PageTemplate {
    let jobs = driver::pickups(&ctx, &filter).await;
    let listing = Section::new("")
        .form(status_form(PICKUP_PATH, filter.status))
        .load(&jobs, "", |section, page| {
            section
                .table(job_table(&page.data, PICKUP_PATH))
                .pager(Pager::new(PICKUP_PATH, &filter, &page.meta))
        });
    PageTemplate::new(&ctx, "Pickup jobs").await.section(listing)
}

#[instrument(skip(ctx))]
pub async fn deliveries(ctx: DataContext, Query(filter): Query<JobFilter>) -> PageTemplate {
    let jobs = driver::deliveries(&ctx, &filter).await;
    let listing = Section::new("")
        .form(status_form(DELIVERY_PATH, filter.status))
        .load(&jobs, "", |section, page| {
            section
                .table(job_table(&page.data, DELIVERY_PATH))
                .pager(Pager::new(DELIVERY_PATH, &filter, &page.meta))
        });
    PageTemplate::new(&ctx, "Delivery jobs").await.section(listing)
}

#[instrument(skip(ctx))]
pub async fn take_pickup(ctx: DataContext, Path(id): Path<PickupId>) -> Redirect {
    driver::take_pickup(&ctx, id).await;
    Redirect::to(PICKUP_PATH)
}

#[instrument(skip(ctx))]
pub async fn complete_pickup(ctx: DataContext, Path(id): Path<PickupId>) -> Redirect {
    driver::complete_pickup(&ctx, id).await;
    Redirect::to(PICKUP_PATH)
}

#[instrument(skip(ctx))]
pub async fn take_delivery(ctx: DataContext, Path(id): Path<DeliveryId>) -> Redirect {
    driver::take_delivery(&ctx, id).await;
    Redirect::to(DELIVERY_PATH)
}

#[instrument(skip(ctx))]
pub async fn complete_delivery(ctx: DataContext, Path(id): Path<DeliveryId>) -> Redirect {
    driver::complete_delivery(&ctx, id).await;
    Redirect::to(DELIVERY_PATH)
}

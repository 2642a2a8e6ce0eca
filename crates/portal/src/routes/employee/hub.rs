//! Employee landing page with work counts per queue.

use tracing::instrument;

use freshwash_core::{JobStatus, Role, WorkerStation};

use crate::resources::{
    DataContext, driver, driver::JobFilter, worker, worker::StationFilter,
};
use crate::views::{PageTemplate, Section, wire_name};

const STATIONS: [WorkerStation; 3] = [
    WorkerStation::Washing,
    WorkerStation::Ironing,
    WorkerStation::Packing,
];

/// Only `meta.total` is read, so one row is enough.
const COUNT_ONLY: Option<u32> = Some(1);

#[instrument(skip(ctx))]
pub async fn index(ctx: DataContext) -> PageTemplate {
    let role = ctx.user().map(|u| u.role);
    let page = PageTemplate::new(&ctx, "Orders").await;

    let page = match role {
        Some(Role::Worker) => {
            let filter = |station| StationFilter {
                station: Some(station),
                page: None,
                take: COUNT_ONLY,
            };
            let [washing, ironing, packing] = STATIONS.map(filter);
            let (washing, ironing, packing) = tokio::join!(
                worker::queue(&ctx, &washing),
                worker::queue(&ctx, &ironing),
                worker::queue(&ctx, &packing),
            );

            let mut queues = Section::new("Station queues");
            for (station, queue) in STATIONS.into_iter().zip([washing, ironing, packing]) {
                queues = queues.load(&queue, "", |section, page| {
                    section.stat(station.to_string(), page.meta.total.to_string())
                });
                queues = queues.link(
                    format!("Open {station} queue"),
                    format!("/employee/orders/station?station={}", wire_name(&station)),
                );
            }
            page.section(queues)
        }
        Some(Role::Driver) => {
            let available = JobFilter {
                status: Some(JobStatus::Available),
                page: None,
                take: COUNT_ONLY,
            };
            let (pickups, deliveries) = tokio::join!(
                driver::pickups(&ctx, &available),
                driver::deliveries(&ctx, &available),
            );

            let jobs = Section::new("Available jobs")
                .load(&pickups, "", |section, page| {
                    section.stat("Pickups", page.meta.total.to_string())
                })
                .load(&deliveries, "", |section, page| {
                    section.stat("Deliveries", page.meta.total.to_string())
                })
                .link("Pickup jobs", "/employee/orders/pickup")
                .link("Delivery jobs", "/employee/orders/delivery");
            page.section(jobs)
        }
        _ => page,
    };
    page.section(Section::new("").link("Attendance", "/employee/attendance"))
}

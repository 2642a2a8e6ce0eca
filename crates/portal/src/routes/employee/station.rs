//! Worker station queue.

use axum::{
    Form,
    extract::{Path, Query},
    response::Redirect,
};
use serde::Deserialize;
use tracing::instrument;

use freshwash_core::{OrderUuid, WorkerStation};

use crate::api::types::CompleteStation;
use crate::middleware::flash;
use crate::query::Toast;
use crate::resources::{DataContext, worker, worker::StationFilter};
use crate::routes::forms::parse_item_lines;
use crate::views::{
    self, Action, Cell, Field, FormView, PageTemplate, Pager, Row, Section, Table, choices,
    wire_name,
};

const PATH: &str = "/employee/orders/station";

#[derive(Debug, Default, Deserialize)]
pub struct CompleteForm {
    /// Optional recount, one `item_id=quantity` per line.
    #[serde(default)]
    pub items: String,
}

fn queue_href(station: WorkerStation) -> String {
    format!("{PATH}?station={}", wire_name(&station))
}

#[instrument(skip(ctx))]
pub async fn index(ctx: DataContext, Query(filter): Query<StationFilter>) -> PageTemplate {
    let station = filter.station_or_default();
    let queue = worker::queue(&ctx, &filter).await;

    let picker = FormView::get(PATH, "Switch station").field(
        Field::select(
            "station",
            "Station",
            choices(
                "Default",
                [WorkerStation::Washing, WorkerStation::Ironing, WorkerStation::Packing],
            ),
        )
        .value(wire_name(&station)),
    );

    let listing = Section::new(format!("{station} queue"))
        .form(picker)
        .load(&queue, "", |section, page| {
            let table = page.data.iter().fold(
                Table::new(&["Order", "Status", "Received", "Bypass"]).empty("The queue is empty."),
                |table, task| {
                    let bypass = if task.bypass_pending {
                        Cell::text("Pending approval")
                    } else {
                        Cell::link(
                            "Request bypass",
                            format!(
                                "/employee/bypass-requests?orderUuid={}&station={}",
                                task.order_uuid,
                                wire_name(&task.station)
                            ),
                        )
                    };
                    let mut row = Row::new([
                        Cell::text(task.order_number.clone()),
                        Cell::text(task.status.label()),
                        Cell::text(views::timestamp(&task.created_at)),
                        bypass,
                    ]);
                    if !task.bypass_pending {
                        row = row.action(Action::post(
                            "Complete",
                            format!(
                                "{PATH}/{}/complete?station={}",
                                task.order_uuid,
                                wire_name(&task.station)
                            ),
                        ));
                    }
                    table.row(row)
                },
            );
            section
                .table(table)
                .pager(Pager::new(PATH, &filter, &page.meta))
        });

    PageTemplate::new(&ctx, "Station").await.section(listing)
}

/// Finish this station for an order.
///
/// The recount is optional; without it the API compares against the
/// counts recorded when the order was processed.
#[instrument(skip(ctx, form))]
pub async fn complete(
    ctx: DataContext,
    Path(uuid): Path<OrderUuid>,
    Query(filter): Query<StationFilter>,
    Form(form): Form<CompleteForm>,
) -> Redirect {
    let station = filter.station_or_default();
    let items = if form.items.trim().is_empty() {
        Ok(Vec::new())
    } else {
        parse_item_lines(&form.items)
    };

    match items {
        Ok(items) => {
            worker::complete(&ctx, uuid, &CompleteStation { station, items }).await;
        }
        Err(message) => flash::push(ctx.session(), Toast::error(message)).await,
    }
    Redirect::to(&queue_href(station))
}

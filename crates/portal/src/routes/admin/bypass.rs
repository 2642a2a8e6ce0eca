//! Bypass request review (OUTLET_ADMIN).

use axum::{
    extract::{Path, Query},
    response::Redirect,
};
use tracing::instrument;

use freshwash_core::{BypassRequestId, BypassStatus};

use crate::api::types::BypassRequest;
use crate::resources::{DataContext, bypass, bypass::BypassFilter};
use crate::views::{
    self, Action, Field, FormView, PageTemplate, Pager, Row, Section, Table, choices, or_dash,
    wire_name,
};

const PATH: &str = "/admin/bypass-requests";

/// Rows of bypass requests, with review buttons when `review` is set.
pub(crate) fn bypass_table(requests: &[BypassRequest], review: bool) -> Table {
    requests.iter().fold(
        Table::new(&["Order", "Station", "Worker", "Reason", "Status", "Requested"])
            .empty("No bypass requests."),
        |table, request| {
            let mut row = Row::new([
                request
                    .order_number
                    .clone()
                    .unwrap_or_else(|| request.order_uuid.to_string()),
                request.station.to_string(),
                or_dash(request.worker_name.as_deref()),
                request.reason.clone(),
                request.status.to_string(),
                views::timestamp(&request.created_at),
            ]);
            if review && request.status == BypassStatus::Pending {
                row = row
                    .action(Action::post("Approve", format!("{PATH}/{}/approve", request.id)))
                    .action(Action::post("Reject", format!("{PATH}/{}/reject", request.id)).danger());
            }
            table.row(row)
        },
    )
}

/// Status filter select shared with the worker page.
pub(crate) fn status_field(current: Option<BypassStatus>) -> Field {
    Field::select(
        "status",
        "Status",
        choices(
            "Any status",
            [BypassStatus::Pending, BypassStatus::Approved, BypassStatus::Rejected],
        ),
    )
    .value(current.as_ref().map(wire_name).unwrap_or_default())
}

#[instrument(skip(ctx))]
pub async fn index(ctx: DataContext, Query(filter): Query<BypassFilter>) -> PageTemplate {
    let list = bypass::list(&ctx, &filter).await;

    let form = FormView::get(PATH, "Filter").field(status_field(filter.status));
    let listing = Section::new("").form(form).load(&list, "", |section, page| {
        section
            .table(bypass_table(&page.data, true))
            .pager(Pager::new(PATH, &filter, &page.meta))
    });

    PageTemplate::new(&ctx, "Bypass requests").await.section(listing)
}

#[instrument(skip(ctx))]
pub async fn approve(ctx: DataContext, Path(id): Path<BypassRequestId>) -> Redirect {
    bypass::approve(&ctx, id).await;
    Redirect::to(PATH)
}

#[instrument(skip(ctx))]
pub async fn reject(ctx: DataContext, Path(id): Path<BypassRequestId>) -> Redirect {
    bypass::reject(&ctx, id).await;
    Redirect::to(PATH)
}

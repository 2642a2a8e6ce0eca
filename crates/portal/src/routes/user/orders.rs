//! Customer order history and receipt confirmation.

use axum::{
    extract::{Path, Query},
    response::Redirect,
};
use tracing::instrument;

use freshwash_core::OrderUuid;

use crate::query::QueryState;
use crate::resources::{DataContext, orders, orders::OrderFilter};
use crate::routes::admin::orders::status_field;
use crate::routes::order_table;
use crate::views::{self, Action, FormView, PageTemplate, Pager, Row, Section, Table, or_dash};

const PATH: &str = "/user/orders";

#[instrument(skip(ctx))]
pub async fn index(ctx: DataContext, Query(filter): Query<OrderFilter>) -> PageTemplate {
    let list = orders::list_mine(&ctx, &filter).await;

    let listing = Section::new("")
        .form(FormView::get(PATH, "Filter").field(status_field(filter.status)))
        .load(&list, "", |section, page| {
            section
                .table(order_table(&page.data, PATH, false))
                .pager(Pager::new(PATH, &filter, &page.meta))
        });

    PageTemplate::new(&ctx, "My orders").await.section(listing)
}

#[instrument(skip(ctx))]
pub async fn detail(ctx: DataContext, Path(uuid): Path<OrderUuid>) -> PageTemplate {
    let detail = orders::detail(&ctx, Some(uuid)).await;

    let summary = Section::new("Summary").load(&detail, "", |section, detail| {
        let order = &detail.order;
        section
            .detail("Order", order.order_number.clone())
            .detail("Status", order.status.label())
            .detail("Outlet", or_dash(order.outlet_name.as_deref()))
            .detail("Weight", views::weight(order.total_weight))
            .detail("Total", views::money(order.total_price))
            .detail("Paid", if order.is_paid { "Yes" } else { "Not yet" })
            .detail("Created", views::timestamp(&order.created_at))
    });

    let mut page = PageTemplate::new(&ctx, "Order").await.section(summary);

    if let QueryState::Ready(detail) = &detail {
        let lines = detail.items.iter().fold(
            Table::new(&["Item", "Quantity"]).empty("Items are listed once the outlet weighs your laundry."),
            |table, line| table.row(Row::new([line.item_name.clone(), line.quantity.to_string()])),
        );
        page = page.section(Section::new("Items").table(lines));

        if detail.order.status.awaits_customer_confirmation() {
            let confirm = Table::new(&["Received your laundry?"]).row(
                Row::new(["Let us know it arrived safely."])
                    .action(Action::post("Confirm receipt", format!("{PATH}/{uuid}/confirm"))),
            );
            page = page.section(Section::new("Delivery").table(confirm));
        }
    }

    page.section(Section::new("").link("Back to my orders", PATH))
}

#[instrument(skip(ctx))]
pub async fn confirm(ctx: DataContext, Path(uuid): Path<OrderUuid>) -> Redirect {
    orders::confirm(&ctx, uuid).await;
    Redirect::to(&format!("{PATH}/{uuid}"))
}

//! Outlet order list, order detail and order processing.

use std::str::FromStr;

use axum::{
    Form,
    extract::{Path, Query},
    response::Redirect,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use freshwash_core::{OrderStatus, OrderUuid, Role};

use super::outlet_field;
use crate::api::types::{OrderDetail, ProcessOrder};
use crate::middleware::flash;
use crate::query::{QueryState, Toast};
use crate::resources::{DataContext, items, items::ItemFilter, orders, orders::OrderFilter, outlets};
use crate::routes::{forms::parse_item_lines, order_table};
use crate::views::{
    self, Field, FormView, PageTemplate, Pager, Row, Section, Table, choices, or_dash, wire_name,
};

const PATH: &str = "/admin/orders";

const ALL_STATUSES: [OrderStatus; 12] = [
    OrderStatus::WaitingForPickupDriver,
    OrderStatus::OnTheWayToOutlet,
    OrderStatus::ArrivedAtOutlet,
    OrderStatus::ReadyForWashing,
    OrderStatus::BeingWashed,
    OrderStatus::BeingIroned,
    OrderStatus::BeingPacked,
    OrderStatus::WaitingForPayment,
    OrderStatus::ReadyForDelivery,
    OrderStatus::BeingDeliveredToCustomer,
    OrderStatus::DeliveredToCustomer,
    OrderStatus::Completed,
];

/// Status filter select shared with the customer order list.
pub(crate) fn status_field(current: Option<OrderStatus>) -> Field {
    Field::select("status", "Status", choices("Any status", ALL_STATUSES))
        .value(current.as_ref().map(wire_name).unwrap_or_default())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessForm {
    pub total_weight: String,
    pub items: String,
}

impl ProcessForm {
    fn parse(&self) -> Result<ProcessOrder, String> {
        let total_weight = Decimal::from_str(self.total_weight.trim())
            .ok()
            .filter(|w| *w > Decimal::ZERO)
            .ok_or_else(|| "Total weight must be a positive number.".to_string())?;
        Ok(ProcessOrder {
            total_weight,
            items: parse_item_lines(&self.items)?,
        })
    }
}

#[instrument(skip(ctx))]
pub async fn index(ctx: DataContext, Query(filter): Query<OrderFilter>) -> PageTemplate {
    let (list, outlet_list) = tokio::join!(orders::list(&ctx, &filter), outlets::filter_options(&ctx));

    let mut filters = FormView::get(PATH, "Filter")
        .field(Field::text("search", "Order number").value(filter.search.clone().unwrap_or_default()))
        .field(status_field(filter.status));
    if let Some(outlet) = outlet_field(&outlet_list, "Outlet", "All outlets", filter.outlet_id) {
        filters = filters.field(outlet);
    }

    let listing = Section::new("").form(filters).load(&list, "", |section, page| {
        section
            .table(order_table(&page.data, PATH, true))
            .pager(Pager::new(PATH, &filter, &page.meta))
    });

    PageTemplate::new(&ctx, "Orders").await.section(listing)
}

fn detail_sections(detail: &OrderDetail) -> Vec<Section> {
    let order = &detail.order;
    let summary = Section::new("Summary")
        .detail("Order", order.order_number.clone())
        .detail("Status", order.status.label())
        .detail("Customer", or_dash(order.customer_name.as_deref()))
        .detail("Outlet", or_dash(order.outlet_name.as_deref()))
        .detail("Pickup address", or_dash(detail.pickup_address.as_deref()))
        .detail("Weight", views::weight(order.total_weight))
        .detail("Total", views::money(order.total_price))
        .detail("Paid", if order.is_paid { "Yes" } else { "No" })
        .detail("Created", views::timestamp(&order.created_at));

    let lines = detail.items.iter().fold(
        Table::new(&["Item", "Quantity"]).empty("Items are recorded when the order is processed."),
        |table, line| table.row(Row::new([line.item_name.clone(), line.quantity.to_string()])),
    );

    vec![summary, Section::new("Items").table(lines)]
}

#[instrument(skip(ctx))]
pub async fn detail(ctx: DataContext, Path(uuid): Path<OrderUuid>) -> PageTemplate {
    let catalogue_filter = ItemFilter {
        take: Some(100),
        ..ItemFilter::default()
    };
    let (detail, catalogue) = tokio::join!(
        orders::detail(&ctx, Some(uuid)),
        items::list(&ctx, &catalogue_filter)
    );

    let mut page = PageTemplate::new(&ctx, "Order detail").await;
    match &detail {
        QueryState::Ready(detail) => {
            for section in detail_sections(detail) {
                page = page.section(section);
            }
        }
        other => {
            page = page.section(Section::new("Summary").load(other, "", |s, _| s));
        }
    }

    let can_process = ctx.user().is_some_and(|u| u.role == Role::OutletAdmin)
        && detail
            .data()
            .is_some_and(|d| d.order.status == OrderStatus::ArrivedAtOutlet);
    if can_process {
        let form = FormView::post(format!("{PATH}/{uuid}/process"), "Process order")
            .field(Field::input("totalWeight", "Total weight (kg)", "number").required())
            .field(Field::textarea("items", "Items, one per line as item_id=quantity").required());
        let reference = Section::new("Process order")
            .form(form)
            .load(&catalogue, "", |section, items| {
                let table = items.data.iter().fold(
                    Table::new(&["Item id", "Name"]),
                    |table, item| table.row(Row::new([item.id.to_string(), item.name.clone()])),
                );
                section.table(table)
            });
        page = page.section(reference);
    }

    page.section(Section::new("").link("Back to orders", PATH))
}

#[instrument(skip(ctx, form))]
pub async fn process(
    ctx: DataContext,
    Path(uuid): Path<OrderUuid>,
    Form(form): Form<ProcessForm>,
) -> Redirect {
    match form.parse() {
        Ok(process) => {
            orders::process(&ctx, uuid, &process).await;
        }
        Err(message) => flash::push(ctx.session(), Toast::error(message)).await,
    }
    Redirect::to(&format!("{PATH}/{uuid}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_form_validation() {
        let form = ProcessForm {
            total_weight: "3.5".to_string(),
            items: "1=2\n2=1".to_string(),
        };
        let process = form.parse().unwrap();
        assert_eq!(process.total_weight, Decimal::new(35, 1));
        assert_eq!(process.items.len(), 2);

        let zero = ProcessForm {
            total_weight: "0".to_string(),
            items: "1=2".to_string(),
        };
        assert!(zero.parse().is_err());
    }

    #[test]
    fn test_status_field_selects_current() {
        let field = status_field(Some(OrderStatus::Completed));
        assert!(
            field
                .choices
                .iter()
                .any(|c| c.selected && c.value == "COMPLETED")
        );
    }
}

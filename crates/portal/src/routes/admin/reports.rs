//! Sales report page.

use axum::extract::Query;
use tracing::instrument;

use super::outlet_field;
use crate::api::types::ReportGrouping;
use crate::resources::{DataContext, outlets, reports, reports::SalesFilter};
use crate::views::{self, Field, FormView, PageTemplate, Row, Section, Table, or_dash, wire_name};

const PATH: &str = "/admin/reports/sales";

fn grouping_choices() -> Vec<(String, String)> {
    [
        (ReportGrouping::Day, "Daily"),
        (ReportGrouping::Month, "Monthly"),
        (ReportGrouping::Year, "Yearly"),
    ]
    .into_iter()
    .map(|(g, label)| (wire_name(&g), label.to_string()))
    .collect()
}

#[instrument(skip(ctx))]
pub async fn sales(ctx: DataContext, Query(filter): Query<SalesFilter>) -> PageTemplate {
    let (report, outlet_list) = tokio::join!(reports::sales(&ctx, &filter), outlets::filter_options(&ctx));

    let date = |d: Option<chrono::NaiveDate>| d.map(|d| d.to_string()).unwrap_or_default();
    let mut form = FormView::get(PATH, "Show report")
        .field(Field::input("from", "From", "date").value(date(filter.from)).required())
        .field(Field::input("to", "To", "date").value(date(filter.to)).required())
        .field(
            Field::select("groupBy", "Group by", grouping_choices())
                .value(wire_name(&filter.group_by.unwrap_or_default())),
        );
    if let Some(outlet) = outlet_field(&outlet_list, "Outlet", "All outlets", filter.outlet_id) {
        form = form.field(outlet);
    }

    let results = Section::new("Results").load(
        &report,
        "Choose a date range whose start is not after its end.",
        |section, report| {
            let table = report.rows.iter().fold(
                Table::new(&["Period", "Outlet", "Orders", "Revenue"]).empty("No sales in this range."),
                |table, row| {
                    table.row(Row::new([
                        row.period.clone(),
                        or_dash(row.outlet_name.as_deref()),
                        row.orders.to_string(),
                        views::money(Some(row.revenue)),
                    ]))
                },
            );
            section
                .stat("Orders", report.total_orders.to_string())
                .stat("Revenue", views::money(Some(report.total_revenue)))
                .table(table)
        },
    );

    PageTemplate::new(&ctx, "Sales report")
        .await
        .section(Section::new("").form(form))
        .section(results)
}

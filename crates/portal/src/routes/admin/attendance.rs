//! Attendance history for admins.

use axum::extract::Query;
use tracing::instrument;

use super::outlet_field;
use crate::api::types::Attendance;
use crate::resources::{DataContext, attendance, attendance::AttendanceFilter, outlets};
use crate::views::{self, Field, FormView, PageTemplate, Pager, Row, Section, Table, or_dash};

const PATH: &str = "/admin/attendance";

/// Attendance rows shared with the employee page.
pub(crate) fn attendance_table(records: &[Attendance], show_employee: bool) -> Table {
    let columns: &[&str] = if show_employee {
        &["Employee", "Outlet", "Checked in", "Checked out"]
    } else {
        &["Checked in", "Checked out"]
    };
    records.iter().fold(
        Table::new(columns).empty("No attendance records."),
        |table, record| {
            let mut cells = Vec::with_capacity(4);
            if show_employee {
                cells.push(or_dash(record.employee_name.as_deref()));
                cells.push(or_dash(record.outlet_name.as_deref()));
            }
            cells.push(views::timestamp(&record.check_in));
            cells.push(
                record
                    .check_out
                    .as_ref()
                    .map_or_else(|| "Still on shift".to_string(), views::timestamp),
            );
            table.row(Row::new(cells))
        },
    )
}

#[instrument(skip(ctx))]
pub async fn index(ctx: DataContext, Query(filter): Query<AttendanceFilter>) -> PageTemplate {
    let (history, outlet_list) = tokio::join!(
        attendance::history(&ctx, &filter),
        outlets::filter_options(&ctx)
    );

    let date = |d: Option<chrono::NaiveDate>| d.map(|d| d.to_string()).unwrap_or_default();
    let mut form = FormView::get(PATH, "Filter")
        .field(Field::input("from", "From", "date").value(date(filter.from)))
        .field(Field::input("to", "To", "date").value(date(filter.to)));
    if let Some(outlet) = outlet_field(&outlet_list, "Outlet", "All outlets", filter.outlet_id) {
        form = form.field(outlet);
    }

    let listing = Section::new("").form(form).load(
        &history,
        "The start date must not be after the end date.",
        |section, page| {
            section
                .table(attendance_table(&page.data, true))
                .pager(Pager::new(PATH, &filter, &page.meta))
        },
    );

    PageTemplate::new(&ctx, "Attendance").await.section(listing)
}

//! Employee check-in, check-out and own history.

use axum::{extract::Query, response::Redirect};
use tracing::instrument;

use crate::resources::{DataContext, attendance, attendance::AttendanceFilter};
use crate::routes::admin::attendance::attendance_table;
use crate::views::{Action, PageTemplate, Pager, Row, Section, Table};

const PATH: &str = "/employee/attendance";

#[instrument(skip(ctx))]
pub async fn index(ctx: DataContext, Query(filter): Query<AttendanceFilter>) -> PageTemplate {
    let history = attendance::history(&ctx, &filter).await;

    // The newest record is open while the employee is on shift.
    let on_shift = history
        .data()
        .and_then(|page| page.data.first())
        .is_some_and(|latest| latest.check_out.is_none());
    let clock = if on_shift {
        Action::post("Check out", format!("{PATH}/check-out")).danger()
    } else {
        Action::post("Check in", format!("{PATH}/check-in"))
    };

    let shift = Section::new("Shift").table(
        Table::new(&["Status"]).row(
            Row::new([if on_shift { "On shift" } else { "Off shift" }]).action(clock),
        ),
    );
    let listing = Section::new("History").load(&history, "", |section, page| {
        section
            .table(attendance_table(&page.data, false))
            .pager(Pager::new(PATH, &filter, &page.meta))
    });

    PageTemplate::new(&ctx, "Attendance")
        .await
        .section(shift)
        .section(listing)
}

#[instrument(skip(ctx))]
pub async fn check_in(ctx: DataContext) -> Redirect {
    attendance::check_in(&ctx).await;
    Redirect::to(PATH)
}

#[instrument(skip(ctx))]
pub async fn check_out(ctx: DataContext) -> Redirect {
    attendance::check_out(&ctx).await;
    Redirect::to(PATH)
}

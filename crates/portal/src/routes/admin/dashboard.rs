//! Admin landing page: this month's sales, latest orders and, for outlet
//! admins, pending bypass requests.

use chrono::{Datelike, Utc};
use tracing::instrument;

use freshwash_core::{BypassStatus, Role};

use super::bypass::bypass_table;
use crate::api::types::ReportGrouping;
use crate::query::QueryState;
use crate::resources::{
    DataContext, bypass, bypass::BypassFilter, orders, orders::OrderFilter, reports,
    reports::SalesFilter,
};
use crate::routes::order_table;
use crate::views::{self, PageTemplate, Section};

const RECENT: u32 = 5;

#[instrument(skip(ctx))]
pub async fn show(ctx: DataContext) -> PageTemplate {
    let today = Utc::now().date_naive();
    let month = SalesFilter {
        from: today.with_day(1),
        to: Some(today),
        outlet_id: None,
        group_by: Some(ReportGrouping::Day),
    };
    let recent = OrderFilter {
        take: Some(RECENT),
        ..OrderFilter::default()
    };
    let pending = BypassFilter {
        take: Some(RECENT),
        status: Some(BypassStatus::Pending),
        ..BypassFilter::default()
    };
    let reviews_bypass = ctx.user().is_some_and(|u| u.role == Role::OutletAdmin);

    let (sales, latest, requests) = tokio::join!(
        reports::sales(&ctx, &month),
        orders::list(&ctx, &recent),
        async {
            if reviews_bypass {
                bypass::list(&ctx, &pending).await
            } else {
                QueryState::Disabled
            }
        }
    );

    let mut page = PageTemplate::new(&ctx, "Dashboard")
        .await
        .section(Section::new("This month").load(&sales, "", |section, report| {
            section
                .stat("Orders", report.total_orders.to_string())
                .stat("Revenue", views::money(Some(report.total_revenue)))
        }))
        .section(
            Section::new("Latest orders")
                .load(&latest, "", |section, page| {
                    section.table(order_table(&page.data, "/admin/orders", true))
                })
                .link("All orders", "/admin/orders"),
        );

    if reviews_bypass {
        page = page.section(
            Section::new("Pending bypass requests")
                .load(&requests, "", |section, page| {
                    section.table(bypass_table(&page.data, true))
                })
                .link("All bypass requests", "/admin/bypass-requests"),
        );
    }
    page
}

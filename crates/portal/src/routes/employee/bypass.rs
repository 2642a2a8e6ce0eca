//! Worker bypass requests.

use axum::{Form, extract::Query, response::Redirect};
use serde::Deserialize;
use tracing::instrument;

use freshwash_core::{BypassStatus, OrderUuid, WorkerStation};

use crate::api::types::NewBypassRequest;
use crate::middleware::flash;
use crate::query::Toast;
use crate::resources::{DataContext, blank_as_none, bypass, bypass::BypassFilter};
use crate::routes::admin::bypass::{bypass_table, status_field};
use crate::views::{Field, FormView, PageTemplate, Pager, Section, choices, wire_name};

const PATH: &str = "/employee/bypass-requests";

/// List filter plus optional prefill from a station queue link.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BypassPage {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub page: Option<u32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub status: Option<BypassStatus>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub order_uuid: Option<OrderUuid>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub station: Option<WorkerStation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BypassForm {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub order_uuid: Option<OrderUuid>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub station: Option<WorkerStation>,
    pub reason: String,
}

impl BypassForm {
    fn validate(self) -> Result<NewBypassRequest, &'static str> {
        let order_uuid = self.order_uuid.ok_or("Enter a valid order id.")?;
        let station = self.station.ok_or("Choose the station to bypass.")?;
        let reason = self.reason.trim();
        if reason.is_empty() {
            return Err("Explain why the station should be bypassed.");
        }
        Ok(NewBypassRequest {
            order_uuid,
            station,
            reason: reason.to_string(),
        })
    }
}

#[instrument(skip(ctx))]
pub async fn index(ctx: DataContext, Query(query): Query<BypassPage>) -> PageTemplate {
    let filter = BypassFilter {
        page: query.page,
        take: None,
        status: query.status,
    };
    let list = bypass::list(&ctx, &filter).await;

    let request = FormView::post(PATH, "Send request")
        .field(
            Field::text("orderUuid", "Order id")
                .value(query.order_uuid.map(|u| u.to_string()).unwrap_or_default())
                .required(),
        )
        .field(
            Field::select(
                "station",
                "Station",
                choices(
                    "Choose…",
                    [WorkerStation::Washing, WorkerStation::Ironing, WorkerStation::Packing],
                ),
            )
            .value(query.station.as_ref().map(wire_name).unwrap_or_default())
            .required(),
        )
        .field(Field::textarea("reason", "Reason").required());

    let listing = Section::new("My requests")
        .form(FormView::get(PATH, "Filter").field(status_field(filter.status)))
        .load(&list, "", |section, page| {
            section
                .table(bypass_table(&page.data, false))
                .pager(Pager::new(PATH, &filter, &page.meta))
        });

    PageTemplate::new(&ctx, "Bypass requests")
        .await
        .section(Section::new("New request").form(request))
        .section(listing)
}

#[instrument(skip(ctx, form))]
pub async fn create(ctx: DataContext, Form(form): Form<BypassForm>) -> Redirect {
    match form.validate() {
        Ok(request) => {
            bypass::create(&ctx, &request).await;
        }
        Err(message) => flash::push(ctx.session(), Toast::error(message)).await,
    }
    Redirect::to(PATH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bypass_form_requires_every_field() {
        let form = |uuid: Option<OrderUuid>, station, reason: &str| BypassForm {
            order_uuid: uuid,
            station,
            reason: reason.to_string(),
        };
        let uuid = Some(OrderUuid::new(uuid::Uuid::nil()));

        assert!(form(None, Some(WorkerStation::Washing), "torn").validate().is_err());
        assert!(form(uuid, None, "torn").validate().is_err());
        assert!(form(uuid, Some(WorkerStation::Washing), "  ").validate().is_err());

        let ok = form(uuid, Some(WorkerStation::Washing), " stain remains ")
            .validate()
            .unwrap();
        assert_eq!(ok.reason, "stain remains");
    }
}

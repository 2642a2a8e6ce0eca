//! Outlet management.

use axum::{Form, extract::Query, response::Redirect};
use serde::Deserialize;
use tracing::instrument;

use crate::api::types::NewOutlet;
use crate::middleware::flash;
use crate::query::Toast;
use crate::resources::{DataContext, blank_as_none, outlets, outlets::OutletFilter};
use crate::views::{Field, FormView, PageTemplate, Pager, Row, Section, Table, or_dash};

const PATH: &str = "/admin/outlets";

#[derive(Debug, Deserialize)]
pub struct OutletForm {
    pub name: String,
    pub address: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub longitude: Option<f64>,
}

#[instrument(skip(ctx))]
pub async fn index(ctx: DataContext, Query(filter): Query<OutletFilter>) -> PageTemplate {
    let list = outlets::list(&ctx, &filter).await;

    let listing = Section::new("Outlets").load(&list, "", |section, page| {
        let table = page.data.iter().fold(
            Table::new(&["Name", "Address", "Location"]).empty("No outlets yet."),
            |table, outlet| {
                let location = match (outlet.latitude, outlet.longitude) {
                    (Some(lat), Some(lng)) => Some(format!("{lat:.5}, {lng:.5}")),
                    _ => None,
                };
                table.row(Row::new([
                    outlet.name.clone(),
                    outlet.address.clone(),
                    or_dash(location.as_deref()),
                ]))
            },
        );
        section
            .table(table)
            .pager(Pager::new(PATH, &filter, &page.meta))
    });

    let create = FormView::post(PATH, "Create outlet")
        .field(Field::text("name", "Name").required())
        .field(Field::textarea("address", "Address").required())
        .field(Field::input("latitude", "Latitude", "number"))
        .field(Field::input("longitude", "Longitude", "number"));

    PageTemplate::new(&ctx, "Outlets")
        .await
        .section(listing)
        .section(Section::new("New outlet").form(create))
}

#[instrument(skip(ctx, form), fields(name = %form.name))]
pub async fn create(ctx: DataContext, Form(form): Form<OutletForm>) -> Redirect {
    if form.name.trim().is_empty() || form.address.trim().is_empty() {
        flash::push(ctx.session(), Toast::error("Outlet name and address are required.")).await;
        return Redirect::to(PATH);
    }

    let outlet = NewOutlet {
        name: form.name.trim().to_string(),
        address: form.address.trim().to_string(),
        latitude: form.latitude,
        longitude: form.longitude,
    };
    outlets::create(&ctx, &outlet).await;
    Redirect::to(PATH)
}

//! Laundry item catalogue.

use axum::{
    Form,
    extract::{Path, Query},
    response::Redirect,
};
use serde::Deserialize;
use tracing::instrument;

use freshwash_core::ItemId;

use crate::api::types::NewLaundryItem;
use crate::middleware::flash;
use crate::query::Toast;
use crate::resources::{DataContext, items, items::ItemFilter};
use crate::views::{Action, Field, FormView, PageTemplate, Pager, Row, Section, Table};

const PATH: &str = "/admin/items";

#[derive(Debug, Deserialize)]
pub struct ItemForm {
    pub name: String,
}

#[instrument(skip(ctx))]
pub async fn index(ctx: DataContext, Query(filter): Query<ItemFilter>) -> PageTemplate {
    let list = items::list(&ctx, &filter).await;

    let search = FormView::get(PATH, "Search").field(
        Field::text("search", "Name").value(filter.search.clone().unwrap_or_default()),
    );
    let catalogue = Section::new("Items").form(search).load(&list, "", |section, page| {
        let table = page.data.iter().fold(
            Table::new(&["Name"]).empty("No items yet."),
            |table, item| {
                table.row(
                    Row::new([item.name.clone()]).action(
                        Action::post("Delete", format!("{PATH}/{}/delete", item.id)).danger(),
                    ),
                )
            },
        );
        section
            .table(table)
            .pager(Pager::new(PATH, &filter, &page.meta))
    });

    PageTemplate::new(&ctx, "Laundry items")
        .await
        .section(catalogue)
        .section(
            Section::new("New item").form(
                FormView::post(PATH, "Create item").field(Field::text("name", "Name").required()),
            ),
        )
}

#[instrument(skip(ctx))]
pub async fn create(ctx: DataContext, Form(form): Form<ItemForm>) -> Redirect {
    let name = form.name.trim();
    if name.is_empty() {
        flash::push(ctx.session(), Toast::error("Item name is required.")).await;
    } else {
        items::create(
            &ctx,
            &NewLaundryItem {
                name: name.to_string(),
            },
        )
        .await;
    }
    Redirect::to(PATH)
}

#[instrument(skip(ctx))]
pub async fn delete(ctx: DataContext, Path(id): Path<ItemId>) -> Redirect {
    items::delete(&ctx, id).await;
    Redirect::to(PATH)
}

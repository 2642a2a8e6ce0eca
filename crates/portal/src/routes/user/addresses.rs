//! Customer address book.

use axum::{Form, extract::Path, response::Redirect};
use serde::Deserialize;
use tracing::instrument;

use freshwash_core::AddressId;

use crate::api::types::NewAddress;
use crate::middleware::{RequireUser, flash};
use crate::query::Toast;
use crate::resources::{DataContext, addresses};
use crate::views::{Action, Field, FormView, PageTemplate, Row, Section, Table};

const PATH: &str = "/user/addresses";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressForm {
    pub address_name: String,
    pub address_line: String,
    pub city: String,
    /// Checkbox: present only when ticked.
    #[serde(default)]
    pub is_primary: Option<String>,
}

impl AddressForm {
    fn validate(self) -> Result<NewAddress, &'static str> {
        let (name, line, city) = (
            self.address_name.trim(),
            self.address_line.trim(),
            self.city.trim(),
        );
        if name.is_empty() || line.is_empty() || city.is_empty() {
            return Err("Label, address and city are required.");
        }
        Ok(NewAddress {
            address_name: name.to_string(),
            address_line: line.to_string(),
            city: city.to_string(),
            is_primary: self.is_primary.is_some(),
        })
    }
}

#[instrument(skip(ctx))]
pub async fn index(ctx: DataContext) -> PageTemplate {
    let list = addresses::list(&ctx).await;

    let book = Section::new("Saved addresses").load(&list, "", |section, addresses| {
        let table = addresses.iter().fold(
            Table::new(&["Label", "Address", "City", "Primary"]).empty("No saved addresses."),
            |table, address| {
                let mut row = Row::new([
                    address.address_name.clone(),
                    address.address_line.clone(),
                    address.city.clone(),
                    if address.is_primary { "Yes" } else { "" }.to_string(),
                ]);
                if !address.is_primary {
                    row = row.action(Action::post(
                        "Make primary",
                        format!("{PATH}/{}/primary", address.id),
                    ));
                }
                table.row(row.action(
                    Action::post("Delete", format!("{PATH}/{}/delete", address.id)).danger(),
                ))
            },
        );
        section.table(table)
    });

    let create = FormView::post(PATH, "Add address")
        .field(Field::text("addressName", "Label (e.g. Home)").required())
        .field(Field::textarea("addressLine", "Address").required())
        .field(Field::text("city", "City").required())
        .field(Field::input("isPrimary", "Use as primary", "checkbox").value("on"));

    PageTemplate::new(&ctx, "Addresses")
        .await
        .section(book)
        .section(Section::new("New address").form(create))
}

#[instrument(skip(ctx, user, form))]
pub async fn create(
    ctx: DataContext,
    RequireUser(user): RequireUser,
    Form(form): Form<AddressForm>,
) -> Redirect {
    match form.validate() {
        Ok(address) => {
            addresses::create(&ctx, user.id, &address).await;
        }
        Err(message) => flash::push(ctx.session(), Toast::error(message)).await,
    }
    Redirect::to(PATH)
}

#[instrument(skip(ctx, user))]
pub async fn set_primary(
    ctx: DataContext,
    RequireUser(user): RequireUser,
    Path(id): Path<AddressId>,
) -> Redirect {
    addresses::set_primary(&ctx, user.id, id).await;
    Redirect::to(PATH)
}

#[instrument(skip(ctx, user))]
pub async fn delete(
    ctx: DataContext,
    RequireUser(user): RequireUser,
    Path(id): Path<AddressId>,
) -> Redirect {
    addresses::delete(&ctx, user.id, id).await;
    Redirect::to(PATH)
}

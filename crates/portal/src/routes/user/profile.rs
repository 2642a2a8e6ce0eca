//! Customer profile page.

use axum::{Form, response::Redirect};
use serde::Deserialize;
use tracing::instrument;

use crate::api::types::ProfileUpdate;
use crate::middleware::{RequireUser, flash};
use crate::query::Toast;
use crate::resources::{DataContext, blank_as_none, profile};
use crate::views::{Field, FormView, PageTemplate, Section, or_dash};

const PATH: &str = "/user/profile";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileForm {
    pub fullname: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub phone_number: Option<String>,
}

#[instrument(skip(ctx))]
pub async fn show(ctx: DataContext) -> PageTemplate {
    let profile = profile::get(&ctx).await;

    let details = Section::new("Account").load(&profile, "", |section, p| {
        section
            .detail("Name", p.fullname.clone())
            .detail("Email", p.email.clone())
            .detail("Phone", or_dash(p.phone_number.as_deref()))
            .detail("Verified", if p.is_verified { "Yes" } else { "Not yet" })
            .detail("Addresses", p.addresses.len().to_string())
            .link("Manage addresses", "/user/addresses")
    });

    let current = profile.data();
    let edit = FormView::post(PATH, "Save")
        .field(
            Field::text("fullname", "Full name")
                .value(current.map(|p| p.fullname.clone()).unwrap_or_default())
                .required(),
        )
        .field(
            Field::input("phoneNumber", "Phone number", "tel").value(
                current
                    .and_then(|p| p.phone_number.clone())
                    .unwrap_or_default(),
            ),
        );

    PageTemplate::new(&ctx, "Profile")
        .await
        .section(details)
        .section(Section::new("Edit profile").form(edit))
}

#[instrument(skip(ctx, user, form))]
pub async fn update(
    ctx: DataContext,
    RequireUser(user): RequireUser,
    Form(form): Form<ProfileForm>,
) -> Redirect {
    let fullname = form.fullname.trim();
    if fullname.is_empty() {
        flash::push(ctx.session(), Toast::error("Name is required.")).await;
        return Redirect::to(PATH);
    }

    let update = ProfileUpdate {
        fullname: fullname.to_string(),
        phone_number: form.phone_number,
    };
    profile::update(&ctx, user.id, &update).await;
    Redirect::to(PATH)
}

//! Staff account management (ADMIN).

use axum::{
    Form,
    extract::{Path, Query},
    response::Redirect,
};
use serde::Deserialize;
use tracing::instrument;

use freshwash_core::{OutletId, Role, UserId, WorkerStation};

use super::outlet_field;
use crate::api::types::NewStaffUser;
use crate::middleware::flash;
use crate::query::Toast;
use crate::resources::{DataContext, blank_as_none, outlets, users, users::UserFilter};
use crate::views::{
    Action, Field, FormView, PageTemplate, Pager, Row, Section, Table, choices, or_dash,
    role_label,
};

const PATH: &str = "/admin/users";

/// Roles an admin may create from the portal.
const STAFF_ROLES: [Role; 3] = [Role::OutletAdmin, Role::Worker, Role::Driver];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffForm {
    pub fullname: String,
    pub email: String,
    pub password: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub role: Option<Role>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub outlet_id: Option<OutletId>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub station: Option<WorkerStation>,
}

impl StaffForm {
    fn validate(self) -> Result<NewStaffUser, &'static str> {
        let role = self.role.ok_or("Choose a role.")?;
        if self.fullname.trim().is_empty() || self.email.trim().is_empty() {
            return Err("Name and email are required.");
        }
        if self.password.len() < 8 {
            return Err("Password must be at least 8 characters.");
        }
        if self.outlet_id.is_none() {
            return Err("Staff must belong to an outlet.");
        }
        if role == Role::Worker && self.station.is_none() {
            return Err("Workers need a station.");
        }

        Ok(NewStaffUser {
            email: self.email.trim().to_string(),
            fullname: self.fullname.trim().to_string(),
            password: self.password,
            role,
            outlet_id: self.outlet_id,
            station: self.station.filter(|_| role == Role::Worker),
        })
    }
}

fn role_choices(any: &str, roles: &[Role]) -> Vec<(String, String)> {
    std::iter::once((String::new(), any.to_string()))
        .chain(
            roles
                .iter()
                .map(|r| (r.as_str().to_string(), role_label(*r).to_string())),
        )
        .collect()
}

#[instrument(skip(ctx))]
pub async fn index(ctx: DataContext, Query(filter): Query<UserFilter>) -> PageTemplate {
    let (list, outlet_list) = tokio::join!(users::list(&ctx, &filter), outlets::filter_options(&ctx));

    let search = FormView::get(PATH, "Filter")
        .field(Field::text("search", "Name or email").value(filter.search.clone().unwrap_or_default()))
        .field(
            Field::select("role", "Role", role_choices("Any role", &Role::ALL))
                .value(filter.role.map(|r| r.as_str().to_string()).unwrap_or_default()),
        );

    let listing = Section::new("Users").form(search).load(&list, "", |section, page| {
        let table = page.data.iter().fold(
            Table::new(&["Name", "Email", "Role", "Outlet", "Station"]).empty("No users match."),
            |table, user| {
                table.row(
                    Row::new([
                        user.fullname.clone(),
                        user.email.clone(),
                        role_label(user.role).to_string(),
                        or_dash(user.outlet_name.as_deref()),
                        user.station.map_or_else(|| "-".to_string(), |s| s.to_string()),
                    ])
                    .action(Action::post("Delete", format!("{PATH}/{}/delete", user.id)).danger()),
                )
            },
        );
        section
            .table(table)
            .pager(Pager::new(PATH, &filter, &page.meta))
    });

    let mut create = FormView::post(PATH, "Create user")
        .field(Field::text("fullname", "Full name").required())
        .field(Field::input("email", "Email", "email").required())
        .field(Field::input("password", "Password", "password").required())
        .field(Field::select("role", "Role", role_choices("Choose…", &STAFF_ROLES)).required())
        .field(Field::select(
            "station",
            "Station (workers)",
            choices(
                "None",
                [WorkerStation::Washing, WorkerStation::Ironing, WorkerStation::Packing],
            ),
        ));
    if let Some(outlet) = outlet_field(&outlet_list, "Outlet", "Choose…", None::<OutletId>) {
        create = create.field(outlet.required());
    }

    PageTemplate::new(&ctx, "Users")
        .await
        .section(listing)
        .section(Section::new("New staff account").form(create))
}

#[instrument(skip(ctx, form), fields(email = %form.email))]
pub async fn create(ctx: DataContext, Form(form): Form<StaffForm>) -> Redirect {
    match form.validate() {
        Ok(user) => {
            users::create(&ctx, &user).await;
        }
        Err(message) => flash::push(ctx.session(), Toast::error(message)).await,
    }
    Redirect::to(PATH)
}

#[instrument(skip(ctx))]
pub async fn delete(ctx: DataContext, Path(id): Path<UserId>) -> Redirect {
    if ctx.user().is_some_and(|u| u.id == id) {
        flash::push(ctx.session(), Toast::error("You cannot delete your own account.")).await;
    } else {
        users::delete(&ctx, id).await;
    }
    Redirect::to(PATH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::wire_name;

    fn form(role: Option<Role>, station: Option<WorkerStation>) -> StaffForm {
        StaffForm {
            fullname: "Budi".to_string(),
            email: "budi@freshwash.test".to_string(),
            password: "correct-horse".to_string(),
            role,
            outlet_id: Some(OutletId::new(1)),
            station,
        }
    }

    #[test]
    fn test_worker_needs_station() {
        assert_eq!(
            form(Some(Role::Worker), None).validate().unwrap_err(),
            "Workers need a station."
        );
        let worker = form(Some(Role::Worker), Some(WorkerStation::Ironing))
            .validate()
            .unwrap();
        assert_eq!(worker.station, Some(WorkerStation::Ironing));
    }

    #[test]
    fn test_station_dropped_for_other_roles() {
        let driver = form(Some(Role::Driver), Some(WorkerStation::Washing))
            .validate()
            .unwrap();
        assert_eq!(driver.station, None);
    }

    #[test]
    fn test_role_required() {
        assert!(form(None, None).validate().is_err());
    }

    #[test]
    fn test_wire_names_match_select_values() {
        assert_eq!(wire_name(&Role::OutletAdmin), Role::OutletAdmin.as_str());
    }
}

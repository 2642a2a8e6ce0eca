//! Page models rendered by askama.
//!
//! Feature pages are composed from [`Section`]s: each section shows one
//! query's result (table, details or stats), an inline error banner when the
//! query failed, and optionally a form. Handlers never render a crashed page
//! for an API failure.

use askama::Template;
use askama_web::WebTemplate;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use freshwash_core::Role;

use crate::api::types::PageMeta;
use crate::models::CurrentUser;
use crate::query::{QueryState, Toast};
use crate::resources::DataContext;

// =============================================================================
// Layout
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub label: &'static str,
    pub href: &'static str,
}

const fn link(label: &'static str, href: &'static str) -> NavLink {
    NavLink { label, href }
}

/// Navigation shown to a role.
#[must_use]
pub fn nav_for(role: Role) -> Vec<NavLink> {
    match role {
        Role::Admin => vec![
            link("Dashboard", "/admin/dashboard"),
            link("Orders", "/admin/orders"),
            link("Items", "/admin/items"),
            link("Outlets", "/admin/outlets"),
            link("Users", "/admin/users"),
            link("Attendance", "/admin/attendance"),
            link("Sales", "/admin/reports/sales"),
        ],
        Role::OutletAdmin => vec![
            link("Dashboard", "/admin/dashboard"),
            link("Orders", "/admin/orders"),
            link("Bypass requests", "/admin/bypass-requests"),
            link("Attendance", "/admin/attendance"),
            link("Sales", "/admin/reports/sales"),
        ],
        Role::Worker => vec![
            link("Orders", "/employee/orders"),
            link("Station", "/employee/orders/station"),
            link("Bypass requests", "/employee/bypass-requests"),
            link("Attendance", "/employee/attendance"),
        ],
        Role::Driver => vec![
            link("Orders", "/employee/orders"),
            link("Pickups", "/employee/orders/pickup"),
            link("Deliveries", "/employee/orders/delivery"),
            link("Attendance", "/employee/attendance"),
        ],
        Role::Customer => vec![
            link("My orders", "/user/orders"),
            link("Profile", "/user/profile"),
            link("Addresses", "/user/addresses"),
        ],
    }
}

/// Display name of a role.
#[must_use]
pub const fn role_label(role: Role) -> &'static str {
    match role {
        Role::Admin => "Admin",
        Role::OutletAdmin => "Outlet admin",
        Role::Worker => "Worker",
        Role::Driver => "Driver",
        Role::Customer => "Customer",
    }
}

/// Signed-in user shown in the header.
#[derive(Debug, Clone)]
pub struct UserBadge {
    pub name: String,
    pub role: &'static str,
}

impl From<&CurrentUser> for UserBadge {
    fn from(user: &CurrentUser) -> Self {
        Self {
            name: user.name.clone(),
            role: role_label(user.role),
        }
    }
}

// =============================================================================
// Page template
// =============================================================================

/// Generic feature page.
#[derive(Template, WebTemplate)]
#[template(path = "page.html")]
pub struct PageTemplate {
    pub title: String,
    pub user: Option<UserBadge>,
    pub nav: Vec<NavLink>,
    pub toasts: Vec<Toast>,
    pub sections: Vec<Section>,
}

impl PageTemplate {
    /// Page chrome for this request; consumes queued toasts.
    pub async fn new(ctx: &DataContext, title: impl Into<String>) -> Self {
        let toasts = ctx.take_toasts().await;
        Self {
            title: title.into(),
            user: ctx.user().map(UserBadge::from),
            nav: ctx.user().map(|u| nav_for(u.role)).unwrap_or_default(),
            toasts,
            sections: Vec::new(),
        }
    }

    #[must_use]
    pub fn section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }
}

/// Login form.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub title: String,
    pub user: Option<UserBadge>,
    pub nav: Vec<NavLink>,
    pub toasts: Vec<Toast>,
    pub email: String,
}

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct Section {
    pub title: String,
    /// Inline error banner.
    pub error: Option<String>,
    /// Neutral text, e.g. why a query did not run.
    pub notice: Option<String>,
    pub stats: Vec<Stat>,
    pub details: Vec<Detail>,
    pub links: Vec<Cell>,
    pub table: Option<Table>,
    pub form: Option<FormView>,
    pub pager: Option<Pager>,
}

impl Section {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Fill the section from a query result.
    ///
    /// `Failed` becomes the error banner, `Disabled` the given notice.
    #[must_use]
    pub fn load<T>(
        self,
        state: &QueryState<T>,
        disabled_notice: &str,
        fill: impl FnOnce(Self, &T) -> Self,
    ) -> Self {
        match state {
            QueryState::Ready(data) => fill(self, data),
            QueryState::Failed(err) => Self {
                error: Some(err.user_message()),
                ..self
            },
            QueryState::Disabled => self.notice(disabled_notice),
        }
    }

    #[must_use]
    pub fn notice(mut self, notice: impl Into<String>) -> Self {
        let notice = notice.into();
        if !notice.is_empty() {
            self.notice = Some(notice);
        }
        self
    }

    #[must_use]
    pub fn stat(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.stats.push(Stat {
            label: label.into(),
            value: value.into(),
        });
        self
    }

    #[must_use]
    pub fn detail(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.push(Detail {
            label: label.into(),
            value: value.into(),
        });
        self
    }

    #[must_use]
    pub fn link(mut self, text: impl Into<String>, href: impl Into<String>) -> Self {
        self.links.push(Cell::link(text, href));
        self
    }

    #[must_use]
    pub fn table(mut self, table: Table) -> Self {
        self.table = Some(table);
        self
    }

    #[must_use]
    pub fn form(mut self, form: FormView) -> Self {
        self.form = Some(form);
        self
    }

    #[must_use]
    pub fn pager(mut self, pager: Pager) -> Self {
        self.pager = Some(pager);
        self
    }
}

#[derive(Debug, Clone)]
pub struct Stat {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct Detail {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct Cell {
    pub text: String,
    pub href: Option<String>,
}

impl Cell {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            href: None,
        }
    }

    pub fn link(text: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            href: Some(href.into()),
        }
    }
}

impl From<String> for Cell {
    fn from(text: String) -> Self {
        Self::text(text)
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Self::text(text)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
    pub empty: String,
}

impl Table {
    pub fn new(columns: &[&str]) -> Self {
        Self {
            columns: columns.iter().map(|c| (*c).to_string()).collect(),
            rows: Vec::new(),
            empty: "Nothing here yet.".to_string(),
        }
    }

    #[must_use]
    pub fn empty(mut self, text: impl Into<String>) -> Self {
        self.empty = text.into();
        self
    }

    #[must_use]
    pub fn row(mut self, row: Row) -> Self {
        self.rows.push(row);
        self
    }

    #[must_use]
    pub fn has_actions(&self) -> bool {
        self.rows.iter().any(|r| !r.actions.is_empty())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Row {
    pub cells: Vec<Cell>,
    pub actions: Vec<Action>,
}

impl Row {
    pub fn new<C: Into<Cell>>(cells: impl IntoIterator<Item = C>) -> Self {
        Self {
            cells: cells.into_iter().map(Into::into).collect(),
            actions: Vec::new(),
        }
    }

    #[must_use]
    pub fn action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }
}

/// A one-button POST form.
#[derive(Debug, Clone)]
pub struct Action {
    pub label: String,
    pub action: String,
    pub danger: bool,
}

impl Action {
    pub fn post(label: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: action.into(),
            danger: false,
        }
    }

    #[must_use]
    pub const fn danger(mut self) -> Self {
        self.danger = true;
        self
    }
}

#[derive(Debug, Clone)]
pub struct FormView {
    pub action: String,
    pub method: &'static str,
    pub submit: String,
    pub fields: Vec<Field>,
}

impl FormView {
    pub fn post(action: impl Into<String>, submit: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            method: "post",
            submit: submit.into(),
            fields: Vec::new(),
        }
    }

    /// A filter form that reloads the page with query parameters.
    pub fn get(action: impl Into<String>, submit: impl Into<String>) -> Self {
        Self {
            method: "get",
            ..Self::post(action, submit)
        }
    }

    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }
}

#[derive(Debug, Clone)]
pub struct Field {
    pub name: &'static str,
    pub label: &'static str,
    /// HTML input type, or `select` / `textarea`.
    pub kind: &'static str,
    pub value: String,
    pub required: bool,
    pub choices: Vec<Choice>,
}

impl Field {
    pub fn input(name: &'static str, label: &'static str, kind: &'static str) -> Self {
        Self {
            name,
            label,
            kind,
            value: String::new(),
            required: false,
            choices: Vec::new(),
        }
    }

    pub fn text(name: &'static str, label: &'static str) -> Self {
        Self::input(name, label, "text")
    }

    pub fn textarea(name: &'static str, label: &'static str) -> Self {
        Self::input(name, label, "textarea")
    }

    /// A select whose first choice is "any" (blank value).
    pub fn select(
        name: &'static str,
        label: &'static str,
        choices: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        Self {
            choices: choices
                .into_iter()
                .map(|(value, label)| Choice {
                    value,
                    label,
                    selected: false,
                })
                .collect(),
            ..Self::input(name, label, "select")
        }
    }

    #[must_use]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        let selected = self.value.clone();
        for choice in &mut self.choices {
            choice.selected = choice.value == selected;
        }
        self
    }

    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

#[derive(Debug, Clone)]
pub struct Choice {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// Previous/next links of a paginated list.
#[derive(Debug, Clone)]
pub struct Pager {
    pub summary: String,
    pub previous: Option<String>,
    pub next: Option<String>,
}

impl Pager {
    /// Links for `meta`, keeping the other parameters of `filter`.
    pub fn new<F: Serialize>(path: &str, filter: &F, meta: &PageMeta) -> Self {
        let page_link = |page: u32| page_href(path, filter, page);
        Self {
            summary: format!(
                "Page {} of {} ({} total)",
                meta.page,
                meta.page_count().max(1),
                meta.total
            ),
            previous: meta.has_previous().then(|| page_link(meta.page - 1)),
            next: meta.has_next().then(|| page_link(meta.page + 1)),
        }
    }
}

fn page_href<F: Serialize>(path: &str, filter: &F, page: u32) -> String {
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    if let Ok(Value::Object(params)) = serde_json::to_value(filter) {
        for (key, value) in params {
            match value {
                Value::Null => {}
                _ if key == "page" => {}
                Value::String(s) => {
                    query.append_pair(&key, &s);
                }
                other => {
                    query.append_pair(&key, &other.to_string());
                }
            }
        }
    }
    query.append_pair("page", &page.to_string());
    format!("{path}?{}", query.finish())
}

// =============================================================================
// Formatting
// =============================================================================

#[must_use]
pub fn money(amount: Option<Decimal>) -> String {
    amount.map_or_else(|| "-".to_string(), |a| format!("Rp {}", a.round_dp(0)))
}

#[must_use]
pub fn weight(kg: Option<Decimal>) -> String {
    kg.map_or_else(|| "-".to_string(), |w| format!("{} kg", w.normalize()))
}

#[must_use]
pub fn timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

#[must_use]
pub fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

/// Select choices for a list of displayable values, plus a blank "any".
pub fn choices<T: Serialize + std::fmt::Display>(
    any: &str,
    values: impl IntoIterator<Item = T>,
) -> Vec<(String, String)> {
    std::iter::once((String::new(), any.to_string()))
        .chain(values.into_iter().map(|v| (wire_name(&v), v.to_string())))
        .collect()
}

/// Serialized form of an enum value (`"BEING_WASHED"`).
#[must_use]
pub fn wire_name<T: Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(Value::String(s)) => s,
        Ok(other) => other.to_string(),
        Err(_) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use freshwash_core::{GuardTable, OrderStatus};

    use super::*;
    use crate::api::{ApiError, GENERIC_ERROR_MESSAGE};

    #[test]
    fn test_nav_links_are_reachable_for_their_role() {
        let guards = GuardTable::portal().unwrap();
        for role in Role::ALL {
            for link in nav_for(role) {
                assert!(
                    guards.evaluate(link.href, Some(role)).renders(),
                    "{role} cannot open {}",
                    link.href
                );
            }
        }
    }

    #[test]
    fn test_failed_query_becomes_banner() {
        let state: QueryState<u32> = QueryState::Failed(ApiError::Status {
            path: "/items".to_string(),
            status: 500,
            message: None,
        });
        let section = Section::new("Items").load(&state, "", |s, _| s.stat("n", "1"));
        assert_eq!(section.error.as_deref(), Some(GENERIC_ERROR_MESSAGE));
        assert!(section.stats.is_empty());
    }

    #[test]
    fn test_disabled_query_shows_notice() {
        let section = Section::new("Report").load(
            &QueryState::<u32>::Disabled,
            "Pick a date range.",
            |s, _| s,
        );
        assert_eq!(section.notice.as_deref(), Some("Pick a date range."));
        assert!(section.error.is_none());
    }

    #[test]
    fn test_pager_keeps_filters() {
        #[derive(Serialize)]
        struct Filter {
            page: Option<u32>,
            status: Option<OrderStatus>,
            search: Option<String>,
        }
        let filter = Filter {
            page: Some(2),
            status: Some(OrderStatus::BeingWashed),
            search: None,
        };
        let meta = PageMeta {
            page: 2,
            take: 10,
            total: 35,
        };
        let pager = Pager::new("/admin/orders", &filter, &meta);
        assert_eq!(
            pager.previous.as_deref(),
            Some("/admin/orders?status=BEING_WASHED&page=1")
        );
        assert_eq!(
            pager.next.as_deref(),
            Some("/admin/orders?status=BEING_WASHED&page=3")
        );
        assert_eq!(pager.summary, "Page 2 of 4 (35 total)");
    }

    #[test]
    fn test_select_marks_current_value() {
        let field = Field::select("status", "Status", choices("Any", [OrderStatus::Completed]))
            .value("COMPLETED");
        assert!(field.choices[1].selected);
        assert!(!field.choices[0].selected);
    }
}

//! Data hooks: one module per API resource.
//!
//! Every hook takes a [`DataContext`] and returns a tagged result
//! ([`QueryState`] for reads, [`MutationOutcome`] for writes). Hooks own
//! their query keys and the keys their mutations invalidate, so handlers
//! never build keys by hand.

pub mod addresses;
pub mod attendance;
pub mod auth;
pub mod bypass;
pub mod driver;
pub mod items;
pub mod orders;
pub mod outlets;
pub mod profile;
pub mod reports;
pub mod users;
pub mod worker;

use std::future::Future;

use axum::{extract::FromRequestParts, http::request::Parts};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tower_sessions::Session;

use freshwash_core::{OutletId, Role};

use crate::api::{ApiClient, ApiError};
use crate::error::AppError;
use crate::middleware::{auth as session_auth, flash};
use crate::models::CurrentUser;
use crate::query::{CacheScope, Mutation, MutationOutcome, Query, QueryState, Toast};
use crate::state::AppState;

/// Outlet filter an outlet-scoped query runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutletScope {
    /// Run with this outlet filter; `None` means every outlet.
    Filter(Option<OutletId>),
    /// The caller has no outlet to see; the query must not run.
    Denied,
}

impl OutletScope {
    #[must_use]
    pub const fn outlet_id(self) -> Option<OutletId> {
        match self {
            Self::Filter(outlet_id) => outlet_id,
            Self::Denied => None,
        }
    }

    #[must_use]
    pub const fn is_denied(self) -> bool {
        matches!(self, Self::Denied)
    }
}

/// Everything a data hook needs for one request.
///
/// The API client carries the signed-in user's token; the cache scope is
/// that user's partition.
pub struct DataContext {
    state: AppState,
    session: Session,
    user: Option<CurrentUser>,
    api: ApiClient,
}

impl DataContext {
    /// Build a context from an already-read session.
    pub async fn new(state: AppState, session: Session) -> Self {
        let user = session_auth::current_user(&session).await;
        let api = match (&user, session_auth::access_token(&session).await) {
            (Some(_), Some(token)) => state.api().with_token(token),
            _ => state.api().clone(),
        };

        Self {
            state,
            session,
            user,
            api,
        }
    }

    #[must_use]
    pub const fn user(&self) -> Option<&CurrentUser> {
        self.user.as_ref()
    }

    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    /// Cache partition of this request.
    #[must_use]
    pub fn scope(&self) -> CacheScope {
        self.user
            .as_ref()
            .map_or(CacheScope::Anonymous, CurrentUser::cache_scope)
    }

    /// Outlet filter an outlet-scoped query must carry.
    ///
    /// Outlet admins are pinned to their own outlet whatever was requested,
    /// and an outlet admin without an outlet is denied outright. Admins may
    /// filter freely; other roles never filter by outlet.
    #[must_use]
    pub fn outlet_scope(&self, requested: Option<OutletId>) -> OutletScope {
        match self.user.as_ref() {
            Some(user) if user.role == Role::OutletAdmin => {
                user.outlet_id.map_or(OutletScope::Denied, |id| OutletScope::Filter(Some(id)))
            }
            Some(user) if user.role == Role::Admin => OutletScope::Filter(requested),
            _ => OutletScope::Filter(None),
        }
    }

    /// Run a query in this request's scope.
    pub async fn query<T, F, Fut>(&self, query: Query<F>) -> QueryState<T>
    where
        T: DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, ApiError>>,
    {
        self.state.cache().query(self.scope(), query).await
    }

    /// Run a mutation and queue its toast for the next page.
    pub async fn mutate<T, Fut>(&self, mutation: Mutation, call: Fut) -> MutationOutcome<T>
    where
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let outcome = self.state.cache().mutate(self.scope(), mutation, call).await;
        flash::push(&self.session, outcome.toast.clone()).await;
        outcome
    }

    /// Toasts queued by earlier requests, removed from the session.
    pub async fn take_toasts(&self) -> Vec<Toast> {
        flash::take(&self.session).await
    }
}

impl FromRequestParts<AppState> for DataContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;
        Ok(Self::new(state.clone(), session).await)
    }
}

/// Deserialize an optional form or query field, treating a blank value as
/// absent.
///
/// Accepts JSON scalars (`3`, `true`) as well as bare strings so that ids,
/// enums and dates all work from `application/x-www-form-urlencoded`.
///
/// # Errors
///
/// Returns an error if a non-blank value does not parse as `T`.
pub fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    let Some(raw) = raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    serde_json::from_str::<T>(&raw)
        .or_else(|_| serde_json::from_value::<T>(Value::String(raw.clone())))
        .map(Some)
        .map_err(|e| serde::de::Error::custom(format!("invalid value {raw:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;
    use serde::Deserialize;
    use tower_sessions::MemoryStore;

    use freshwash_core::{OrderStatus, OutletId, UserId};

    use super::*;
    use crate::config::{ApiConfig, PortalConfig};

    #[derive(Debug, Deserialize)]
    struct Filter {
        #[serde(default, deserialize_with = "blank_as_none")]
        status: Option<OrderStatus>,
        #[serde(default, deserialize_with = "blank_as_none")]
        outlet_id: Option<OutletId>,
        #[serde(default, deserialize_with = "blank_as_none")]
        search: Option<String>,
    }

    fn parse(json: Value) -> Result<Filter, serde_json::Error> {
        serde_json::from_value(json)
    }

    #[test]
    fn test_blank_fields_are_absent() {
        let filter = parse(serde_json::json!({ "status": "", "outlet_id": " " })).unwrap();
        assert!(filter.status.is_none());
        assert!(filter.outlet_id.is_none());
        assert!(filter.search.is_none());
    }

    #[test]
    fn test_scalars_and_enums_parse_from_strings() {
        let filter = parse(serde_json::json!({
            "status": "BEING_WASHED",
            "outlet_id": "3",
            "search": "42",
        }))
        .unwrap();
        assert_eq!(filter.status, Some(OrderStatus::BeingWashed));
        assert_eq!(filter.outlet_id, Some(OutletId::new(3)));
        assert_eq!(filter.search.as_deref(), Some("42"));
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(parse(serde_json::json!({ "status": "SPINNING" })).is_err());
    }

    async fn context_for(user: &CurrentUser) -> DataContext {
        let api = ApiConfig::new("http://localhost:8000").unwrap();
        let state = AppState::new(PortalConfig::local(api)).unwrap();
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        session_auth::sign_in(&session, user, "token-7").await.unwrap();
        DataContext::new(state, session).await
    }

    fn staff(role: Role, outlet_id: Option<OutletId>) -> CurrentUser {
        CurrentUser {
            id: UserId::new(7),
            email: "staff@freshwash.id".to_string(),
            name: "Staff".to_string(),
            role,
            outlet_id,
        }
    }

    #[tokio::test]
    async fn test_context_reads_signed_in_user() {
        let ctx = context_for(&staff(Role::Admin, None)).await;
        assert_eq!(ctx.user().map(|u| u.id), Some(UserId::new(7)));
        assert_eq!(ctx.scope(), CacheScope::User(UserId::new(7)));
    }

    #[tokio::test]
    async fn test_outlet_scope_by_role() {
        let requested = Some(OutletId::new(3));

        let admin = context_for(&staff(Role::Admin, None)).await;
        assert_eq!(admin.outlet_scope(requested), OutletScope::Filter(requested));

        let pinned = context_for(&staff(Role::OutletAdmin, Some(OutletId::new(10)))).await;
        assert_eq!(
            pinned.outlet_scope(requested),
            OutletScope::Filter(Some(OutletId::new(10)))
        );

        let unassigned = context_for(&staff(Role::OutletAdmin, None)).await;
        assert!(unassigned.outlet_scope(requested).is_denied());
        assert!(unassigned.outlet_scope(None).is_denied());
    }

    #[tokio::test]
    async fn test_outlet_admin_without_outlet_never_queries() {
        let ctx = context_for(&staff(Role::OutletAdmin, None)).await;

        let orders = orders::list(&ctx, &orders::OrderFilter::default()).await;
        assert!(orders.is_disabled());

        let date = |s: &str| s.parse::<NaiveDate>().ok();
        let sales = reports::sales(
            &ctx,
            &reports::SalesFilter {
                from: date("2024-01-01"),
                to: date("2024-01-31"),
                ..reports::SalesFilter::default()
            },
        )
        .await;
        assert!(sales.is_disabled());

        let attendance = attendance::history(&ctx, &attendance::AttendanceFilter::default()).await;
        assert!(attendance.is_disabled());
    }
}

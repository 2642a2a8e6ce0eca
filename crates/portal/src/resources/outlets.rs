//! Outlets (ADMIN manages them; the list also feeds ADMIN outlet filters).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use freshwash_core::{QueryKey, Role};

use super::{DataContext, blank_as_none};
use crate::api::types::{NewOutlet, Outlet, Paginated};
use crate::query::{Invalidation, Mutation, MutationOutcome, Query, QueryState};

const RESOURCE: &str = "outlets";

/// Page size used when the list only feeds a filter dropdown.
const FILTER_TAKE: u32 = 100;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutletFilter {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub page: Option<u32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub take: Option<u32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub search: Option<String>,
}

#[instrument(skip(ctx))]
pub async fn list(ctx: &DataContext, filter: &OutletFilter) -> QueryState<Paginated<Outlet>> {
    let api = ctx.api();
    ctx.query(Query::new(QueryKey::new(RESOURCE).with(filter), || {
        api.get_json("/outlets", filter)
    }))
    .await
}

/// Outlets for the ADMIN outlet filter; disabled for every other role.
pub async fn filter_options(ctx: &DataContext) -> QueryState<Vec<Outlet>> {
    let is_admin = ctx.user().is_some_and(|u| u.role == Role::Admin);
    let filter = OutletFilter {
        take: Some(FILTER_TAKE),
        ..OutletFilter::default()
    };
    let api = ctx.api();
    ctx.query::<Paginated<Outlet>, _, _>(
        Query::new(QueryKey::new(RESOURCE).with(&filter), || {
            api.get_json("/outlets", &filter)
        })
        .enabled(is_admin),
    )
    .await
    .map(|page| page.data)
}

#[instrument(skip(ctx, outlet), fields(name = %outlet.name))]
pub async fn create(ctx: &DataContext, outlet: &NewOutlet) -> MutationOutcome<Value> {
    let api = ctx.api();
    ctx.mutate(
        Mutation::new("create_outlet", "Outlet created.")
            .invalidates(Invalidation::Prefix(QueryKey::new(RESOURCE))),
        api.post("/outlets", outlet),
    )
    .await
}

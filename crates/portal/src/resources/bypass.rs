//! Bypass requests: a worker asks to skip a station check, the outlet
//! admin approves or rejects.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use freshwash_core::{BypassRequestId, BypassStatus, QueryKey};

use super::{DataContext, blank_as_none, worker};
use crate::api::types::{BypassRequest, NewBypassRequest, Paginated};
use crate::query::{Invalidation, Mutation, MutationOutcome, Query, QueryState};

const RESOURCE: &str = "bypass-requests";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BypassFilter {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub page: Option<u32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub take: Option<u32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub status: Option<BypassStatus>,
}

#[instrument(skip(ctx))]
pub async fn list(ctx: &DataContext, filter: &BypassFilter) -> QueryState<Paginated<BypassRequest>> {
    let api = ctx.api();
    ctx.query(Query::new(QueryKey::new(RESOURCE).with(filter), || {
        api.get_json("/bypass-requests", filter)
    }))
    .await
}

#[instrument(skip(ctx, request), fields(order = %request.order_uuid, station = %request.station))]
pub async fn create(ctx: &DataContext, request: &NewBypassRequest) -> MutationOutcome<Value> {
    let api = ctx.api();
    ctx.mutate(
        Mutation::new("create_bypass_request", "Bypass request sent.")
            .invalidates(Invalidation::Prefix(QueryKey::new(RESOURCE)))
            .invalidates(Invalidation::Prefix(QueryKey::new(worker::RESOURCE))),
        api.post("/bypass-requests", request),
    )
    .await
}

/// Approval releases the order from the station, so queues go stale too.
#[instrument(skip(ctx))]
pub async fn approve(ctx: &DataContext, id: BypassRequestId) -> MutationOutcome<Value> {
    let api = ctx.api();
    let path = format!("/bypass-requests/{id}/approve");
    ctx.mutate(
        Mutation::new("approve_bypass_request", "Bypass request approved.")
            .invalidates(Invalidation::Prefix(QueryKey::new(RESOURCE)))
            .invalidates(Invalidation::Prefix(QueryKey::new(worker::RESOURCE))),
        api.patch(&path, &serde_json::json!({})),
    )
    .await
}

#[instrument(skip(ctx))]
pub async fn reject(ctx: &DataContext, id: BypassRequestId) -> MutationOutcome<Value> {
    let api = ctx.api();
    let path = format!("/bypass-requests/{id}/reject");
    ctx.mutate(
        Mutation::new("reject_bypass_request", "Bypass request rejected.")
            .invalidates(Invalidation::Prefix(QueryKey::new(RESOURCE))),
        api.patch(&path, &serde_json::json!({})),
    )
    .await
}

//! Pickup and delivery jobs for drivers.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use freshwash_core::{DeliveryId, JobStatus, PickupId, QueryKey};

use super::{DataContext, blank_as_none};
use crate::api::types::{DeliveryJob, Paginated, PickupJob};
use crate::query::{Invalidation, Mutation, MutationOutcome, Query, QueryState};

const PICKUPS: &str = "pickups";
const DELIVERIES: &str = "deliveries";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobFilter {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub status: Option<JobStatus>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub page: Option<u32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub take: Option<u32>,
}

#[instrument(skip(ctx))]
pub async fn pickups(ctx: &DataContext, filter: &JobFilter) -> QueryState<Paginated<PickupJob>> {
    let api = ctx.api();
    ctx.query(Query::new(QueryKey::new(PICKUPS).with(filter), || {
        api.get_json("/driver/pickups", filter)
    }))
    .await
}

#[instrument(skip(ctx))]
pub async fn deliveries(
    ctx: &DataContext,
    filter: &JobFilter,
) -> QueryState<Paginated<DeliveryJob>> {
    let api = ctx.api();
    ctx.query(Query::new(QueryKey::new(DELIVERIES).with(filter), || {
        api.get_json("/driver/deliveries", filter)
    }))
    .await
}

fn changed(name: &'static str, message: &str, jobs: &str) -> Mutation {
    Mutation::new(name, message)
        .invalidates(Invalidation::Prefix(QueryKey::new(jobs)))
        .invalidates(Invalidation::Prefix(QueryKey::new("orders")))
}

async fn job_action(
    ctx: &DataContext,
    mutation: Mutation,
    path: String,
) -> MutationOutcome<Value> {
    let api = ctx.api();
    ctx.mutate(mutation, api.post(&path, &serde_json::json!({})))
        .await
}

#[instrument(skip(ctx))]
pub async fn take_pickup(ctx: &DataContext, id: PickupId) -> MutationOutcome<Value> {
    job_action(
        ctx,
        changed("take_pickup", "Pickup taken.", PICKUPS),
        format!("/driver/take-pickup/{id}"),
    )
    .await
}

#[instrument(skip(ctx))]
pub async fn complete_pickup(ctx: &DataContext, id: PickupId) -> MutationOutcome<Value> {
    job_action(
        ctx,
        changed("complete_pickup", "Pickup completed.", PICKUPS),
        format!("/driver/complete-pickup/{id}"),
    )
    .await
}

#[instrument(skip(ctx))]
pub async fn take_delivery(ctx: &DataContext, id: DeliveryId) -> MutationOutcome<Value> {
    job_action(
        ctx,
        changed("take_delivery", "Delivery taken.", DELIVERIES),
        format!("/driver/take-delivery/{id}"),
    )
    .await
}

#[instrument(skip(ctx))]
pub async fn complete_delivery(ctx: &DataContext, id: DeliveryId) -> MutationOutcome<Value> {
    job_action(
        ctx,
        changed("complete_delivery", "Delivery completed.", DELIVERIES),
        format!("/driver/complete-delivery/{id}"),
    )
    .await
}

//! Station queues for workers.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use freshwash_core::{OrderUuid, QueryKey, WorkerStation};

use super::{DataContext, blank_as_none};
use crate::api::types::{CompleteStation, Paginated, StationTask};
use crate::query::{Invalidation, Mutation, MutationOutcome, Query, QueryState};

pub(crate) const RESOURCE: &str = "worker-orders";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationFilter {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub station: Option<WorkerStation>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub page: Option<u32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub take: Option<u32>,
}

impl StationFilter {
    /// The station shown when none was picked.
    #[must_use]
    pub fn station_or_default(&self) -> WorkerStation {
        self.station.unwrap_or(WorkerStation::Washing)
    }
}

/// Orders waiting at one station of the worker's outlet.
#[instrument(skip(ctx))]
pub async fn queue(ctx: &DataContext, filter: &StationFilter) -> QueryState<Paginated<StationTask>> {
    let filter = StationFilter {
        station: Some(filter.station_or_default()),
        ..filter.clone()
    };
    let api = ctx.api();
    ctx.query(Query::new(QueryKey::new(RESOURCE).with(&filter), || {
        api.get_json("/worker/orders", &filter)
    }))
    .await
}

/// Mark the worker's station done for an order.
#[instrument(skip(ctx, complete), fields(station = %complete.station))]
pub async fn complete(
    ctx: &DataContext,
    uuid: OrderUuid,
    complete: &CompleteStation,
) -> MutationOutcome<Value> {
    let api = ctx.api();
    let path = format!("/worker/process/{uuid}");
    ctx.mutate(
        Mutation::new("complete_station", "Station completed.")
            .invalidates(Invalidation::Prefix(QueryKey::new(RESOURCE)))
            .invalidates(Invalidation::Prefix(QueryKey::new("orders"))),
        api.post(&path, complete),
    )
    .await
}

//! Orders: the outlet-side list and detail, the customer's own list, and
//! the two order mutations (process, confirm).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use freshwash_core::{OrderStatus, OrderUuid, OutletId, QueryKey};

use super::{DataContext, blank_as_none};
use crate::api::types::{Order, OrderDetail, Paginated, ProcessOrder};
use crate::query::{Invalidation, Mutation, MutationOutcome, Query, QueryState};

const RESOURCE: &str = "orders";

/// List filter of `GET /orders` and `GET /orders/user`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderFilter {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub page: Option<u32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub take: Option<u32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub status: Option<OrderStatus>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub outlet_id: Option<OutletId>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub search: Option<String>,
}

/// `["order", uuid]`
#[must_use]
pub fn detail_key(uuid: OrderUuid) -> QueryKey {
    QueryKey::new("order").with(&uuid)
}

/// Orders visible to staff, scoped to the outlet admin's outlet.
///
/// Disabled for an outlet admin who has no outlet.
#[instrument(skip(ctx))]
pub async fn list(ctx: &DataContext, filter: &OrderFilter) -> QueryState<Paginated<Order>> {
    let outlet = ctx.outlet_scope(filter.outlet_id);
    let filter = OrderFilter {
        outlet_id: outlet.outlet_id(),
        ..filter.clone()
    };
    let api = ctx.api();
    ctx.query(
        Query::new(QueryKey::new(RESOURCE).with(&filter), || {
            api.get_json("/orders", &filter)
        })
        .enabled(!outlet.is_denied()),
    )
    .await
}

/// The signed-in customer's orders.
#[instrument(skip(ctx))]
pub async fn list_mine(ctx: &DataContext, filter: &OrderFilter) -> QueryState<Paginated<Order>> {
    let filter = OrderFilter {
        outlet_id: None,
        ..filter.clone()
    };
    let api = ctx.api();
    ctx.query(Query::new(
        QueryKey::new(RESOURCE).with("user").with(&filter),
        || api.get_json("/orders/user", &filter),
    ))
    .await
}

/// One order; disabled until a uuid is known.
#[instrument(skip(ctx))]
pub async fn detail(ctx: &DataContext, uuid: Option<OrderUuid>) -> QueryState<OrderDetail> {
    let Some(uuid) = uuid else {
        return QueryState::Disabled;
    };
    let api = ctx.api();
    let path = format!("/orders/{uuid}");
    ctx.query(Query::new(detail_key(uuid), || api.get_json(&path, &())))
        .await
}

fn changed(name: &'static str, message: &str, uuid: OrderUuid) -> Mutation {
    Mutation::new(name, message)
        .invalidates(Invalidation::Prefix(QueryKey::new(RESOURCE)))
        .invalidates(Invalidation::Exact(detail_key(uuid)))
}

/// Outlet admin records weight and item counts for an arrived order.
#[instrument(skip(ctx, process))]
pub async fn process(
    ctx: &DataContext,
    uuid: OrderUuid,
    process: &ProcessOrder,
) -> MutationOutcome<Value> {
    let api = ctx.api();
    let path = format!("/orders/process/{uuid}");
    ctx.mutate(
        changed("process_order", "Order processed.", uuid),
        api.patch(&path, process),
    )
    .await
}

/// Customer confirms the laundry arrived.
#[instrument(skip(ctx))]
pub async fn confirm(ctx: &DataContext, uuid: OrderUuid) -> MutationOutcome<Value> {
    let api = ctx.api();
    let path = format!("/orders/confirm/{uuid}");
    ctx.mutate(
        changed("confirm_order", "Order confirmed. Thank you!", uuid),
        api.patch(&path, &serde_json::json!({})),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_mutations_invalidate_list_and_detail() {
        let uuid = OrderUuid::new(uuid::Uuid::nil());
        let mutation = changed("confirm_order", "ok", uuid);
        let lists = QueryKey::new(RESOURCE).with(&OrderFilter::default());
        let mine = QueryKey::new(RESOURCE).with("user").with(&OrderFilter::default());

        assert!(mutation.invalidations().iter().any(|i| i.covers(&lists)));
        assert!(mutation.invalidations().iter().any(|i| i.covers(&mine)));
        assert!(mutation.invalidations().iter().any(|i| i.covers(&detail_key(uuid))));
        assert!(
            !mutation
                .invalidations()
                .iter()
                .any(|i| i.covers(&detail_key(OrderUuid::new(uuid::Uuid::from_u128(1)))))
        );
    }
}

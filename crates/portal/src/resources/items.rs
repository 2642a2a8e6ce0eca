//! Laundry item catalogue (ADMIN).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use freshwash_core::{ItemId, QueryKey};

use super::{DataContext, blank_as_none};
use crate::api::types::{LaundryItem, NewLaundryItem, Paginated};
use crate::query::{Invalidation, Mutation, MutationOutcome, Query, QueryState};

const RESOURCE: &str = "items";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemFilter {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub page: Option<u32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub take: Option<u32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub search: Option<String>,
}

#[instrument(skip(ctx))]
pub async fn list(ctx: &DataContext, filter: &ItemFilter) -> QueryState<Paginated<LaundryItem>> {
    let api = ctx.api();
    ctx.query(Query::new(QueryKey::new(RESOURCE).with(filter), || {
        api.get_json("/items", filter)
    }))
    .await
}

fn changed(name: &'static str, message: &str) -> Mutation {
    Mutation::new(name, message).invalidates(Invalidation::Prefix(QueryKey::new(RESOURCE)))
}

#[instrument(skip(ctx, item), fields(name = %item.name))]
pub async fn create(ctx: &DataContext, item: &NewLaundryItem) -> MutationOutcome<Value> {
    let api = ctx.api();
    ctx.mutate(changed("create_item", "Item created."), api.post("/items", item))
        .await
}

#[instrument(skip(ctx))]
pub async fn delete(ctx: &DataContext, id: ItemId) -> MutationOutcome<Value> {
    let api = ctx.api();
    let path = format!("/items/{id}");
    ctx.mutate(changed("delete_item", "Item deleted."), api.delete(&path))
        .await
}
